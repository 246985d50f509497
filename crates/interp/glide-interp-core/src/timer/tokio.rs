use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use ::tokio::task::JoinHandle;
use ::tokio::time::Instant;
use hashbrown::HashMap;

use super::{duration_ms, Timer, TimerId, TimerTask};

struct Inner {
    origin: Instant,
    origin_epoch_ms: u64,
    next_id: Cell<u64>,
    handles: RefCell<HashMap<TimerId, JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        for (_, handle) in self.handles.get_mut().drain() {
            handle.abort();
        }
    }
}

/// Timer backed by `tokio::task::spawn_local` and `tokio::time::sleep`.
///
/// Must be used from within a [`tokio::task::LocalSet`]. The clock follows
/// tokio's time source, so paused-time tests advance it deterministically.
/// Dropping the last clone aborts every pending task.
#[derive(Clone)]
pub struct TokioTimer {
    inner: Rc<Inner>,
}

impl TokioTimer {
    pub fn new() -> Self {
        let origin_epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(duration_ms)
            .unwrap_or(0);
        Self {
            inner: Rc::new(Inner {
                origin: Instant::now(),
                origin_epoch_ms,
                next_id: Cell::new(0),
                handles: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn pending(&self) -> usize {
        self.inner.handles.borrow().len()
    }
}

impl Default for TokioTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for TokioTimer {
    fn now_ms(&self) -> u64 {
        self.inner
            .origin_epoch_ms
            .saturating_add(duration_ms(self.inner.origin.elapsed()))
    }

    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0.wrapping_add(1));

        let weak = Rc::downgrade(&self.inner);
        let handle = ::tokio::task::spawn_local(async move {
            ::tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.handles.borrow_mut().remove(&id);
            drop(inner);
            task();
        });
        // spawn_local never polls inline, so the entry exists before the task runs.
        self.inner.handles.borrow_mut().insert(id, handle);
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        match self.inner.handles.borrow_mut().remove(&id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for TokioTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioTimer")
            .field("now_ms", &self.now_ms())
            .field("pending", &self.pending())
            .finish()
    }
}
