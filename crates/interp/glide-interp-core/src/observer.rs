//! Change notifications delivered to the host.
//!
//! Observers run after the session borrow is released, so they may read from
//! or write to the controller. Notifications raised while a dispatch is in
//! progress are queued and delivered in order once the current one finishes.

use std::cell::RefCell;
use std::collections::VecDeque;

use glide_tensor_core::Tensor;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::session::Phase;

/// What changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum SessionEvent {
    TargetChanged,
    PeriodChanged,
    /// The published value moved.
    CurrentChanged,
    /// The segment completed and ticking stopped.
    Settled,
}

/// One change, with the session state right after it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub event: SessionEvent,
    pub current: Tensor,
    pub target: Tensor,
    pub period: f64,
    pub phase: Phase,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

pub type Observer = Box<dyn FnMut(&Notification)>;

#[derive(Default)]
struct Registry {
    next_id: u32,
    live: HashSet<SubscriptionId>,
    entries: Vec<(SubscriptionId, Observer)>,
    queue: VecDeque<Notification>,
    dispatching: bool,
}

/// Ordered observer list with re-entrant dispatch.
#[derive(Default)]
pub struct ObserverRegistry {
    inner: RefCell<Registry>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Observer) -> SubscriptionId {
        let mut reg = self.inner.borrow_mut();
        let id = SubscriptionId(reg.next_id);
        reg.next_id = reg.next_id.wrapping_add(1);
        reg.live.insert(id);
        reg.entries.push((id, observer));
        id
    }

    /// Returns `false` for ids that are unknown or already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut reg = self.inner.borrow_mut();
        if !reg.live.remove(&id) {
            return false;
        }
        // During dispatch the entry may be checked out; it is dropped when the
        // dispatch loop puts the list back.
        reg.entries.retain(|(eid, _)| *eid != id);
        true
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify(&self, notification: Notification) {
        {
            let mut reg = self.inner.borrow_mut();
            reg.queue.push_back(notification);
            if reg.dispatching {
                return;
            }
            reg.dispatching = true;
        }

        let mut dispatch = Dispatch {
            registry: self,
            entries: Vec::new(),
        };
        loop {
            let next = {
                let mut reg = self.inner.borrow_mut();
                match reg.queue.pop_front() {
                    Some(n) => {
                        dispatch.entries = std::mem::take(&mut reg.entries);
                        n
                    }
                    None => break,
                }
            };

            for (id, observer) in dispatch.entries.iter_mut() {
                let live = self.inner.borrow().live.contains(id);
                if live {
                    observer(&next);
                }
            }
            dispatch.restore();
        }
    }
}

/// Checked-out observer list for one `notify` call. Dropping it, including
/// while unwinding from a panicking observer, puts the list back and ends the
/// dispatch.
struct Dispatch<'a> {
    registry: &'a ObserverRegistry,
    entries: Vec<(SubscriptionId, Observer)>,
}

impl Dispatch<'_> {
    fn restore(&mut self) {
        let mut reg = self.registry.inner.borrow_mut();
        let mut entries = std::mem::take(&mut self.entries);
        // Observers subscribed mid-dispatch go after the existing ones.
        entries.append(&mut reg.entries);
        let live = &reg.live;
        entries.retain(|(id, _)| live.contains(id));
        reg.entries = entries;
    }
}

impl Drop for Dispatch<'_> {
    fn drop(&mut self) {
        self.restore();
        let mut reg = self.registry.inner.borrow_mut();
        reg.dispatching = false;
        // Anything still queued belongs to a dispatch that panicked.
        reg.queue.clear();
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("len", &self.len())
            .finish()
    }
}
