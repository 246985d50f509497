use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::Duration;

use hashbrown::HashMap;

use super::{duration_ms, Timer, TimerId, TimerTask};

#[derive(Default)]
struct Queue {
    now_ms: u64,
    next_id: u64,
    // Ordered by (deadline, id) so equal deadlines fire in scheduling order.
    tasks: BTreeMap<(u64, TimerId), TimerTask>,
    deadlines: HashMap<TimerId, u64>,
}

/// Deterministic timer with a manually advanced clock.
#[derive(Default)]
pub struct ManualTimer {
    queue: RefCell<Queue>,
}

impl ManualTimer {
    pub fn new(start_ms: u64) -> Self {
        Self {
            queue: RefCell::new(Queue {
                now_ms: start_ms,
                ..Queue::default()
            }),
        }
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.borrow().tasks.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Move the clock forward by `ms`, running every task that falls due, in
    /// deadline order. Tasks scheduled by those tasks also run if they fall
    /// due before the end of the window. Returns the number of tasks run.
    pub fn advance(&self, ms: u64) -> usize {
        let end = self.queue.borrow().now_ms.saturating_add(ms);
        self.advance_to(end)
    }

    pub fn advance_to(&self, end_ms: u64) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_due(end_ms) {
            task();
            ran += 1;
        }
        let mut q = self.queue.borrow_mut();
        if end_ms > q.now_ms {
            q.now_ms = end_ms;
        }
        ran
    }

    /// Run tasks until the queue is empty or `max_ms` of clock time passed.
    pub fn run_until_idle(&self, max_ms: u64) -> usize {
        let limit = self.queue.borrow().now_ms.saturating_add(max_ms);
        let mut ran = 0;
        while let Some(deadline) = self.next_deadline() {
            if deadline > limit {
                break;
            }
            ran += self.advance_to(deadline);
        }
        ran
    }

    fn pop_due(&self, end_ms: u64) -> Option<TimerTask> {
        let mut q = self.queue.borrow_mut();
        let key = *q.tasks.keys().next()?;
        if key.0 > end_ms {
            return None;
        }
        let task = q.tasks.remove(&key)?;
        q.deadlines.remove(&key.1);
        q.now_ms = q.now_ms.max(key.0);
        Some(task)
    }
}

impl Timer for ManualTimer {
    fn now_ms(&self) -> u64 {
        self.queue.borrow().now_ms
    }

    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId {
        let mut q = self.queue.borrow_mut();
        let id = TimerId(q.next_id);
        q.next_id = q.next_id.wrapping_add(1);
        let deadline = q.now_ms.saturating_add(duration_ms(delay));
        q.tasks.insert((deadline, id), task);
        q.deadlines.insert(id, deadline);
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut q = self.queue.borrow_mut();
        match q.deadlines.remove(&id) {
            Some(deadline) => q.tasks.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }
}

impl std::fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let q = self.queue.borrow();
        f.debug_struct("ManualTimer")
            .field("now_ms", &q.now_ms)
            .field("pending", &q.tasks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn runs_due_tasks_in_deadline_order() {
        let timer = ManualTimer::new(1_000);
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30, "c"), (10, "a"), (10, "b")] {
            let log = log.clone();
            timer.schedule(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(tag)),
            );
        }
        assert_eq!(timer.advance(9), 0);
        assert_eq!(timer.advance(1), 2);
        assert_eq!(timer.now_ms(), 1_010);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(timer.advance(100), 1);
        assert_eq!(timer.now_ms(), 1_110);
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn cancel_removes_pending_task() {
        let timer = ManualTimer::new(0);
        let fired = Rc::new(RefCell::new(false));
        let f = fired.clone();
        let id = timer.schedule(Duration::from_millis(5), Box::new(move || *f.borrow_mut() = true));
        assert!(timer.cancel(id));
        assert!(!timer.cancel(id));
        timer.advance(10);
        assert!(!*fired.borrow());
    }

    #[test]
    fn tasks_can_reschedule_within_the_window() {
        let timer = Rc::new(ManualTimer::new(0));
        let count = Rc::new(RefCell::new(0u32));

        fn arm(timer: &Rc<ManualTimer>, count: &Rc<RefCell<u32>>) {
            let t = timer.clone();
            let c = count.clone();
            timer.schedule(
                Duration::from_millis(20),
                Box::new(move || {
                    *c.borrow_mut() += 1;
                    if *c.borrow() < 5 {
                        arm(&t, &c);
                    }
                }),
            );
        }

        arm(&timer, &count);
        assert_eq!(timer.advance(70), 3);
        assert_eq!(timer.now_ms(), 70);
        assert_eq!(timer.run_until_idle(1_000), 2);
        assert_eq!(*count.borrow(), 5);
        assert_eq!(timer.now_ms(), 100);
    }
}
