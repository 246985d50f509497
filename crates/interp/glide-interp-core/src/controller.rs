//! Interpolation: a live session driven by a `Timer`.
//!
//! Methods:
//! - new, current, target, set_target, set_period (host contract)
//! - subscribe / unsubscribe (change notifications)
//! - dispose (cancel the pending tick)

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use glide_tensor_core::{InterpMethod, Tensor};
use log::{debug, error, trace};

use crate::config::InterpolationConfig;
use crate::error::InterpolationError;
use crate::observer::{Notification, ObserverRegistry, SessionEvent, SubscriptionId};
use crate::session::{Phase, Session, SessionSnapshot, TickOutcome};
use crate::timer::{Timer, TimerId};

struct Inner {
    session: RefCell<Session>,
    observers: ObserverRegistry,
    timer: Rc<dyn Timer>,
    pending: Cell<Option<TimerId>>,
    tick_delay: Duration,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timer.cancel(id);
            debug!("interpolation discarded; cancelled pending tick {:?}", id);
        }
    }
}

impl Inner {
    fn cancel_pending(&self) -> bool {
        match self.pending.take() {
            Some(id) => self.timer.cancel(id),
            None => false,
        }
    }

    /// Replace any pending tick with a fresh one `tick_delay` from now, so a
    /// session never has more than one tick chain.
    fn schedule_tick(this: &Rc<Inner>) {
        this.cancel_pending();
        let weak = Rc::downgrade(this);
        let id = this.timer.schedule(
            this.tick_delay,
            Box::new(move || match weak.upgrade() {
                Some(inner) => Inner::on_tick(&inner),
                None => trace!("tick fired after interpolation was discarded"),
            }),
        );
        this.pending.set(Some(id));
    }

    fn on_tick(this: &Rc<Inner>) {
        this.pending.set(None);
        let now = this.timer.now_ms();
        let outcome = this.session.borrow_mut().tick(now);
        match outcome {
            Ok(TickOutcome::Advanced { fraction, changed }) => {
                trace!("tick at {now}ms: fraction={fraction:.4}");
                Inner::schedule_tick(this);
                if changed {
                    this.publish(SessionEvent::CurrentChanged);
                }
            }
            Ok(TickOutcome::Settled { changed }) => {
                debug!("segment settled at {now}ms");
                if changed {
                    this.publish(SessionEvent::CurrentChanged);
                }
                this.publish(SessionEvent::Settled);
            }
            Ok(TickOutcome::Idle) => {}
            // Targets are shape-checked on entry, so this means the session
            // was corrupted; stop ticking rather than loop on the error.
            Err(e) => error!("interpolation tick failed: {e}"),
        }
    }

    fn publish(&self, event: SessionEvent) {
        if self.observers.is_empty() {
            return;
        }
        let notification = {
            let s = self.session.borrow();
            Notification {
                event,
                current: s.current().clone(),
                target: s.target().clone(),
                period: s.period(),
                phase: s.phase(),
            }
        };
        self.observers.notify(notification);
    }
}

/// Handle to an animated tensor.
///
/// Cloning shares the same session. When the last clone is dropped the
/// pending tick is cancelled, so no callback touches a discarded session.
#[derive(Clone)]
pub struct Interpolation {
    inner: Rc<Inner>,
}

impl Interpolation {
    /// Create an idle session at `initial`. The shape of `initial` is fixed:
    /// later targets must match it.
    pub fn new(
        initial: impl Into<Tensor>,
        config: InterpolationConfig,
        timer: Rc<dyn Timer>,
    ) -> Result<Self, InterpolationError> {
        let session = Session::new(initial.into(), &config, timer.now_ms())?;
        let tick_delay = session.tick_delay();
        debug!(
            "interpolation created: method={} duration={}s tick_delay={:?}",
            config.method, config.duration, tick_delay
        );
        Ok(Self {
            inner: Rc::new(Inner {
                session: RefCell::new(session),
                observers: ObserverRegistry::new(),
                timer,
                pending: Cell::new(None),
                tick_delay,
            }),
        })
    }

    /// Convenience constructor using a fresh [`crate::TokioTimer`]. Must be
    /// called inside a tokio `LocalSet`.
    #[cfg(feature = "tokio")]
    pub fn with_tokio(
        initial: impl Into<Tensor>,
        config: InterpolationConfig,
    ) -> Result<Self, InterpolationError> {
        Self::new(initial, config, Rc::new(crate::timer::TokioTimer::new()))
    }

    /// Builder-style [`subscribe`](Self::subscribe) for wiring a render
    /// callback at construction.
    pub fn with_observer<F>(self, observer: F) -> Self
    where
        F: FnMut(&Notification) + 'static,
    {
        self.subscribe(observer);
        self
    }

    pub fn current(&self) -> Tensor {
        self.inner.session.borrow().current().clone()
    }

    pub fn target(&self) -> Tensor {
        self.inner.session.borrow().target().clone()
    }

    /// Borrow the session without cloning. Do not hold the borrow across a
    /// call that mutates the controller.
    pub fn session(&self) -> Ref<'_, Session> {
        self.inner.session.borrow()
    }

    pub fn period(&self) -> f64 {
        self.inner.session.borrow().period()
    }

    pub fn method(&self) -> InterpMethod {
        self.inner.session.borrow().method()
    }

    pub fn tick_rate_hz(&self) -> f64 {
        self.inner.session.borrow().tick_rate_hz()
    }

    pub fn phase(&self) -> Phase {
        self.inner.session.borrow().phase()
    }

    /// Idle with `current` exactly equal to `target`.
    pub fn is_settled(&self) -> bool {
        let s = self.inner.session.borrow();
        s.phase() == Phase::Idle && s.current() == s.target()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.session.borrow().snapshot()
    }

    /// Animate towards `target`, starting from the value currently published.
    ///
    /// Fails without touching the session if `target` does not have the
    /// session's shape. Setting the target to its present value is a no-op.
    pub fn set_target(&self, target: impl Into<Tensor>) -> Result<(), InterpolationError> {
        let now = self.inner.timer.now_ms();
        let changed = self
            .inner
            .session
            .borrow_mut()
            .set_target(target.into(), now)?;
        if changed {
            debug!("target changed at {now}ms; segment reset");
            Inner::schedule_tick(&self.inner);
            self.inner.publish(SessionEvent::TargetChanged);
        }
        Ok(())
    }

    /// Set a new target computed from the current one. Useful for relative
    /// input such as scroll deltas, which should accumulate on the target
    /// rather than on the in-flight value.
    pub fn update_target<F>(&self, f: F) -> Result<(), InterpolationError>
    where
        F: FnOnce(&Tensor) -> Tensor,
    {
        // Release the session borrow before `f` runs; it may touch the controller.
        let target = self.target();
        self.set_target(f(&target))
    }

    /// Change the segment length (seconds). Restarts the segment from the
    /// published value.
    pub fn set_period(&self, seconds: f64) -> Result<(), InterpolationError> {
        let now = self.inner.timer.now_ms();
        let changed = self.inner.session.borrow_mut().set_period(seconds, now)?;
        if changed {
            debug!("period changed to {seconds}s at {now}ms; segment reset");
            Inner::schedule_tick(&self.inner);
            self.inner.publish(SessionEvent::PeriodChanged);
        }
        Ok(())
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Notification) + 'static,
    {
        self.inner.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    /// Whether a tick is currently scheduled.
    pub fn has_pending_tick(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    /// Cancel the pending tick and release this handle. Other clones keep the
    /// session, now `Idle` at the last published value, until the next target
    /// or period change.
    pub fn dispose(self) {
        if self.inner.cancel_pending() {
            debug!("interpolation disposed; pending tick cancelled");
        }
        self.inner.session.borrow_mut().halt();
    }
}

impl std::fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpolation")
            .field("session", &*self.inner.session.borrow())
            .field("observers", &self.inner.observers)
            .field("pending", &self.inner.pending.get())
            .finish()
    }
}
