//! Single-threaded delayed callbacks plus the clock they run against.
//!
//! `ManualTimer` is a deterministic queue advanced by the host (tests, frame
//! loops). `TokioTimer` runs callbacks on a tokio `LocalSet`.

pub mod manual;
#[cfg(feature = "tokio")]
pub mod tokio;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use manual::ManualTimer;
#[cfg(feature = "tokio")]
pub use self::tokio::TokioTimer;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Callback run once when its delay elapses.
pub type TimerTask = Box<dyn FnOnce()>;

pub trait Timer {
    /// Milliseconds since the Unix epoch (or the timer's own origin for
    /// manual clocks).
    fn now_ms(&self) -> u64;

    /// Run `task` once after `delay`. Never runs `task` synchronously.
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId;

    /// Cancel a pending task. Returns `false` if it already ran or was
    /// cancelled.
    fn cancel(&self, id: TimerId) -> bool;
}

#[inline]
pub(crate) fn duration_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}
