//! Session: the state of one animated value, advanced by explicit ticks.
//!
//! A session is pure state. It never reads a clock or schedules anything; the
//! caller passes `now_ms` in. `Interpolation` wires it to a `Timer`.

use glide_tensor_core::{check_compatible, InterpMethod, Tensor, TensorError};
use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigError, InterpolationConfig};

/// Whether a segment is in progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No segment running; ticks are not needed.
    Idle,
    /// A segment is in progress and ticks must keep coming.
    Running,
}

/// Result of advancing a session by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Still inside the segment; the next tick should be scheduled.
    Advanced { fraction: f64, changed: bool },
    /// Segment finished. `current` now equals `target` exactly.
    Settled { changed: bool },
    /// Tick arrived while idle (nothing to do).
    Idle,
}

impl TickOutcome {
    pub fn should_reschedule(&self) -> bool {
        matches!(self, TickOutcome::Advanced { .. })
    }

    /// Whether the published value moved during this tick.
    pub fn changed(&self) -> bool {
        match self {
            TickOutcome::Advanced { changed, .. } | TickOutcome::Settled { changed } => *changed,
            TickOutcome::Idle => false,
        }
    }
}

/// Serializable copy of the public session state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub current: Tensor,
    pub target: Tensor,
    pub period: f64,
    pub method: InterpMethod,
    pub tick_rate_hz: f64,
    pub phase: Phase,
}

#[derive(Clone, Debug)]
pub struct Session {
    current: Tensor,
    target: Tensor,
    start: Tensor,
    start_time_ms: u64,
    period_s: f64,
    method: InterpMethod,
    tick_rate_hz: f64,
    phase: Phase,
}

impl Session {
    /// Start idle at `initial`. The shape of `initial` is fixed for the
    /// lifetime of the session.
    pub fn new(
        initial: Tensor,
        cfg: &InterpolationConfig,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            current: initial.clone(),
            target: initial.clone(),
            start: initial,
            start_time_ms: now_ms,
            period_s: cfg.duration,
            method: cfg.method,
            tick_rate_hz: cfg.tick_rate_hz,
            phase: Phase::Idle,
        })
    }

    #[inline]
    pub fn current(&self) -> &Tensor {
        &self.current
    }

    #[inline]
    pub fn target(&self) -> &Tensor {
        &self.target
    }

    /// Value the current segment started from.
    #[inline]
    pub fn start(&self) -> &Tensor {
        &self.start
    }

    #[inline]
    pub fn start_time_ms(&self) -> u64 {
        self.start_time_ms
    }

    #[inline]
    pub fn period(&self) -> f64 {
        self.period_s
    }

    #[inline]
    pub fn method(&self) -> InterpMethod {
        self.method
    }

    #[inline]
    pub fn tick_rate_hz(&self) -> f64 {
        self.tick_rate_hz
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tick_delay(&self) -> std::time::Duration {
        config::tick_delay(self.tick_rate_hz)
    }

    /// Replace the target. Returns `Ok(false)` when the new target equals the
    /// old one by value, in which case nothing changes.
    pub fn set_target(&mut self, target: Tensor, now_ms: u64) -> Result<bool, TensorError> {
        check_compatible(&self.target, &target)?;
        if target == self.target {
            return Ok(false);
        }
        self.target = target;
        self.reset(now_ms);
        Ok(true)
    }

    /// Replace the period (seconds). Returns `Ok(false)` when unchanged.
    pub fn set_period(&mut self, period_s: f64, now_ms: u64) -> Result<bool, ConfigError> {
        config::validate_period(period_s)?;
        if period_s == self.period_s {
            return Ok(false);
        }
        self.period_s = period_s;
        self.reset(now_ms);
        Ok(true)
    }

    /// Begin a new segment from the published value.
    fn reset(&mut self, now_ms: u64) {
        self.start = self.current.clone();
        self.start_time_ms = now_ms;
        self.phase = Phase::Running;
    }

    /// Stop ticking where the segment is; `current` keeps its last value.
    pub(crate) fn halt(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Progress through the current segment at `now_ms`. Not clamped.
    pub fn fraction_at(&self, now_ms: u64) -> f64 {
        let elapsed_ms = now_ms.saturating_sub(self.start_time_ms) as f64;
        elapsed_ms / (self.period_s * 1000.0)
    }

    /// Recompute `current` for `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Result<TickOutcome, TensorError> {
        if self.phase == Phase::Idle {
            return Ok(TickOutcome::Idle);
        }
        let fraction = self.fraction_at(now_ms);
        if fraction > 1.0 {
            let changed = self.current != self.target;
            if changed {
                self.current = self.target.clone();
            }
            self.phase = Phase::Idle;
            return Ok(TickOutcome::Settled { changed });
        }
        let next = self.method.interpolate(&self.start, &self.target, fraction)?;
        let changed = next != self.current;
        self.current = next;
        Ok(TickOutcome::Advanced { fraction, changed })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current: self.current.clone(),
            target: self.target.clone(),
            period: self.period_s,
            method: self.method,
            tick_rate_hz: self.tick_rate_hz,
            phase: self.phase,
        }
    }
}
