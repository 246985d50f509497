//! Session configuration: duration, curve and tick cadence.

use std::time::Duration;

use glide_tensor_core::{InterpMethod, ParseMethodError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DURATION_S: f64 = 1.5;
pub const DEFAULT_TICK_RATE_HZ: f64 = 50.0;

/// Invalid construction or update parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    UnknownMethod(#[from] ParseMethodError),
    #[error("period must be a positive number of seconds, got {0}")]
    NonPositivePeriod(f64),
    #[error("tick rate must be a positive frequency in Hz, got {0}")]
    NonPositiveTickRate(f64),
    #[error("config json: {0}")]
    Json(String),
}

/// Construction parameters for an interpolation session.
///
/// JSON form uses the hook's argument names: `{ "duration": 2, "method":
/// "ease-in-out", "tickRateHz": 144 }`; every field is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterpolationConfig {
    /// Segment length in seconds.
    pub duration: f64,
    pub method: InterpMethod,
    /// Desired tick frequency. The delay between ticks is `floor(1000 / hz)` ms.
    pub tick_rate_hz: f64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_S,
            method: InterpMethod::Lerp,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    duration: Option<f64>,
    method: Option<String>,
    tick_rate_hz: Option<f64>,
}

impl InterpolationConfig {
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_method(mut self, method: InterpMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the method by its name (`"lerp"` or `"ease-in-out"`).
    pub fn with_method_name(mut self, name: &str) -> Result<Self, ConfigError> {
        self.method = name.parse()?;
        Ok(self)
    }

    pub fn with_tick_rate(mut self, hz: f64) -> Self {
        self.tick_rate_hz = hz;
        self
    }

    /// Parse and validate a JSON config. Unknown method names surface as
    /// [`ConfigError::UnknownMethod`] rather than a generic parse failure.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        let mut cfg = Self::default();
        if let Some(d) = raw.duration {
            cfg.duration = d;
        }
        if let Some(name) = raw.method.as_deref() {
            cfg.method = name.parse()?;
        }
        if let Some(hz) = raw.tick_rate_hz {
            cfg.tick_rate_hz = hz;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_period(self.duration)?;
        validate_tick_rate(self.tick_rate_hz)
    }

    /// Fixed delay between ticks.
    pub fn tick_delay(&self) -> Duration {
        tick_delay(self.tick_rate_hz)
    }
}

pub(crate) fn validate_period(seconds: f64) -> Result<(), ConfigError> {
    // NaN fails the comparison as well.
    if seconds.is_finite() && seconds > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositivePeriod(seconds))
    }
}

pub(crate) fn validate_tick_rate(hz: f64) -> Result<(), ConfigError> {
    if hz.is_finite() && hz > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveTickRate(hz))
    }
}

/// `floor(1000 / hz)` ms, never below 1 ms so the clock advances between ticks.
pub(crate) fn tick_delay(hz: f64) -> Duration {
    Duration::from_millis(((1000.0 / hz).floor() as u64).max(1))
}
