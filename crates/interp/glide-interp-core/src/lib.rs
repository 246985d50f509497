//! glide-interp-core: animate a tensor towards a changing target.
//!
//! A [`Session`] holds the pure state machine (current, target, segment start,
//! period, curve). [`Interpolation`] drives a session from a [`Timer`] with a
//! fixed delay between ticks and notifies observers on every change.
//!
//! ```
//! use std::rc::Rc;
//! use glide_interp_core::{Interpolation, InterpolationConfig, ManualTimer};
//!
//! let timer = Rc::new(ManualTimer::new(0));
//! let value = Interpolation::new(0.0, InterpolationConfig::default().with_duration(1.0), timer.clone())?;
//! value.set_target(10.0)?;
//! timer.advance(500);
//! assert_eq!(value.current().as_scalar(), Some(5.0));
//! # Ok::<(), glide_interp_core::InterpolationError>(())
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod observer;
pub mod session;
pub mod timer;

pub use config::{ConfigError, InterpolationConfig};
pub use controller::Interpolation;
pub use error::InterpolationError;
pub use observer::{Notification, SessionEvent, SubscriptionId};
pub use session::{Phase, Session, SessionSnapshot, TickOutcome};
pub use timer::{ManualTimer, Timer, TimerId, TimerTask};
#[cfg(feature = "tokio")]
pub use timer::TokioTimer;

// Re-exports for hosts that only depend on this crate
pub use glide_tensor_core::{InterpMethod, Tensor, TensorError};
