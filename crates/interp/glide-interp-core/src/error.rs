use glide_tensor_core::TensorError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned synchronously by controller operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("incompatible tensor: {0}")]
    Tensor(#[from] TensorError),
}
