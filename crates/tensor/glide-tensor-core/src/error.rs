use thiserror::Error;

use crate::shape::IndexPath;
use crate::value::TensorKind;

/// Structural mismatch between two tensors combined element-wise.
///
/// Both variants are usage errors: the caller combined tensors whose shapes
/// were never compatible. No partial result is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: IndexPath,
        expected: TensorKind,
        found: TensorKind,
    },
    #[error("shape mismatch at {path}: expected length {expected}, found {found}")]
    ShapeMismatch {
        path: IndexPath,
        expected: usize,
        found: usize,
    },
}

impl TensorError {
    /// Position of the first mismatching node.
    pub fn path(&self) -> &IndexPath {
        match self {
            TensorError::TypeMismatch { path, .. } | TensorError::ShapeMismatch { path, .. } => {
                path
            }
        }
    }
}

/// Unknown interpolation method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interpolation method '{0}' (expected \"lerp\" or \"ease-in-out\")")]
pub struct ParseMethodError(pub String);
