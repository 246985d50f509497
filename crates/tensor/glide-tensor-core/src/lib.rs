//! glide-tensor-core: numeric structures and the interpolation kernels that
//! operate on them (engine-agnostic, no I/O).

pub mod error;
pub mod interp;
pub mod json;
pub mod shape;
pub mod value;

pub use error::{ParseMethodError, TensorError};
pub use interp::{interpolate, lerp, lerp_f64, smoothstep, smoothstep_f64, InterpMethod};
pub use shape::{check_compatible, IndexPath, TensorShape};
pub use value::{Tensor, TensorKind};
