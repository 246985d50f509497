//! Interpolation kernels:
//! - lerp (linear, unclamped)
//! - smoothstep (cubic ease-in-out over a re-derived, clamped progress ratio)
//! - InterpMethod dispatch

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseMethodError, TensorError};
use crate::shape::IndexPath;
use crate::value::Tensor;

/// Linear interpolation of scalars. `t` is not clamped.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Smoothstep of scalars.
///
/// The progress ratio is recovered from the unclamped linear value and then
/// clamped to [0, 1], so fractions outside [0, 1] do not extrapolate.
#[inline]
pub fn smoothstep_f64(a: f64, b: f64, t: f64) -> f64 {
    if a == b {
        return a;
    }
    let v = lerp_f64(a, b, t);
    let x = ((v - a) / (b - a)).clamp(0.0, 1.0);
    let s = x * x * (3.0 - 2.0 * x);
    lerp_f64(a, b, s)
}

/// Element-wise linear interpolation of two same-shaped tensors.
pub fn lerp(from: &Tensor, to: &Tensor, fraction: f64) -> Result<Tensor, TensorError> {
    zip_leaves(from, to, &IndexPath::root(), &|a, b| lerp_f64(a, b, fraction))
}

/// Element-wise smoothstep of two same-shaped tensors.
pub fn smoothstep(from: &Tensor, to: &Tensor, fraction: f64) -> Result<Tensor, TensorError> {
    zip_leaves(from, to, &IndexPath::root(), &|a, b| smoothstep_f64(a, b, fraction))
}

/// Recurse through both tensors, checking kind before length at every level,
/// and combine matching leaves with `f`.
fn zip_leaves<F>(a: &Tensor, b: &Tensor, path: &IndexPath, f: &F) -> Result<Tensor, TensorError>
where
    F: Fn(f64, f64) -> f64,
{
    match (a, b) {
        (Tensor::Scalar(va), Tensor::Scalar(vb)) => Ok(Tensor::Scalar(f(*va, *vb))),
        (Tensor::Seq(xs), Tensor::Seq(ys)) => {
            if xs.len() != ys.len() {
                return Err(TensorError::ShapeMismatch {
                    path: path.clone(),
                    expected: xs.len(),
                    found: ys.len(),
                });
            }
            let mut out = Vec::with_capacity(xs.len());
            for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                out.push(zip_leaves(x, y, &path.child(i), f)?);
            }
            Ok(Tensor::Seq(out))
        }
        _ => Err(TensorError::TypeMismatch {
            path: path.clone(),
            expected: a.kind(),
            found: b.kind(),
        }),
    }
}

/// Interpolation curve used by a session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpMethod {
    #[default]
    #[serde(rename = "lerp")]
    Lerp,
    #[serde(rename = "ease-in-out")]
    EaseInOut,
}

impl InterpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterpMethod::Lerp => "lerp",
            InterpMethod::EaseInOut => "ease-in-out",
        }
    }

    /// Dispatch to [`lerp`] or [`smoothstep`].
    pub fn interpolate(
        &self,
        from: &Tensor,
        to: &Tensor,
        fraction: f64,
    ) -> Result<Tensor, TensorError> {
        match self {
            InterpMethod::Lerp => lerp(from, to, fraction),
            InterpMethod::EaseInOut => smoothstep(from, to, fraction),
        }
    }
}

/// Free-function form of [`InterpMethod::interpolate`].
#[inline]
pub fn interpolate(
    method: InterpMethod,
    from: &Tensor,
    to: &Tensor,
    fraction: f64,
) -> Result<Tensor, TensorError> {
    method.interpolate(from, to, fraction)
}

impl FromStr for InterpMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lerp" => Ok(InterpMethod::Lerp),
            "ease-in-out" => Ok(InterpMethod::EaseInOut),
            other => Err(ParseMethodError(other.to_string())),
        }
    }
}

impl fmt::Display for InterpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_scalar_midpoint_and_quarter() {
        assert_eq!(smoothstep_f64(0.0, 10.0, 0.5), 5.0);
        // x = 0.25 -> 0.0625 * 2.5 = 0.15625
        assert!((smoothstep_f64(0.0, 10.0, 0.25) - 1.5625).abs() < 1e-12);
    }

    #[test]
    fn smoothstep_clamps_out_of_range_fractions() {
        assert_eq!(smoothstep_f64(2.0, 4.0, 1.7), 4.0);
        assert_eq!(smoothstep_f64(2.0, 4.0, -0.5), 2.0);
        // Descending ranges clamp the same way.
        assert_eq!(smoothstep_f64(4.0, 2.0, 3.0), 2.0);
    }

    #[test]
    fn lerp_extrapolates() {
        assert_eq!(lerp_f64(0.0, 10.0, 1.5), 15.0);
        assert_eq!(lerp_f64(0.0, 10.0, -0.5), -5.0);
    }

    #[test]
    fn method_names_round_trip_through_from_str() {
        assert_eq!("lerp".parse::<InterpMethod>(), Ok(InterpMethod::Lerp));
        assert_eq!("ease-in-out".parse::<InterpMethod>(), Ok(InterpMethod::EaseInOut));
        assert_eq!(
            "bounce".parse::<InterpMethod>(),
            Err(ParseMethodError("bounce".into()))
        );
        assert_eq!(InterpMethod::EaseInOut.to_string(), "ease-in-out");
    }
}
