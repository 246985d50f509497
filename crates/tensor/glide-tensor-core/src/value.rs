//! Tensor: a scalar or an arbitrarily nested sequence of scalars.
//! All numeric leaves use f64.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse kind of a tensor node. Interpolation requires both operands to have
/// the same kind at every position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorKind {
    Scalar,
    Seq,
}

impl fmt::Display for TensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorKind::Scalar => f.write_str("scalar"),
            TensorKind::Seq => f.write_str("sequence"),
        }
    }
}

/// Numeric structure animated by the interpolation engine.
///
/// Serializes as plain JSON: `2.5`, `[0, 1]`, `[1, [[2], 3, 4], [5, 6, 7]]`.
/// Nesting may be ragged; the shape is whatever the initial value establishes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tensor {
    /// Single numeric leaf
    Scalar(f64),

    /// Ordered sequence of nested tensors
    Seq(Vec<Tensor>),
}

impl Tensor {
    /// Return the coarse kind of this node.
    #[inline]
    pub fn kind(&self) -> TensorKind {
        match self {
            Tensor::Scalar(_) => TensorKind::Scalar,
            Tensor::Seq(_) => TensorKind::Seq,
        }
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Tensor::Scalar(_))
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Tensor::Scalar(v) => Some(*v),
            Tensor::Seq(_) => None,
        }
    }

    #[inline]
    pub fn as_seq(&self) -> Option<&[Tensor]> {
        match self {
            Tensor::Scalar(_) => None,
            Tensor::Seq(items) => Some(items),
        }
    }

    /// Length of a sequence node; scalars report `None`.
    pub fn len(&self) -> Option<usize> {
        self.as_seq().map(<[Tensor]>::len)
    }

    /// Number of numeric leaves reachable from this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Tensor::Scalar(_) => 1,
            Tensor::Seq(items) => items.iter().map(Tensor::leaf_count).sum(),
        }
    }

    /// Apply `f` to every numeric leaf, preserving the shape.
    pub fn map_scalars<F>(&self, f: F) -> Tensor
    where
        F: Fn(f64) -> f64 + Copy,
    {
        match self {
            Tensor::Scalar(v) => Tensor::Scalar(f(*v)),
            Tensor::Seq(items) => Tensor::Seq(items.iter().map(|t| t.map_scalars(f)).collect()),
        }
    }

    /// Iterate numeric leaves in depth-first order.
    pub fn scalars(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.leaf_count());
        collect_scalars(self, &mut out);
        out
    }

    /// Convenience constructors
    pub fn scalar(v: f64) -> Self {
        Tensor::Scalar(v)
    }

    pub fn seq(items: impl IntoIterator<Item = impl Into<Tensor>>) -> Self {
        Tensor::Seq(items.into_iter().map(Into::into).collect())
    }
}

fn collect_scalars(t: &Tensor, out: &mut Vec<f64>) {
    match t {
        Tensor::Scalar(v) => out.push(*v),
        Tensor::Seq(items) => {
            for item in items {
                collect_scalars(item, out);
            }
        }
    }
}

impl Default for Tensor {
    fn default() -> Self {
        Tensor::Scalar(0.0)
    }
}

impl From<f64> for Tensor {
    fn from(v: f64) -> Self {
        Tensor::Scalar(v)
    }
}

impl From<f32> for Tensor {
    fn from(v: f32) -> Self {
        Tensor::Scalar(f64::from(v))
    }
}

impl From<i32> for Tensor {
    fn from(v: i32) -> Self {
        Tensor::Scalar(f64::from(v))
    }
}

impl<T: Into<Tensor>> From<Vec<T>> for Tensor {
    fn from(items: Vec<T>) -> Self {
        Tensor::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Tensor>, const N: usize> From<[T; N]> for Tensor {
    fn from(items: [T; N]) -> Self {
        Tensor::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tensor::Scalar(v) => write!(f, "{v}"),
            Tensor::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_nesting_counts_leaves() {
        let t = Tensor::from(vec![
            Tensor::from(1.0),
            Tensor::from(vec![Tensor::from(vec![2.0]), Tensor::from(3.0), Tensor::from(4.0)]),
            Tensor::from([5.0, 6.0, 7.0]),
        ]);
        assert_eq!(t.leaf_count(), 7);
        assert_eq!(t.len(), Some(3));
        assert_eq!(t.scalars(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(t.to_string(), "[1, [[2], 3, 4], [5, 6, 7]]");
    }

    #[test]
    fn serde_is_plain_json() {
        let t: Tensor = serde_json::from_str("[1, [2.5, 3]]").expect("parse");
        assert_eq!(t, Tensor::from(vec![Tensor::from(1.0), Tensor::from([2.5, 3.0])]));
        assert_eq!(serde_json::to_string(&Tensor::from(4.0)).unwrap(), "4.0");
    }

    #[test]
    fn map_scalars_keeps_shape() {
        let t = Tensor::from([1.0, 2.0]).map_scalars(|v| v * 10.0);
        assert_eq!(t, Tensor::from([10.0, 20.0]));
    }
}
