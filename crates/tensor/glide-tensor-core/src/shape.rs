//! Shape descriptions and structural compatibility checks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TensorError;
use crate::value::Tensor;

/// Structural type of a tensor: the kind at every position and the length of
/// every sequence. Leaf values are not part of the shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "id", content = "data")]
pub enum TensorShape {
    Scalar,
    Seq(Vec<TensorShape>),
}

impl TensorShape {
    /// Maximum nesting depth; a scalar has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TensorShape::Scalar => 0,
            TensorShape::Seq(items) => 1 + items.iter().map(TensorShape::depth).max().unwrap_or(0),
        }
    }
}

impl Tensor {
    pub fn shape(&self) -> TensorShape {
        match self {
            Tensor::Scalar(_) => TensorShape::Scalar,
            Tensor::Seq(items) => TensorShape::Seq(items.iter().map(Tensor::shape).collect()),
        }
    }

    /// True when `self` and `other` can be interpolated together.
    pub fn same_shape(&self, other: &Tensor) -> bool {
        check_compatible(self, other).is_ok()
    }
}

/// Sequence indices from the root to a node, displayed as `$[1][0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexPath(Vec<usize>);

impl IndexPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut next = self.0.clone();
        next.push(index);
        IndexPath(next)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for IndexPath {
    fn from(indices: Vec<usize>) -> Self {
        IndexPath(indices)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for i in &self.0 {
            write!(f, "[{i}]")?;
        }
        Ok(())
    }
}

/// Walk `a` and `b` together and report the first structural mismatch.
///
/// Kind is checked before length at every level, matching the order the
/// interpolation kernels use.
pub fn check_compatible(a: &Tensor, b: &Tensor) -> Result<(), TensorError> {
    check_at(a, b, &IndexPath::root())
}

fn check_at(a: &Tensor, b: &Tensor, path: &IndexPath) -> Result<(), TensorError> {
    match (a, b) {
        (Tensor::Scalar(_), Tensor::Scalar(_)) => Ok(()),
        (Tensor::Seq(xs), Tensor::Seq(ys)) => {
            if xs.len() != ys.len() {
                return Err(TensorError::ShapeMismatch {
                    path: path.clone(),
                    expected: xs.len(),
                    found: ys.len(),
                });
            }
            for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                check_at(x, y, &path.child(i))?;
            }
            Ok(())
        }
        _ => Err(TensorError::TypeMismatch {
            path: path.clone(),
            expected: a.kind(),
            found: b.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TensorKind;

    #[test]
    fn path_display() {
        assert_eq!(IndexPath::root().to_string(), "$");
        assert_eq!(IndexPath::root().child(1).child(0).to_string(), "$[1][0]");
    }

    #[test]
    fn nested_kind_mismatch_reports_path() {
        let a = Tensor::from(vec![Tensor::from(1.0), Tensor::from([2.0, 3.0])]);
        let b = Tensor::from(vec![Tensor::from(1.0), Tensor::from(vec![Tensor::from(2.0), Tensor::from([3.0])])]);
        let err = check_compatible(&a, &b).unwrap_err();
        assert_eq!(
            err,
            TensorError::TypeMismatch {
                path: IndexPath::from(vec![1, 1]),
                expected: TensorKind::Scalar,
                found: TensorKind::Seq,
            }
        );
    }

    #[test]
    fn shape_depth() {
        let t = Tensor::from(vec![Tensor::from(1.0), Tensor::from(vec![Tensor::from([2.0])])]);
        assert_eq!(t.shape().depth(), 3);
        assert_eq!(Tensor::from(1.0).shape().depth(), 0);
    }
}
