//! Element-wise grid arithmetic.
//!
//! Operator codes keep the numbering used by existing grid tooling
//! (`CombineOp` 0..=8, `ScalarOp` 0..=9) so they can be read from plain integers
//! through `TryFrom<i32>`.
use std::collections::BTreeSet;

use glam::IVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::{Grid, ScalarValue, VoxelValue};

/// Voxel-wise binary operator between two grids of the same kind.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombineOp {
    Max,
    Min,
    Sum,
    /// `a - b`.
    Diff,
    /// `a` where `a > 0`, otherwise `b`.
    IfZero,
    Mul,
    /// Level-set difference, `max(a, -b)`.
    CsgDifference,
    /// Level-set union, `min(a, b)`.
    CsgUnion,
    /// Level-set intersection, `max(a, b)`.
    CsgIntersection,
}

impl CombineOp {
    /// Whether the operator assumes signed-distance semantics.
    pub fn is_csg(self) -> bool {
        matches!(
            self,
            CombineOp::CsgDifference | CombineOp::CsgUnion | CombineOp::CsgIntersection
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            CombineOp::Max => "max",
            CombineOp::Min => "min",
            CombineOp::Sum => "sum",
            CombineOp::Diff => "diff",
            CombineOp::IfZero => "if-zero",
            CombineOp::Mul => "mul",
            CombineOp::CsgDifference => "csg-difference",
            CombineOp::CsgUnion => "csg-union",
            CombineOp::CsgIntersection => "csg-intersection",
        }
    }

    #[inline]
    pub fn apply<T: VoxelValue>(self, a: T, b: T) -> T {
        match self {
            CombineOp::Max | CombineOp::CsgIntersection => a.max_of(b),
            CombineOp::Min | CombineOp::CsgUnion => a.min_of(b),
            CombineOp::Sum => a.add(b),
            CombineOp::Diff => a.sub(b),
            CombineOp::IfZero => {
                if a.is_positive() {
                    a
                } else {
                    b
                }
            }
            CombineOp::Mul => a.mul(b),
            CombineOp::CsgDifference => a.max_of(b.neg()),
        }
    }
}

impl TryFrom<i32> for CombineOp {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        Ok(match code {
            0 => CombineOp::Max,
            1 => CombineOp::Min,
            2 => CombineOp::Sum,
            3 => CombineOp::Diff,
            4 => CombineOp::IfZero,
            5 => CombineOp::Mul,
            6 => CombineOp::CsgDifference,
            7 => CombineOp::CsgUnion,
            8 => CombineOp::CsgIntersection,
            other => {
                return Err(Error::InvalidParameter(format!(
                    "unknown combine code {other}"
                )))
            }
        })
    }
}

/// Operator between every active voxel and a scalar.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarOp {
    Sum,
    Diff,
    Mul,
    Div,
    Pow,
    Min,
    Max,
    /// 1 where `v < n`, else 0.
    Lt,
    /// 1 where `v > n`, else 0.
    Gt,
    /// 1 where `v == n`, else 0.
    Eq,
}

impl ScalarOp {
    #[inline]
    pub fn apply(self, v: f64, n: f64) -> f64 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match self {
            ScalarOp::Sum => v + n,
            ScalarOp::Diff => v - n,
            ScalarOp::Mul => v * n,
            ScalarOp::Div => v / n,
            ScalarOp::Pow => v.powf(n),
            ScalarOp::Min => v.min(n),
            ScalarOp::Max => v.max(n),
            ScalarOp::Lt => flag(v < n),
            ScalarOp::Gt => flag(v > n),
            ScalarOp::Eq => flag(v == n),
        }
    }
}

impl TryFrom<i32> for ScalarOp {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        Ok(match code {
            0 => ScalarOp::Sum,
            1 => ScalarOp::Diff,
            2 => ScalarOp::Mul,
            3 => ScalarOp::Div,
            4 => ScalarOp::Pow,
            5 => ScalarOp::Min,
            6 => ScalarOp::Max,
            7 => ScalarOp::Lt,
            8 => ScalarOp::Gt,
            9 => ScalarOp::Eq,
            other => {
                return Err(Error::InvalidParameter(format!(
                    "unknown scalar operation code {other}"
                )))
            }
        })
    }
}

/// Applies `op` to `a` against `b` over the union of both active sets.
///
/// A voxel active in only one operand is combined against the other's
/// background. Every voxel in the union ends up active in `a`.
pub fn combine_in_place<T: VoxelValue>(a: &mut Grid<T>, b: &Grid<T>, op: CombineOp) -> Result<()> {
    if op.is_csg() && T::KIND.is_vector() {
        return Err(Error::unsupported(op.name(), T::KIND));
    }
    let rhs = b.tree()?;
    let lhs = a.tree_mut()?;

    let union: BTreeSet<(i32, i32, i32)> = lhs
        .iter_active()
        .chain(rhs.iter_active())
        .map(|(c, _)| (c.x, c.y, c.z))
        .collect();
    for (x, y, z) in union {
        let c = IVec3::new(x, y, z);
        let v = op.apply(lhs.value(c), rhs.value(c));
        lhs.set_value_on(c, v);
    }
    Ok(())
}

/// Applies `op` with the scalar `n` to every active voxel of `grid`.
pub fn scalar_in_place<T: ScalarValue>(grid: &mut Grid<T>, n: f64, op: ScalarOp) -> Result<()> {
    if op == ScalarOp::Div && n == 0.0 {
        return Err(Error::InvalidParameter("division by zero".into()));
    }
    if !n.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "scalar operand must be finite, got {n}"
        )));
    }
    let tree = grid.tree_mut()?;
    for c in tree.active_coords() {
        let v = op.apply(tree.value(c).to_f64(), n);
        tree.set_value_on(c, T::from_f64(v));
    }
    Ok(())
}
