//! Non-mutating grid combination.
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::{AnyGrid, Grid, ScalarValue, VoxelValue};
use crate::kernels::arithmetic::{combine_in_place, scalar_in_place, CombineOp, ScalarOp};
use crate::ops::PRUNE_TOLERANCE;

/// Combines `a` with `b` into a new grid. Neither operand is modified.
///
/// The result is a duplicate of `a` (name, transform, background) with `op`
/// applied over the union of both active sets.
pub fn combine<T: VoxelValue>(a: &Grid<T>, b: &Grid<T>, op: CombineOp) -> Result<Grid<T>> {
    if op.is_csg() && T::KIND.is_vector() {
        return Err(Error::unsupported(op.name(), T::KIND));
    }
    b.tree()?;
    let mut out = a.duplicate()?;
    combine_in_place(&mut out, b, op)?;
    debug!(
        "combined '{}' {} '{}' -> {} active voxels",
        a.name(),
        op.name(),
        b.name(),
        out.active_voxel_count()?
    );
    Ok(out)
}

/// Same as [`combine`], then prunes the result.
pub fn combine_pruned<T: VoxelValue>(a: &Grid<T>, b: &Grid<T>, op: CombineOp) -> Result<Grid<T>> {
    let mut out = combine(a, b, op)?;
    out.prune(PRUNE_TOLERANCE)?;
    Ok(out)
}

/// Left fold of `op` over `first` and every grid in `rest`. The result is pruned.
pub fn combine_all<T: VoxelValue>(
    first: &Grid<T>,
    rest: &[Grid<T>],
    op: CombineOp,
) -> Result<Grid<T>> {
    if rest.is_empty() {
        return Err(Error::InvalidParameter(
            "combining needs at least two grids".into(),
        ));
    }
    if op.is_csg() && T::KIND.is_vector() {
        return Err(Error::unsupported(op.name(), T::KIND));
    }
    for g in rest {
        g.tree()?;
    }
    let mut acc = first.duplicate()?;
    for g in rest {
        combine_in_place(&mut acc, g, op)?;
    }
    acc.prune(PRUNE_TOLERANCE)?;
    Ok(acc)
}

/// Applies a scalar operation to a copy of `grid`.
pub fn combine_scalar<T: ScalarValue>(grid: &Grid<T>, n: f64, op: ScalarOp) -> Result<Grid<T>> {
    let mut out = grid.duplicate()?;
    scalar_in_place(&mut out, n, op)?;
    Ok(out)
}

impl AnyGrid {
    /// Kind-erased [`combine`]. Both operands must share a value kind.
    pub fn combine(&self, other: &AnyGrid, op: CombineOp) -> Result<AnyGrid> {
        Ok(match (self, other) {
            (AnyGrid::Float(a), AnyGrid::Float(b)) => combine(a, b, op)?.into(),
            (AnyGrid::Double(a), AnyGrid::Double(b)) => combine(a, b, op)?.into(),
            (AnyGrid::Int32(a), AnyGrid::Int32(b)) => combine(a, b, op)?.into(),
            (AnyGrid::Vec3(a), AnyGrid::Vec3(b)) => combine(a, b, op)?.into(),
            (a, b) => {
                return Err(Error::KindMismatch {
                    expected: a.kind(),
                    found: b.kind(),
                })
            }
        })
    }

    /// Kind-erased [`combine_scalar`]. Vector grids are not supported.
    pub fn combine_scalar(&self, n: f64, op: ScalarOp) -> Result<AnyGrid> {
        Ok(match self {
            AnyGrid::Float(g) => combine_scalar(g, n, op)?.into(),
            AnyGrid::Double(g) => combine_scalar(g, n, op)?.into(),
            AnyGrid::Int32(g) => combine_scalar(g, n, op)?.into(),
            AnyGrid::Vec3(_) => return Err(Error::unsupported("scalar combine", self.kind())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn rand01(rng: &mut StdRng) -> f32 {
        (rng.next_u32() as f64 / u32::MAX as f64) as f32
    }

    fn random_grid(seed: u64, name: &str) -> Grid<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = Grid::new(name, 0.0_f32);
        for _ in 0..200 {
            let c = IVec3::new(
                (rng.next_u32() % 8) as i32,
                (rng.next_u32() % 8) as i32,
                (rng.next_u32() % 8) as i32,
            );
            grid.set_value(c, rand01(&mut rng) * 10.0 - 5.0)
                .expect("live grid");
        }
        grid
    }

    fn union_values(a: &Grid<f32>, b: &Grid<f32>) -> Vec<IVec3> {
        let mut coords = a.active_coordinates().expect("live grid");
        coords.extend(b.active_coordinates().expect("live grid"));
        coords.sort_by_key(|c| (c.x, c.y, c.z));
        coords.dedup();
        coords
    }

    #[test]
    fn inputs_are_never_mutated() {
        let a = random_grid(1, "a");
        let b = random_grid(2, "b");
        let (a0, b0) = (a.duplicate().expect("live"), b.duplicate().expect("live"));
        let out = combine(&a, &b, CombineOp::Sum).expect("same kind");
        assert_eq!(a, a0);
        assert_eq!(b, b0);
        assert_eq!(out.name(), "a");
    }

    #[test]
    fn max_and_min_are_commutative_and_idempotent() {
        let a = random_grid(3, "a");
        let b = random_grid(4, "b");
        let coords = union_values(&a, &b);
        for op in [CombineOp::Max, CombineOp::Min] {
            let ab = combine(&a, &b, op).expect("same kind");
            let ba = combine(&b, &a, op).expect("same kind");
            assert_eq!(
                ab.values_at(&coords).expect("live"),
                ba.values_at(&coords).expect("live")
            );

            let aa = combine(&a, &a, op).expect("same kind");
            let a_coords = a.active_coordinates().expect("live");
            assert_eq!(aa.active_coordinates().expect("live"), a_coords);
            assert_eq!(
                aa.values_at(&a_coords).expect("live"),
                a.values_at(&a_coords).expect("live")
            );
        }
    }

    #[test]
    fn sum_is_associative_within_tolerance() {
        let a = random_grid(5, "a");
        let b = random_grid(6, "b");
        let c = random_grid(7, "c");
        let left = combine(&combine(&a, &b, CombineOp::Sum).expect("ok"), &c, CombineOp::Sum)
            .expect("ok");
        let right = combine(&a, &combine(&b, &c, CombineOp::Sum).expect("ok"), CombineOp::Sum)
            .expect("ok");
        let coords = left.active_coordinates().expect("live");
        assert_eq!(coords, right.active_coordinates().expect("live"));
        for (l, r) in left
            .values_at(&coords)
            .expect("live")
            .into_iter()
            .zip(right.values_at(&coords).expect("live"))
        {
            assert!((l - r).abs() < 1e-4);
        }
    }

    #[test]
    fn combine_all_folds_and_rejects_empty_list() {
        let a = random_grid(8, "a");
        let rest = vec![random_grid(9, "b"), random_grid(10, "c")];
        let folded = combine_all(&a, &rest, CombineOp::Max).expect("non-empty");
        let stepwise = combine(
            &combine(&a, &rest[0], CombineOp::Max).expect("ok"),
            &rest[1],
            CombineOp::Max,
        )
        .expect("ok");
        let coords = stepwise.active_coordinates().expect("live");
        assert_eq!(folded.active_coordinates().expect("live"), coords);
        assert_eq!(
            folded.values_at(&coords).expect("live"),
            stepwise.values_at(&coords).expect("live")
        );

        assert!(matches!(
            combine_all(&a, &[], CombineOp::Max),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let f = AnyGrid::new("f", crate::grid::ValueKind::Float);
        let d = AnyGrid::new("d", crate::grid::ValueKind::Double);
        assert!(matches!(
            f.combine(&d, CombineOp::Sum),
            Err(Error::KindMismatch { .. })
        ));
    }

    #[test]
    fn vector_csg_is_rejected_without_touching_inputs() {
        let mut a = Grid::new("va", Vec3::ZERO);
        a.set_value(IVec3::ZERO, Vec3::ONE).expect("live");
        let b = a.duplicate().expect("live");
        assert!(matches!(
            combine(&a, &b, CombineOp::CsgDifference),
            Err(Error::Unsupported { .. })
        ));
        assert_eq!(a, b);
    }

    #[test]
    fn disposed_operand_is_reported() {
        let a = random_grid(11, "a");
        let mut b = random_grid(12, "b");
        b.dispose();
        assert!(matches!(
            combine(&a, &b, CombineOp::Sum),
            Err(Error::Disposed { ref name }) if name == "b"
        ));
    }

    #[test]
    fn scalar_combine_copies() {
        let a = random_grid(13, "a");
        let out = combine_scalar(&a, 2.0, ScalarOp::Sum).expect("finite");
        let coords = a.active_coordinates().expect("live");
        for (o, v) in out
            .values_at(&coords)
            .expect("live")
            .into_iter()
            .zip(a.values_at(&coords).expect("live"))
        {
            assert!((o - (v + 2.0)).abs() < 1e-6);
        }
        let any = AnyGrid::from(Grid::new("v", Vec3::ZERO));
        assert!(matches!(
            any.combine_scalar(1.0, ScalarOp::Sum),
            Err(Error::Unsupported { .. })
        ));
    }
}
