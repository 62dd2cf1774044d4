//! Thresholding and masking by active set.
use std::cmp::Ordering;

use crate::error::Result;
use crate::grid::{AnyGrid, Grid, ScalarValue, VoxelValue};

/// Copy of `grid` keeping only the active voxels whose value is above `t`.
///
/// Dropped voxels are deactivated, not erased.
pub fn threshold<T: ScalarValue>(grid: &Grid<T>, t: T) -> Result<Grid<T>> {
    let mut out = grid.duplicate()?;
    let tree = out.tree_mut()?;
    let below: Vec<_> = tree
        .iter_active()
        .filter(|(_, v)| v.partial_cmp(&t) != Some(Ordering::Greater))
        .map(|(c, _)| c)
        .collect();
    for c in below {
        tree.set_active(c, false);
    }
    Ok(out)
}

/// New grid holding `grid`'s values at every active coordinate of `mask`.
///
/// Name, background and transform come from `grid`. Every masked voxel is
/// active, including those that read as background in `grid`.
pub fn mask<T: VoxelValue>(grid: &Grid<T>, mask: &AnyGrid) -> Result<Grid<T>> {
    let source = grid.tree()?;
    let coords = mask.active_coordinates()?;
    let mut out = grid.empty_like()?;
    let tree = out.tree_mut()?;
    for c in coords {
        tree.set_value_on(c, source.value(c));
    }
    Ok(out)
}

impl AnyGrid {
    /// Kind-erased [`mask`].
    pub fn mask(&self, mask_grid: &AnyGrid) -> Result<AnyGrid> {
        Ok(match self {
            AnyGrid::Float(g) => mask(g, mask_grid)?.into(),
            AnyGrid::Double(g) => mask(g, mask_grid)?.into(),
            AnyGrid::Int32(g) => mask(g, mask_grid)?.into(),
            AnyGrid::Vec3(g) => mask(g, mask_grid)?.into(),
        })
    }
}
