//! World-space sampling of grid values.
use glam::{IVec3, Vec3};
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::grid::tree::SparseTree;
use crate::grid::value::VoxelValue;
use crate::grid::Grid;

/// Interpolation used when sampling between voxel centres.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SampleMode {
    /// Value of the nearest voxel.
    Point,
    /// Trilinear blend of the eight surrounding voxels.
    #[default]
    Linear,
}

/// Nearest voxel to an index-space point.
#[inline]
pub(crate) fn nearest(p: Vec3) -> IVec3 {
    p.round().as_ivec3()
}

pub(crate) fn sample_point<T: VoxelValue>(tree: &SparseTree<T>, p: Vec3) -> T {
    tree.value(nearest(p))
}

/// Trilinear interpolation at an index-space point. Inactive corners contribute background.
pub(crate) fn sample_linear<T: VoxelValue>(tree: &SparseTree<T>, p: Vec3) -> T {
    let base = p.floor();
    let f = (p - base).as_dvec3();
    let b = base.as_ivec3();

    let mut acc = T::zero();
    for dz in 0..2 {
        let wz = if dz == 0 { 1.0 - f.z } else { f.z };
        for dy in 0..2 {
            let wy = if dy == 0 { 1.0 - f.y } else { f.y };
            for dx in 0..2 {
                let wx = if dx == 0 { 1.0 - f.x } else { f.x };
                let w = wx * wy * wz;
                if w == 0.0 {
                    continue;
                }
                let v = tree.value_at_offset(b, IVec3::new(dx, dy, dz));
                acc = acc.add(v.scale(w));
            }
        }
    }
    acc
}

#[inline]
pub(crate) fn sample_index<T: VoxelValue>(tree: &SparseTree<T>, p: Vec3, mode: SampleMode) -> T {
    match mode {
        SampleMode::Point => sample_point(tree, p),
        SampleMode::Linear => sample_linear(tree, p),
    }
}

impl<T: VoxelValue> Grid<T> {
    /// Samples the grid at a world-space position.
    pub fn sample_world(
        &self,
        point: impl Into<mint::Vector3<f32>>,
        mode: SampleMode,
    ) -> Result<T> {
        let tree = self.tree()?;
        let p = self.transform().world_to_index(Vec3::from(point.into()))?;
        Ok(sample_index(tree, p, mode))
    }

    /// Samples many world-space positions in parallel. Results keep the input order.
    pub fn sample_world_batch(&self, points: &[Vec3], mode: SampleMode) -> Result<Vec<T>> {
        let tree = self.tree()?;
        let transform = self.transform();
        // Fail on a singular transform before fanning out.
        transform.world_to_index(Vec3::ZERO)?;
        debug!(
            "sampling grid '{}' at {} world points ({:?})",
            self.name(),
            points.len(),
            mode
        );
        points
            .par_iter()
            .map(|p| transform.world_to_index(*p).map(|i| sample_index(tree, i, mode)))
            .collect()
    }
}
