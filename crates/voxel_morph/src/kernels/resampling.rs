//! World-space resampling of scalar grids onto a new voxel size.
use glam::{IVec3, Vec3};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::grid::sample::{nearest, sample_linear};
use crate::grid::{Grid, GridTransform, ScalarValue};

/// Resamples `grid` into a new grid whose transform is a uniform scale of `voxel_size`.
///
/// A target voxel is active when the source voxel nearest to its world position
/// is active; its value is the trilinear blend of the source at that position.
pub fn resample<T: ScalarValue>(grid: &Grid<T>, voxel_size: f32) -> Result<Grid<T>> {
    if !voxel_size.is_finite() || voxel_size <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "voxel size must be finite and positive, got {voxel_size}"
        )));
    }
    let source = grid.tree()?;
    let source_xf = grid.transform();
    let target_xf = GridTransform::uniform(voxel_size);
    let mut out = grid.empty_like()?.with_transform(target_xf);

    let Some((lo, hi)) = source.active_bounds() else {
        warn!("resampling empty grid '{}'", grid.name());
        return Ok(out);
    };

    let (lo, hi) = (lo.as_vec3() - 0.5, hi.as_vec3() + 0.5);
    let mut t_lo = Vec3::splat(f32::INFINITY);
    let mut t_hi = Vec3::splat(f32::NEG_INFINITY);
    for i in 0..8 {
        let corner = Vec3::new(
            if i & 1 == 0 { lo.x } else { hi.x },
            if i & 2 == 0 { lo.y } else { hi.y },
            if i & 4 == 0 { lo.z } else { hi.z },
        );
        let t = target_xf.world_to_index(source_xf.index_to_world(corner))?;
        t_lo = t_lo.min(t);
        t_hi = t_hi.max(t);
    }
    let (t_lo, t_hi) = (t_lo.floor().as_ivec3(), t_hi.ceil().as_ivec3());

    let tree = out.tree_mut()?;
    for z in t_lo.z..=t_hi.z {
        for y in t_lo.y..=t_hi.y {
            for x in t_lo.x..=t_hi.x {
                let c = IVec3::new(x, y, z);
                let world = target_xf.index_to_world(c.as_vec3());
                let p = source_xf.world_to_index(world)?;
                if source.is_active(nearest(p)) {
                    tree.set_value_on(c, sample_linear(source, p));
                }
            }
        }
    }
    debug!(
        "resampled '{}' to voxel size {}: {} -> {} active voxels",
        grid.name(),
        voxel_size,
        source.active_count(),
        tree.active_count()
    );
    Ok(out)
}
