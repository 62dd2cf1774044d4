//! Smoothing and resampling for every grid kind.
//!
//! Scalar grids go straight to the kernels. Vector grids are split into one
//! scalar grid per component, processed channel by channel, and merged back:
//!
//! - resampling splits into X, Y, Z so sign and magnitude survive exactly;
//! - smoothing splits into X², Y², Z² and takes the square root after filtering,
//!   so every smoothed component comes back non-negative. Signed vector fields
//!   lose their direction here; split and merge the channels yourself if the
//!   sign matters.
use glam::Vec3;
use tracing::debug;

use crate::error::Result;
use crate::grid::{AnyGrid, Grid, ScalarValue};
use crate::kernels::resampling;
use crate::kernels::smoothing::{self, FilterKind};

/// Smoothed copy of a scalar grid.
pub fn smooth<T: ScalarValue>(
    grid: &Grid<T>,
    width: usize,
    iterations: usize,
    kind: FilterKind,
) -> Result<Grid<T>> {
    let mut out = grid.duplicate()?;
    smoothing::smooth(&mut out, width, iterations, kind)?;
    Ok(out)
}

/// Resampled copy of a scalar grid with a uniform `voxel_size`.
pub fn resample<T: ScalarValue>(grid: &Grid<T>, voxel_size: f32) -> Result<Grid<T>> {
    resampling::resample(grid, voxel_size)
}

/// Splits a vector grid into its X, Y and Z component grids.
///
/// Each channel keeps the source transform and active set; its name is the
/// source name suffixed with `.x`, `.y` or `.z`.
pub fn split_channels(grid: &Grid<Vec3>) -> Result<[Grid<f32>; 3]> {
    map_channels(grid, |v| v)
}

/// Channel grids holding `f` of each component, background included.
fn map_channels(grid: &Grid<Vec3>, f: impl Fn(f32) -> f32) -> Result<[Grid<f32>; 3]> {
    let tree = grid.tree()?;
    let bg = tree.background();
    let channel = |suffix: &str, bg: f32| {
        Grid::new(format!("{}.{}", grid.name(), suffix), f(bg)).with_transform(grid.transform())
    };
    let mut channels = [channel("x", bg.x), channel("y", bg.y), channel("z", bg.z)];
    for (c, v) in tree.iter_active() {
        for (ch, value) in channels.iter_mut().zip([v.x, v.y, v.z]) {
            ch.tree_mut()?.set_value_on(c, f(value));
        }
    }
    Ok(channels)
}

/// Builds a vector grid from three component grids.
///
/// The active set is the union of the channels' active sets and each component
/// is read from its own channel (background where that channel is inactive).
/// Name and transform come from the X channel.
pub fn merge_channels(x: &Grid<f32>, y: &Grid<f32>, z: &Grid<f32>) -> Result<Grid<Vec3>> {
    let (tx, ty, tz) = (x.tree()?, y.tree()?, z.tree()?);
    let bg = Vec3::new(tx.background(), ty.background(), tz.background());
    let mut out = Grid::new(x.name(), bg).with_transform(x.transform());
    let tree = out.tree_mut()?;
    for (c, _) in tx.iter_active().chain(ty.iter_active()).chain(tz.iter_active()) {
        tree.set_value_on(c, Vec3::new(tx.value(c), ty.value(c), tz.value(c)));
    }
    Ok(out)
}

/// Resamples a vector grid channel by channel.
pub fn resample_vector(grid: &Grid<Vec3>, voxel_size: f32) -> Result<Grid<Vec3>> {
    let [x, y, z] = split_channels(grid)?;
    let (x, y, z) = (
        resampling::resample(&x, voxel_size)?,
        resampling::resample(&y, voxel_size)?,
        resampling::resample(&z, voxel_size)?,
    );
    let mut out = merge_channels(&x, &y, &z)?;
    out.set_name(grid.name());
    debug!(
        "resampled vector grid '{}' to voxel size {}",
        grid.name(),
        voxel_size
    );
    Ok(out)
}

/// Smooths a vector grid through its squared components.
///
/// The result is a duplicate of `grid` whose active voxels hold
/// `(√x̃², √ỹ², √z̃²)`, where `x̃²` is the smoothed squared X channel. The
/// squared channels carry the squared background, so inactive neighbours
/// contribute `bg.x²`. Component signs are not preserved.
pub fn smooth_vector(
    grid: &Grid<Vec3>,
    width: usize,
    iterations: usize,
    kind: FilterKind,
) -> Result<Grid<Vec3>> {
    let mut out = grid.duplicate()?;
    let mut squared = map_channels(grid, |v| v * v)?;
    for ch in squared.iter_mut() {
        smoothing::smooth(ch, width, iterations, kind)?;
    }
    let [x2, y2, z2] = &squared;
    let tree = out.tree_mut()?;
    for c in tree.active_coords() {
        let v = Vec3::new(
            x2.value(c)?.max(0.0).sqrt(),
            y2.value(c)?.max(0.0).sqrt(),
            z2.value(c)?.max(0.0).sqrt(),
        );
        tree.set_value_on(c, v);
    }
    debug!(
        "smoothed vector grid '{}' ({:?}, width {}, {} iterations)",
        grid.name(),
        kind,
        width,
        iterations
    );
    Ok(out)
}

impl AnyGrid {
    /// Smoothed copy of any grid kind.
    pub fn smooth(&self, width: usize, iterations: usize, kind: FilterKind) -> Result<AnyGrid> {
        Ok(match self {
            AnyGrid::Float(g) => smooth(g, width, iterations, kind)?.into(),
            AnyGrid::Double(g) => smooth(g, width, iterations, kind)?.into(),
            AnyGrid::Int32(g) => smooth(g, width, iterations, kind)?.into(),
            AnyGrid::Vec3(g) => smooth_vector(g, width, iterations, kind)?.into(),
        })
    }

    /// Resampled copy of any grid kind.
    pub fn resample(&self, voxel_size: f32) -> Result<AnyGrid> {
        Ok(match self {
            AnyGrid::Float(g) => resample(g, voxel_size)?.into(),
            AnyGrid::Double(g) => resample(g, voxel_size)?.into(),
            AnyGrid::Int32(g) => resample(g, voxel_size)?.into(),
            AnyGrid::Vec3(g) => resample_vector(g, voxel_size)?.into(),
        })
    }
}
