//! Neighbourhood exposure measures.
use glam::Vec3;

use crate::error::Result;
use crate::grid::coord::unit_offsets;
use crate::grid::{Grid, CENTER_INDEX, NEIGHBORHOOD_SIZE, NEIGHBOR_COUNT};

/// Fraction of the 26 neighbours that are not above `threshold`.
///
/// 0 when every neighbour is occupied, 1 when none is. The centre value is ignored.
pub fn exposure(neighborhood: &[f32; NEIGHBORHOOD_SIZE], threshold: f32) -> f32 {
    let occupied = neighborhood
        .iter()
        .enumerate()
        .filter(|(i, v)| *i != CENTER_INDEX && **v > threshold)
        .count();
    1.0 - occupied as f32 / NEIGHBOR_COUNT as f32
}

/// Exposure towards `direction`: every empty neighbour (below `threshold`)
/// contributes `max(0, -direction · offset)`, normalized by 26.
///
/// `direction` is used as given, so its length scales the result.
pub fn directional_exposure(
    neighborhood: &[f32; NEIGHBORHOOD_SIZE],
    threshold: f32,
    direction: Vec3,
) -> f32 {
    let units = unit_offsets();
    let sum: f32 = neighborhood
        .iter()
        .zip(units.iter())
        .enumerate()
        .filter(|(i, (v, _))| *i != CENTER_INDEX && **v < threshold)
        .map(|(_, (_, u))| (-direction.dot(*u)).max(0.0))
        .sum();
    sum / NEIGHBOR_COUNT as f32
}

/// Grid of per-voxel exposure over the active voxels of `grid`.
///
/// The result shares name and transform with `grid` and has a zero background.
pub fn exposure_map(grid: &Grid<f32>, threshold: f32) -> Result<Grid<f32>> {
    let mut out = Grid::new(grid.name(), 0.0_f32).with_transform(grid.transform());
    for c in grid.active_coordinates()? {
        let n = grid.neighborhood(c)?;
        out.set_value(c, exposure(&n, threshold))?;
    }
    Ok(out)
}
