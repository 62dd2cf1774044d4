//! Activation-mask dilation and erosion over the 26-neighbourhood.
//!
//! Both kernels change only the active state. Dilation activates every inactive
//! neighbour of an active voxel (the new voxel shows its stored value, or the
//! background if none was stored). Erosion deactivates every active voxel that
//! touches an inactive one; the value stays stored so a later dilation brings
//! it back.
use std::collections::BTreeSet;

use glam::IVec3;

use crate::error::Result;
use crate::grid::{offset_coord, Coord, Grid, VoxelValue, CENTER_INDEX, NEIGHBORHOOD_OFFSETS};

/// The 26 neighbours of `c`; `None` for those past the `i32` range.
fn neighbours(c: Coord) -> impl Iterator<Item = Option<Coord>> {
    NEIGHBORHOOD_OFFSETS
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != CENTER_INDEX)
        .map(move |(_, o)| offset_coord(c, *o))
}

fn key(c: IVec3) -> (i32, i32, i32) {
    (c.x, c.y, c.z)
}

/// Grows the active set by `iterations` voxel layers.
pub fn dilate<T: VoxelValue>(grid: &mut Grid<T>, iterations: usize) -> Result<()> {
    let tree = grid.tree_mut()?;
    for _ in 0..iterations {
        let mut frontier = BTreeSet::new();
        for c in tree.active_coords() {
            for n in neighbours(c).flatten() {
                if !tree.is_active(n) {
                    frontier.insert(key(n));
                }
            }
        }
        if frontier.is_empty() {
            break;
        }
        for (x, y, z) in frontier {
            tree.set_active(IVec3::new(x, y, z), true);
        }
    }
    Ok(())
}

/// Shrinks the active set by `iterations` voxel layers.
pub fn erode<T: VoxelValue>(grid: &mut Grid<T>, iterations: usize) -> Result<()> {
    let tree = grid.tree_mut()?;
    for _ in 0..iterations {
        let boundary: Vec<Coord> = tree
            .active_coords()
            .into_iter()
            .filter(|c| neighbours(*c).any(|n| n.is_none_or(|n| !tree.is_active(n))))
            .collect();
        if boundary.is_empty() {
            break;
        }
        for c in boundary {
            tree.set_active(c, false);
        }
    }
    Ok(())
}
