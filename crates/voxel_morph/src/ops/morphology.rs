//! Grayscale morphology compositions.
//!
//! [`MorphOp::Dilate`] and [`MorphOp::Erode`] hand the iteration count straight to
//! the topology kernels. Every other operator repeats its per-iteration sequence
//! `iterations` times on the current grid state:
//!
//! | Operator | One iteration |
//! |---|---|
//! | `Open` | erode, dilate |
//! | `Close` | dilate, erode |
//! | `ProperOpen` | `I = G`; erode, dilate, dilate, erode, erode, dilate; `G = min(I, G)` |
//! | `ProperClose` | `I = G`; dilate, erode, erode, dilate, dilate, erode; `G = max(I, G)` |
//! | `AutoMedian` | `min(ProperOpen(G), ProperClose(G))`, both taken from the same `G` |
//!
//! The min/max recombinations are pruned. Proper and auto-median operators need
//! an ordering, so vector grids reject them up front.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::{AnyGrid, Grid, VoxelValue};
use crate::kernels::arithmetic::CombineOp;
use crate::kernels::topology::{dilate, erode};
use crate::ops::combine::combine_pruned;

/// Morphological operator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MorphOp {
    Dilate,
    Erode,
    Open,
    Close,
    ProperOpen,
    ProperClose,
    AutoMedian,
}

impl MorphOp {
    pub fn name(self) -> &'static str {
        match self {
            MorphOp::Dilate => "dilate",
            MorphOp::Erode => "erode",
            MorphOp::Open => "open",
            MorphOp::Close => "close",
            MorphOp::ProperOpen => "proper-open",
            MorphOp::ProperClose => "proper-close",
            MorphOp::AutoMedian => "auto-median",
        }
    }

    /// Whether the operator recombines with min/max against the input.
    pub fn needs_ordering(self) -> bool {
        matches!(
            self,
            MorphOp::ProperOpen | MorphOp::ProperClose | MorphOp::AutoMedian
        )
    }
}

impl TryFrom<i32> for MorphOp {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        Ok(match code {
            0 => MorphOp::Dilate,
            1 => MorphOp::Erode,
            2 => MorphOp::Open,
            3 => MorphOp::Close,
            4 => MorphOp::ProperOpen,
            5 => MorphOp::ProperClose,
            6 => MorphOp::AutoMedian,
            other => {
                return Err(Error::InvalidParameter(format!(
                    "unknown morphology code {other}"
                )))
            }
        })
    }
}

fn open_close_open<T: VoxelValue>(grid: &mut Grid<T>) -> Result<()> {
    erode(grid, 1)?;
    dilate(grid, 1)?;
    dilate(grid, 1)?;
    erode(grid, 1)?;
    erode(grid, 1)?;
    dilate(grid, 1)
}

fn close_open_close<T: VoxelValue>(grid: &mut Grid<T>) -> Result<()> {
    dilate(grid, 1)?;
    erode(grid, 1)?;
    erode(grid, 1)?;
    dilate(grid, 1)?;
    dilate(grid, 1)?;
    erode(grid, 1)
}

fn proper_open<T: VoxelValue>(grid: &Grid<T>) -> Result<Grid<T>> {
    let mut work = grid.duplicate()?;
    open_close_open(&mut work)?;
    combine_pruned(grid, &work, CombineOp::Min)
}

fn proper_close<T: VoxelValue>(grid: &Grid<T>) -> Result<Grid<T>> {
    let mut work = grid.duplicate()?;
    close_open_close(&mut work)?;
    combine_pruned(grid, &work, CombineOp::Max)
}

/// Applies `op` to `grid` in place.
pub fn morph_in_place<T: VoxelValue>(
    grid: &mut Grid<T>,
    op: MorphOp,
    iterations: usize,
) -> Result<()> {
    if op.needs_ordering() && T::KIND.is_vector() {
        return Err(Error::unsupported(op.name(), T::KIND));
    }
    grid.tree()?;

    match op {
        MorphOp::Dilate => dilate(grid, iterations)?,
        MorphOp::Erode => erode(grid, iterations)?,
        MorphOp::Open => {
            for _ in 0..iterations {
                erode(grid, 1)?;
                dilate(grid, 1)?;
            }
        }
        MorphOp::Close => {
            for _ in 0..iterations {
                dilate(grid, 1)?;
                erode(grid, 1)?;
            }
        }
        MorphOp::ProperOpen => {
            for _ in 0..iterations {
                *grid = proper_open(grid)?;
            }
        }
        MorphOp::ProperClose => {
            for _ in 0..iterations {
                *grid = proper_close(grid)?;
            }
        }
        MorphOp::AutoMedian => {
            for _ in 0..iterations {
                let opened = proper_open(grid)?;
                let closed = proper_close(grid)?;
                *grid = combine_pruned(&opened, &closed, CombineOp::Min)?;
            }
        }
    }
    debug!(
        "{} x{} on '{}' -> {} active voxels",
        op.name(),
        iterations,
        grid.name(),
        grid.active_voxel_count()?
    );
    Ok(())
}

/// Applies `op` to a copy of `grid`.
pub fn morph<T: VoxelValue>(grid: &Grid<T>, op: MorphOp, iterations: usize) -> Result<Grid<T>> {
    if op.needs_ordering() && T::KIND.is_vector() {
        return Err(Error::unsupported(op.name(), T::KIND));
    }
    let mut out = grid.duplicate()?;
    morph_in_place(&mut out, op, iterations)?;
    Ok(out)
}

impl AnyGrid {
    /// Kind-erased [`morph`].
    pub fn morph(&self, op: MorphOp, iterations: usize) -> Result<AnyGrid> {
        Ok(match self {
            AnyGrid::Float(g) => morph(g, op, iterations)?.into(),
            AnyGrid::Double(g) => morph(g, op, iterations)?.into(),
            AnyGrid::Int32(g) => morph(g, op, iterations)?.into(),
            AnyGrid::Vec3(g) => morph(g, op, iterations)?.into(),
        })
    }
}
