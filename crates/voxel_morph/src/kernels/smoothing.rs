//! Box-neighbourhood smoothing of scalar grids.
//!
//! Each iteration reads a snapshot of the grid and rewrites every active voxel
//! from the `(2w + 1)³` box around it. Voxels that are not active contribute the
//! background value. The active set never changes.
use glam::IVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::{Grid, ScalarValue};

/// Smoothing kernel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Gaussian weights with a standard deviation equal to the box half-width.
    #[default]
    Gaussian,
    /// Unweighted box average.
    Mean,
    /// Median of the box.
    Median,
}

impl TryFrom<i32> for FilterKind {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(FilterKind::Gaussian),
            1 => Ok(FilterKind::Mean),
            2 => Ok(FilterKind::Median),
            other => Err(Error::InvalidParameter(format!(
                "unknown filter code {other}"
            ))),
        }
    }
}

/// Largest accepted box half-width. The box holds `(2w + 1)³` offsets.
pub const MAX_FILTER_WIDTH: usize = 32;

fn box_offsets(width: i32) -> Vec<IVec3> {
    let mut out = Vec::with_capacity(((2 * width + 1) as usize).pow(3));
    for dz in -width..=width {
        for dy in -width..=width {
            for dx in -width..=width {
                out.push(IVec3::new(dx, dy, dz));
            }
        }
    }
    out
}

fn gaussian_weights(offsets: &[IVec3], width: i32) -> Vec<f64> {
    let sigma = width as f64;
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f64> = offsets
        .iter()
        .map(|o| (-(o.length_squared() as f64) / denom).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Smooths the active voxels of `grid` in place.
///
/// A `width` or `iterations` of zero leaves the grid unchanged. A `width`
/// above [`MAX_FILTER_WIDTH`] is rejected.
pub fn smooth<T: ScalarValue>(
    grid: &mut Grid<T>,
    width: usize,
    iterations: usize,
    kind: FilterKind,
) -> Result<()> {
    if width > MAX_FILTER_WIDTH {
        return Err(Error::InvalidParameter(format!(
            "filter width {width} exceeds {MAX_FILTER_WIDTH}"
        )));
    }
    let width = width as i32;
    let tree = grid.tree_mut()?;
    if width == 0 || iterations == 0 {
        return Ok(());
    }

    let offsets = box_offsets(width);
    let weights = match kind {
        FilterKind::Gaussian => gaussian_weights(&offsets, width),
        FilterKind::Mean | FilterKind::Median => Vec::new(),
    };
    let mut window = Vec::with_capacity(offsets.len());

    for _ in 0..iterations {
        let snapshot = tree.clone();
        for (c, _) in snapshot.iter_active() {
            window.clear();
            window.extend(
                offsets
                    .iter()
                    .map(|o| snapshot.value_at_offset(c, *o).to_f64()),
            );
            let filtered = match kind {
                FilterKind::Gaussian => window.iter().zip(&weights).map(|(v, w)| v * w).sum(),
                FilterKind::Mean => window.iter().sum::<f64>() / window.len() as f64,
                FilterKind::Median => {
                    window.sort_by(|a, b| a.total_cmp(b));
                    window[window.len() / 2]
                }
            };
            tree.set_value_on(c, T::from_f64(filtered));
        }
    }
    debug!(
        "smoothed {} active voxels ({:?}, width {}, {} iterations)",
        tree.active_count(),
        kind,
        width,
        iterations
    );
    Ok(())
}
