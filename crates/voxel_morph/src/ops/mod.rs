//! Composition layer over the primitive kernels.
//!
//! - combine: non-mutating voxel-wise combination of grids (and of a grid with a scalar)
//! - filter: smoothing and resampling, with channel decomposition for vector grids
//! - morphology: dilate/erode and their open/close/proper/auto-median compositions
//! - mask: thresholding and masking by another grid's active set
pub mod combine;
pub mod filter;
pub mod mask;
pub mod morphology;

/// Tolerance used when pruning intermediate results of compositions.
pub const PRUNE_TOLERANCE: f32 = 0.0;
