#![forbid(unsafe_code)]
//! voxel_morph: Sparse voxel grids with morphology, filtering and exposure-driven erosion.
//!
//! Modules:
//! - grid: sparse grid handle, coordinates, value kinds, transforms, world-space sampling
//! - kernels: primitive topology, smoothing, resampling and combine arithmetic
//! - ops: composition layer (combine, filter/resample adapter, morphology, masks)
//! - weathering: neighbourhood exposure and the stateful erosion simulator
//!
//! For examples and docs, see README and the `voxel_morph_examples` crate.
pub mod error;
pub mod grid;
pub mod kernels;
pub mod ops;
pub mod weathering;

/// Convenient re-exports for common types. Import with `use voxel_morph::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::{
        AnyGrid, Coord, Grid, GridTransform, SampleMode, ScalarValue, ValueKind, VoxelValue,
        CENTER_INDEX, NEIGHBORHOOD_SIZE, NEIGHBOR_COUNT,
    };
    pub use crate::kernels::arithmetic::{CombineOp, ScalarOp};
    pub use crate::kernels::smoothing::{FilterKind, MAX_FILTER_WIDTH};
    pub use crate::ops::combine::{combine, combine_all, combine_pruned, combine_scalar};
    pub use crate::ops::filter::{
        merge_channels, resample, resample_vector, smooth, smooth_vector, split_channels,
    };
    pub use crate::ops::mask::{mask, threshold};
    pub use crate::ops::morphology::{morph, morph_in_place, MorphOp};
    pub use crate::weathering::{
        directional_exposure, exposure, exposure_map, BiasPlane, ErosionBias, ErosionParams,
        ErosionSimulator, StepReport, Traversal,
    };
}
