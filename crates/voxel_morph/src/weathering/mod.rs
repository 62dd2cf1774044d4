//! Exposure-driven erosion of float grids.
//!
//! - exposure: isotropic and directional neighbourhood exposure, plus an exposure map
//! - bias: optional direction or plane that adds decay on top of exposure
//! - params: step parameters with builder and validation
//! - simulator: stateful stepping over a working copy of a grid
pub mod bias;
pub mod exposure;
pub mod params;
pub mod simulator;

pub use bias::{BiasPlane, ErosionBias};
pub use exposure::{directional_exposure, exposure, exposure_map};
pub use params::{ErosionParams, Traversal};
pub use simulator::{ErosionSimulator, StepReport};
