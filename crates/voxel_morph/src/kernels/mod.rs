//! Primitive grid kernels.
//!
//! These are the building blocks the composition layer in [`crate::ops`] and
//! [`crate::weathering`] is written against: single-step topology changes, box
//! smoothing, world-space resampling and element-wise arithmetic. Each kernel
//! mutates or produces one grid and knows nothing about compositions.
pub mod arithmetic;
pub mod resampling;
pub mod smoothing;
pub mod topology;
