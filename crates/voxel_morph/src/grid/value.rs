//! Voxel value types.
//!
//! [`VoxelValue`] is the arithmetic every grid value supports (enough for the
//! combine operators and linear interpolation). [`ScalarValue`] adds ordering and
//! a lossless-enough round trip through `f64`, which the smoothing and resampling
//! kernels need.
use std::fmt;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The value kind stored by a grid.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Double,
    Int32,
    Vec3f,
}

impl ValueKind {
    /// Whether values of this kind have more than one component.
    #[inline]
    pub fn is_vector(self) -> bool {
        matches!(self, ValueKind::Vec3f)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Int32 => "int32",
            ValueKind::Vec3f => "vec3f",
        };
        f.write_str(name)
    }
}

/// Value stored in a voxel.
pub trait VoxelValue: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    const KIND: ValueKind;

    fn zero() -> Self;
    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn mul(self, other: Self) -> Self;
    fn neg(self) -> Self;
    /// Component-wise maximum.
    fn max_of(self, other: Self) -> Self;
    /// Component-wise minimum.
    fn min_of(self, other: Self) -> Self;
    /// Multiply by a real weight (used for interpolation).
    fn scale(self, s: f64) -> Self;
    /// `true` when the value is strictly greater than zero. Vectors compare by length.
    fn is_positive(self) -> bool;
    /// Whether `self` and `other` differ by at most `tolerance` in every component.
    fn within(self, other: Self, tolerance: f32) -> bool;
}

/// Single-component value with an ordering.
pub trait ScalarValue: VoxelValue + PartialOrd {
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

impl VoxelValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    #[inline]
    fn zero() -> Self {
        0.0
    }
    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }
    #[inline]
    fn sub(self, other: Self) -> Self {
        self - other
    }
    #[inline]
    fn mul(self, other: Self) -> Self {
        self * other
    }
    #[inline]
    fn neg(self) -> Self {
        -self
    }
    #[inline]
    fn max_of(self, other: Self) -> Self {
        self.max(other)
    }
    #[inline]
    fn min_of(self, other: Self) -> Self {
        self.min(other)
    }
    #[inline]
    fn scale(self, s: f64) -> Self {
        (self as f64 * s) as f32
    }
    #[inline]
    fn is_positive(self) -> bool {
        self > 0.0
    }
    #[inline]
    fn within(self, other: Self, tolerance: f32) -> bool {
        (self - other).abs() <= tolerance
    }
}

impl ScalarValue for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl VoxelValue for f64 {
    const KIND: ValueKind = ValueKind::Double;

    #[inline]
    fn zero() -> Self {
        0.0
    }
    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }
    #[inline]
    fn sub(self, other: Self) -> Self {
        self - other
    }
    #[inline]
    fn mul(self, other: Self) -> Self {
        self * other
    }
    #[inline]
    fn neg(self) -> Self {
        -self
    }
    #[inline]
    fn max_of(self, other: Self) -> Self {
        self.max(other)
    }
    #[inline]
    fn min_of(self, other: Self) -> Self {
        self.min(other)
    }
    #[inline]
    fn scale(self, s: f64) -> Self {
        self * s
    }
    #[inline]
    fn is_positive(self) -> bool {
        self > 0.0
    }
    #[inline]
    fn within(self, other: Self, tolerance: f32) -> bool {
        (self - other).abs() <= tolerance as f64
    }
}

impl ScalarValue for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl VoxelValue for i32 {
    const KIND: ValueKind = ValueKind::Int32;

    #[inline]
    fn zero() -> Self {
        0
    }
    #[inline]
    fn add(self, other: Self) -> Self {
        self.wrapping_add(other)
    }
    #[inline]
    fn sub(self, other: Self) -> Self {
        self.wrapping_sub(other)
    }
    #[inline]
    fn mul(self, other: Self) -> Self {
        self.wrapping_mul(other)
    }
    #[inline]
    fn neg(self) -> Self {
        self.wrapping_neg()
    }
    #[inline]
    fn max_of(self, other: Self) -> Self {
        self.max(other)
    }
    #[inline]
    fn min_of(self, other: Self) -> Self {
        self.min(other)
    }
    #[inline]
    fn scale(self, s: f64) -> Self {
        (self as f64 * s).round() as i32
    }
    #[inline]
    fn is_positive(self) -> bool {
        self > 0
    }
    #[inline]
    fn within(self, other: Self, tolerance: f32) -> bool {
        (self as i64 - other as i64).unsigned_abs() as f64 <= tolerance as f64
    }
}

impl ScalarValue for i32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v.round() as i32
    }
}

impl VoxelValue for Vec3 {
    const KIND: ValueKind = ValueKind::Vec3f;

    #[inline]
    fn zero() -> Self {
        Vec3::ZERO
    }
    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }
    #[inline]
    fn sub(self, other: Self) -> Self {
        self - other
    }
    #[inline]
    fn mul(self, other: Self) -> Self {
        self * other
    }
    #[inline]
    fn neg(self) -> Self {
        -self
    }
    #[inline]
    fn max_of(self, other: Self) -> Self {
        self.max(other)
    }
    #[inline]
    fn min_of(self, other: Self) -> Self {
        self.min(other)
    }
    #[inline]
    fn scale(self, s: f64) -> Self {
        self * s as f32
    }
    #[inline]
    fn is_positive(self) -> bool {
        self.length_squared() > 0.0
    }
    #[inline]
    fn within(self, other: Self, tolerance: f32) -> bool {
        (self - other).abs().max_element() <= tolerance
    }
}
