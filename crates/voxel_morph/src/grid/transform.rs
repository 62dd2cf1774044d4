//! Index-to-world affine transforms.
//!
//! Transforms cross the public API as 16 floats in row-major order with the
//! translation in elements 3, 7 and 11. Internally they are a column-major
//! [`glam::Mat4`] plus its cached inverse.
use glam::{Mat4, Vec3};

use crate::error::{Error, Result};

const SINGULAR_EPSILON: f32 = 1e-12;

/// Affine map from index space to world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTransform {
    matrix: Mat4,
    inverse: Option<Mat4>,
}

impl Default for GridTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GridTransform {
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
        inverse: Some(Mat4::IDENTITY),
    };

    /// Builds a transform from a column-major matrix.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let det = matrix.determinant();
        let inverse = (det.is_finite() && det.abs() > SINGULAR_EPSILON).then(|| matrix.inverse());
        Self { matrix, inverse }
    }

    /// Uniform scale of `voxel_size` world units per index step.
    pub fn uniform(voxel_size: f32) -> Self {
        Self::from_matrix(Mat4::from_scale(Vec3::splat(voxel_size)))
    }

    /// Builds a transform from 16 row-major floats.
    pub fn from_row_major(values: &[f32]) -> Result<Self> {
        let arr: [f32; 16] = values.try_into().map_err(|_| Error::LengthMismatch {
            what: "transform",
            expected: 16,
            found: values.len(),
        })?;
        Ok(Self::from_matrix(Mat4::from_cols_array(&arr).transpose()))
    }

    /// Returns the 16 row-major floats of this transform.
    pub fn to_row_major(&self) -> [f32; 16] {
        self.matrix.transpose().to_cols_array()
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    #[inline]
    pub fn is_invertible(&self) -> bool {
        self.inverse.is_some()
    }

    /// World position of an index-space point.
    #[inline]
    pub fn index_to_world(&self, p: Vec3) -> Vec3 {
        self.matrix.transform_point3(p)
    }

    /// Index-space position of a world point. Fails for singular transforms.
    pub fn world_to_index(&self, p: Vec3) -> Result<Vec3> {
        self.inverse
            .map(|inv| inv.transform_point3(p))
            .ok_or_else(|| Error::InvalidParameter("grid transform is not invertible".into()))
    }

    /// World-space length of one index step along each axis.
    pub fn voxel_size(&self) -> Vec3 {
        Vec3::new(
            self.matrix.transform_vector3(Vec3::X).length(),
            self.matrix.transform_vector3(Vec3::Y).length(),
            self.matrix.transform_vector3(Vec3::Z).length(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_translation_lives_in_last_column() {
        #[rustfmt::skip]
        let rows = [
            2.0, 0.0, 0.0, 10.0,
            0.0, 2.0, 0.0, 20.0,
            0.0, 0.0, 2.0, 30.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        let t = GridTransform::from_row_major(&rows).expect("16 floats");
        assert_eq!(t.index_to_world(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(12.0, 22.0, 32.0));
        assert_eq!(t.to_row_major(), rows);
        assert_eq!(t.voxel_size(), Vec3::splat(2.0));
    }

    #[test]
    fn world_to_index_inverts() {
        let t = GridTransform::uniform(0.5);
        let idx = t.world_to_index(Vec3::new(1.0, 2.0, -1.0)).expect("invertible");
        assert_eq!(idx, Vec3::new(2.0, 4.0, -2.0));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = GridTransform::from_row_major(&[1.0; 12]).expect_err("12 floats");
        assert!(matches!(
            err,
            Error::LengthMismatch {
                expected: 16,
                found: 12,
                ..
            }
        ));
    }

    #[test]
    fn singular_transform_cannot_map_back() {
        let t = GridTransform::uniform(0.0);
        assert!(!t.is_invertible());
        assert!(matches!(
            t.world_to_index(Vec3::ONE),
            Err(Error::InvalidParameter(_))
        ));
    }
}
