//! Erosion bias strategies.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::NEIGHBORHOOD_SIZE;
use crate::weathering::exposure::directional_exposure;

/// Plane given by a world-space origin and normal.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiasPlane {
    pub origin: Vec3,
    pub normal: Vec3,
}

impl BiasPlane {
    pub fn new(
        origin: impl Into<mint::Vector3<f32>>,
        normal: impl Into<mint::Vector3<f32>>,
    ) -> Self {
        Self {
            origin: Vec3::from(origin.into()),
            normal: Vec3::from(normal.into()),
        }
    }

    /// `true` when `p` is strictly on the negative side of the normal.
    #[inline]
    pub fn is_below(&self, p: Vec3) -> bool {
        (p - self.origin).dot(self.normal) < 0.0
    }
}

/// Extra decay applied on top of isotropic exposure.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ErosionBias {
    #[default]
    None,
    /// Voxels whose empty neighbours face against this vector decay faster.
    Direction(Vec3),
    /// Voxels below the plane decay at `exposure * weight` extra.
    Plane(BiasPlane),
}

impl ErosionBias {
    pub fn direction(v: impl Into<mint::Vector3<f32>>) -> Self {
        ErosionBias::Direction(Vec3::from(v.into()))
    }

    pub fn plane(
        origin: impl Into<mint::Vector3<f32>>,
        normal: impl Into<mint::Vector3<f32>>,
    ) -> Self {
        ErosionBias::Plane(BiasPlane::new(origin, normal))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let finite = match self {
            ErosionBias::None => true,
            ErosionBias::Direction(d) => d.is_finite(),
            ErosionBias::Plane(p) => p.origin.is_finite() && p.normal.is_finite(),
        };
        if finite {
            Ok(())
        } else {
            Err(Error::InvalidParameter(
                "erosion bias must have finite components".into(),
            ))
        }
    }

    /// Bias decay for one voxel.
    pub fn decay(
        &self,
        neighborhood: &[f32; NEIGHBORHOOD_SIZE],
        world: Vec3,
        exposure: f32,
        threshold: f32,
        weight: f32,
    ) -> f32 {
        match self {
            ErosionBias::None => 0.0,
            ErosionBias::Direction(d) => directional_exposure(neighborhood, threshold, *d) * weight,
            ErosionBias::Plane(p) if p.is_below(world) => exposure * weight,
            ErosionBias::Plane(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CENTER_INDEX;

    #[test]
    fn plane_side_test_uses_normal() {
        let plane = BiasPlane::new([0.0, 0.0, 2.0], [0.0, 0.0, 1.0]);
        assert!(plane.is_below(Vec3::new(5.0, -3.0, 1.0)));
        assert!(!plane.is_below(Vec3::new(0.0, 0.0, 2.0)));
        assert!(!plane.is_below(Vec3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn plane_decay_is_exposure_times_weight_below_only() {
        let bias = ErosionBias::plane([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let n = [0.0_f32; NEIGHBORHOOD_SIZE];
        let below = bias.decay(&n, Vec3::new(0.0, 0.0, -1.0), 0.8, 0.1, 0.5);
        let above = bias.decay(&n, Vec3::new(0.0, 0.0, 1.0), 0.8, 0.1, 0.5);
        assert!((below - 0.4).abs() < 1e-6);
        assert_eq!(above, 0.0);
    }

    #[test]
    fn direction_decay_scales_with_weight() {
        let bias = ErosionBias::direction([0.0, 0.0, -1.0]);
        let mut n = [0.0_f32; NEIGHBORHOOD_SIZE];
        n[CENTER_INDEX] = 1.0;
        let w1 = bias.decay(&n, Vec3::ZERO, 1.0, 0.5, 1.0);
        let w2 = bias.decay(&n, Vec3::ZERO, 1.0, 0.5, 2.0);
        assert!(w1 > 0.0);
        assert!((w2 - 2.0 * w1).abs() < 1e-6);
        assert_eq!(ErosionBias::None.decay(&n, Vec3::ZERO, 1.0, 0.5, 2.0), 0.0);
    }

    #[test]
    fn non_finite_bias_is_invalid() {
        assert!(ErosionBias::direction([f32::NAN, 0.0, 0.0]).validate().is_err());
        assert!(ErosionBias::None.validate().is_ok());
    }
}
