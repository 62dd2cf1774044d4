//! Erosion step parameters.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::weathering::bias::ErosionBias;

/// How an erosion step reads neighbourhoods while it writes new values.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Voxels are updated one after another in active-enumeration order, so later
    /// voxels see the already-updated values of earlier ones.
    #[default]
    InPlace,
    /// Every neighbourhood is read before any voxel is written. The result does
    /// not depend on visiting order.
    Snapshot,
}

/// Parameters of one erosion step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErosionParams {
    /// Value removed per unit of exposure.
    pub rate: f32,
    /// Neighbours above this value count as occupied.
    pub threshold: f32,
    /// Strength of the bias decay.
    pub weight: f32,
    pub bias: ErosionBias,
    pub traversal: Traversal,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            rate: 0.1,
            threshold: 0.1,
            weight: 0.0,
            bias: ErosionBias::None,
            traversal: Traversal::InPlace,
        }
    }
}

impl ErosionParams {
    /// Creates parameters with the given erosion rate.
    pub fn new(rate: f32) -> Self {
        Self {
            rate,
            ..Default::default()
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_bias(mut self, bias: ErosionBias) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("rate", self.rate),
            ("threshold", self.threshold),
            ("weight", self.weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        self.bias.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let params = ErosionParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.traversal, Traversal::InPlace);
        assert_eq!(params.bias, ErosionBias::None);
    }

    #[test]
    fn builder_sets_fields() {
        let params = ErosionParams::new(0.3)
            .with_threshold(0.2)
            .with_weight(1.5)
            .with_bias(ErosionBias::direction([0.0, 0.0, -1.0]))
            .with_traversal(Traversal::Snapshot);
        assert_eq!(params.rate, 0.3);
        assert_eq!(params.threshold, 0.2);
        assert_eq!(params.weight, 1.5);
        assert_eq!(params.traversal, Traversal::Snapshot);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn negative_or_non_finite_values_are_rejected() {
        for params in [
            ErosionParams::new(-0.1),
            ErosionParams::default().with_threshold(-1.0),
            ErosionParams::default().with_weight(f32::NAN),
            ErosionParams::default().with_rate(f32::INFINITY),
        ] {
            assert!(matches!(
                params.validate(),
                Err(Error::InvalidParameter(_))
            ));
        }
    }
}
