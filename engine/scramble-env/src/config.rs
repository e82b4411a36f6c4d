//! Manager configuration

use glam::Vec3;
use scramble_pose::{RotationBlend, ScalarRange};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrambleError};

/// Randomization ranges and motion budget shared by every node of a manager
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrambleConfig {
    /// Full extents of the box target positions are drawn from, centred on
    /// the manager
    pub random_zone: Vec3,
    /// Range each rotation axis component is drawn from
    pub rotation_range: ScalarRange,
    /// Range the uniform target scale is drawn from
    pub scale_range: ScalarRange,
    /// Seconds a full segment takes at constant speed
    pub travel_time: f32,
    /// Rotation interpolation mode
    pub rotation_blend: RotationBlend,
    /// Fixed seed for reproducible draws; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            random_zone: Vec3::splat(10.0),
            rotation_range: ScalarRange::new(-1.0, 1.0),
            scale_range: ScalarRange::new(0.2, 2.0),
            travel_time: 5.0,
            rotation_blend: RotationBlend::Linear,
            seed: None,
        }
    }
}

impl ScrambleConfig {
    /// Set the random zone extents
    #[must_use]
    pub const fn with_random_zone(mut self, zone: Vec3) -> Self {
        self.random_zone = zone;
        self
    }

    /// Set the rotation axis component range
    #[must_use]
    pub const fn with_rotation_range(mut self, range: ScalarRange) -> Self {
        self.rotation_range = range;
        self
    }

    /// Set the uniform scale range
    #[must_use]
    pub const fn with_scale_range(mut self, range: ScalarRange) -> Self {
        self.scale_range = range;
        self
    }

    /// Set the travel time in seconds
    #[must_use]
    pub const fn with_travel_time(mut self, seconds: f32) -> Self {
        self.travel_time = seconds;
        self
    }

    /// Set the rotation interpolation mode
    #[must_use]
    pub const fn with_rotation_blend(mut self, blend: RotationBlend) -> Self {
        self.rotation_blend = blend;
        self
    }

    /// Fix the random seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every value is usable by the tick and the random draws
    pub fn validate(&self) -> Result<()> {
        if !self.random_zone.is_finite() || self.random_zone.min_element() < 0.0 {
            return Err(ScrambleError::InvalidConfig(format!(
                "random zone must be finite and non-negative, got {}",
                self.random_zone
            )));
        }

        if !self.rotation_range.is_valid() {
            return Err(ScrambleError::InvalidConfig(format!(
                "rotation range [{}, {}] is empty or not finite",
                self.rotation_range.min, self.rotation_range.max
            )));
        }

        if !self.scale_range.is_valid() {
            return Err(ScrambleError::InvalidConfig(format!(
                "scale range [{}, {}] is empty or not finite",
                self.scale_range.min, self.scale_range.max
            )));
        }

        if !(self.travel_time.is_finite() && self.travel_time > 0.0) {
            return Err(ScrambleError::InvalidConfig(format!(
                "travel time must be positive, got {}",
                self.travel_time
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScrambleConfig::default();
        assert_eq!(config.random_zone, Vec3::splat(10.0));
        assert_eq!(config.travel_time, 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_travel_time() {
        let config = ScrambleConfig::default().with_travel_time(0.0);
        assert!(matches!(
            config.validate(),
            Err(ScrambleError::InvalidConfig(_))
        ));

        let config = ScrambleConfig::default().with_travel_time(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let config = ScrambleConfig::default().with_scale_range(ScalarRange::new(2.0, 0.5));
        assert!(config.validate().is_err());

        let config = ScrambleConfig::default().with_rotation_range(ScalarRange::new(1.0, -1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_zone() {
        let config = ScrambleConfig::default().with_random_zone(Vec3::new(1.0, -1.0, 1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_zone_is_allowed() {
        let config = ScrambleConfig::default().with_random_zone(Vec3::ZERO);
        assert!(config.validate().is_ok());
    }
}
