//! Common types for scramble poses

use glam::{Affine3A, EulerRot, Quat, Vec3, Vec4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position, rotation and scale of one scene object
///
/// The coordinate space is chosen by the caller; the engine stores poses
/// relative to the object's parent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Translation
    pub position: Vec3,
    /// Rotation, unit length except while a linear blend is in progress
    pub rotation: Quat,
    /// Per-axis scale
    pub scale: Vec3,
}

impl Pose {
    /// Origin, no rotation, unit scale
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new pose
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a pose from Euler angles in degrees (Z, then X, then Y)
    pub fn from_euler_degrees(position: Vec3, euler_degrees: Vec3, scale: Vec3) -> Self {
        Self::new(position, euler_degrees_to_quat(euler_degrees), scale)
    }

    /// Copy of this pose with a different position
    pub const fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Copy of this pose with a different rotation
    pub const fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Copy of this pose with a different scale
    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation brought back to unit length
    ///
    /// A zero quaternion (two opposite rotations blended halfway) maps to identity.
    pub fn normalized_rotation(&self) -> Quat {
        Vec4::from(self.rotation)
            .try_normalize()
            .map_or(Quat::IDENTITY, Quat::from_vec4)
    }

    /// Affine matrix applying scale, then rotation, then translation
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(
            self.scale,
            self.normalized_rotation(),
            self.position,
        )
    }

    /// Componentwise comparison within `max_abs_diff`
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && Vec4::from(self.rotation).abs_diff_eq(Vec4::from(other.rotation), max_abs_diff)
            && self.scale.abs_diff_eq(other.scale, max_abs_diff)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Convert Euler angles in degrees to a rotation
///
/// Rotation order is Z, then X, then Y, the convention used by most editors
/// with a Y-up frame.
pub fn euler_degrees_to_quat(euler_degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler_degrees.y.to_radians(),
        euler_degrees.x.to_radians(),
        euler_degrees.z.to_radians(),
    )
}

/// Closed scalar interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarRange {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl ScalarRange {
    /// Create a new range
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate range holding a single value
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Check that both bounds are finite and ordered
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Check if `value` lies inside the range (bounds included)
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl From<(f32, f32)> for ScalarRange {
    fn from((min, max): (f32, f32)) -> Self {
        Self { min, max }
    }
}

/// Rotation blend used when interpolating between two poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RotationBlend {
    /// Componentwise quaternion blend, not renormalized
    #[default]
    Linear,
    /// Spherical blend of the normalized endpoints
    Spherical,
}
