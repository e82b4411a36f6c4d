//! # scramble_pose - Pose interpolation primitives
//!
//! Value types and pure functions shared by the scramble animation engine:
//!
//! - [`Pose`]: position, rotation and scale snapshot of one scene object
//! - [`lerp_pose`]: linear blend between two poses for a progress value
//! - [`inverse_lerp_along_segment`]: recovers progress by projecting a point
//!   onto a start/target segment
//! - [`sampling`]: the uniform draws used to randomize target and rest poses
//!
//! ## Example
//!
//! ```
//! use glam::Vec3;
//! use scramble_pose::{Pose, inverse_lerp_along_segment, lerp_pose};
//!
//! let start = Pose::IDENTITY;
//! let target = Pose::IDENTITY.with_position(Vec3::new(10.0, 0.0, 0.0));
//!
//! let halfway = lerp_pose(&start, &target, 0.5);
//! assert!((halfway.position.x - 5.0).abs() < 1e-5);
//!
//! let t = inverse_lerp_along_segment(start.position, target.position, halfway.position);
//! assert!((t - 0.5).abs() < 1e-5);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod interpolation;
pub mod sampling;
pub mod types;

pub use interpolation::{
    DEGENERATE_SEGMENT_EPSILON, inverse_lerp_along_segment, is_degenerate_segment, lerp_pose,
    lerp_pose_with, lerp_rotation,
};
pub use sampling::{
    RandomRotation, sample_offset, sample_range, sample_rotation, sample_uniform_scale,
};
pub use types::{Pose, RotationBlend, ScalarRange, euler_degrees_to_quat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
