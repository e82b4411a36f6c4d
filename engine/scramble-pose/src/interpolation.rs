//! Pose interpolation and segment projection

use glam::{Quat, Vec3, Vec4};

use super::types::{Pose, RotationBlend};

/// Squared segment length at or below which a segment counts as a single point
pub const DEGENERATE_SEGMENT_EPSILON: f32 = 1e-12;

/// Interpolate between two poses
///
/// Position and scale are blended linearly. Rotation uses the componentwise
/// [`RotationBlend::Linear`] blend and is not renormalized. `t` is not
/// clamped; callers decide when a motion segment is finished.
pub fn lerp_pose(start: &Pose, target: &Pose, t: f32) -> Pose {
    lerp_pose_with(start, target, t, RotationBlend::Linear)
}

/// Interpolate between two poses with an explicit rotation blend
pub fn lerp_pose_with(start: &Pose, target: &Pose, t: f32, blend: RotationBlend) -> Pose {
    Pose {
        position: start.position.lerp(target.position, t),
        rotation: lerp_rotation(start.rotation, target.rotation, t, blend),
        scale: start.scale.lerp(target.scale, t),
    }
}

/// Blend two rotations
pub fn lerp_rotation(a: Quat, b: Quat, t: f32, blend: RotationBlend) -> Quat {
    match blend {
        RotationBlend::Linear => Quat::from_vec4(Vec4::from(a).lerp(Vec4::from(b), t)),
        RotationBlend::Spherical => {
            let a = normalize_or_identity(a);
            let b = normalize_or_identity(b);
            a.slerp(b, t)
        }
    }
}

fn normalize_or_identity(q: Quat) -> Quat {
    Vec4::from(q)
        .try_normalize()
        .map_or(Quat::IDENTITY, Quat::from_vec4)
}

/// Check if the segment `start -> target` has (almost) zero length
pub fn is_degenerate_segment(start: Vec3, target: Vec3) -> bool {
    start.distance_squared(target) <= DEGENERATE_SEGMENT_EPSILON
}

/// Signed progress of `point` projected onto the line through `start` and `target`
///
/// Returns `0.0` at `start`, `1.0` at `target`, and extrapolates beyond both
/// ends. A degenerate segment returns `1.0`: the motion has nowhere to go, so
/// it is treated as already complete.
pub fn inverse_lerp_along_segment(start: Vec3, target: Vec3, point: Vec3) -> f32 {
    let segment = target - start;
    let length_squared = segment.length_squared();
    if length_squared <= DEGENERATE_SEGMENT_EPSILON {
        return 1.0;
    }
    (point - start).dot(segment) / length_squared
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn pose(x: f32, scale: f32) -> Pose {
        Pose::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY, Vec3::splat(scale))
    }

    #[test]
    fn test_lerp_pose_midpoint() {
        let a = pose(0.0, 1.0);
        let b = pose(10.0, 3.0);

        let mid = lerp_pose(&a, &b, 0.5);
        assert!((mid.position.x - 5.0).abs() < 0.001);
        assert!((mid.scale.x - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_pose_extrapolates() {
        let a = pose(0.0, 1.0);
        let b = pose(10.0, 1.0);

        let beyond = lerp_pose(&a, &b, 1.5);
        assert!((beyond.position.x - 15.0).abs() < 0.001);

        let before = lerp_pose(&a, &b, -0.5);
        assert!((before.position.x + 5.0).abs() < 0.001);
    }

    #[test]
    fn test_linear_rotation_is_not_renormalized() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(std::f32::consts::PI);

        let mid = lerp_rotation(a, b, 0.5, RotationBlend::Linear);
        // (0, 0.5, 0, 0.5) has length sqrt(0.5)
        assert!((mid.length() - 0.5_f32.sqrt()).abs() < 1e-5);
        assert!((mid.y - 0.5).abs() < 1e-5);
        assert!((mid.w - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_spherical_rotation_stays_unit() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        let mid = lerp_rotation(a, b, 0.5, RotationBlend::Spherical);
        assert!((mid.length() - 1.0).abs() < 1e-5);
        assert!(mid.angle_between(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4)) < 1e-3);
    }

    #[test_case(Vec3::ZERO, 0.0 ; "at start")]
    #[test_case(Vec3::new(10.0, 0.0, 0.0), 1.0 ; "at target")]
    #[test_case(Vec3::new(5.0, 0.0, 0.0), 0.5 ; "halfway")]
    #[test_case(Vec3::new(5.0, 7.0, -3.0), 0.5 ; "off the line projects")]
    #[test_case(Vec3::new(15.0, 0.0, 0.0), 1.5 ; "beyond target")]
    #[test_case(Vec3::new(-5.0, 0.0, 0.0), -0.5 ; "behind start")]
    fn test_inverse_lerp(point: Vec3, expected: f32) {
        let t = inverse_lerp_along_segment(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), point);
        assert!((t - expected).abs() < 1e-5, "got {t}, expected {expected}");
    }

    #[test]
    fn test_inverse_lerp_degenerate_segment() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(is_degenerate_segment(p, p));
        assert_eq!(inverse_lerp_along_segment(p, p, Vec3::ZERO), 1.0);
        assert_eq!(inverse_lerp_along_segment(p, p, p), 1.0);
    }
}
