//! Math utilities and types
//!
//! Provides the vector, quaternion and transform types shared by every
//! controller. Conventions are Y-up right-handed with -Z as forward.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Local +X axis in world space
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }

    /// Local +Y axis in world space
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    /// Local -Z axis in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }

    /// Check that position, rotation and scale contain no NaN or infinity
    pub fn is_finite(&self) -> bool {
        is_finite_vec(&self.position)
            && self.rotation.coords.iter().all(|c| c.is_finite())
            && is_finite_vec(&self.scale)
    }
}

/// Check that every component of a vector is finite
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Check that a frame delta is usable for integration
pub fn is_valid_dt(dt: f32) -> bool {
    dt.is_finite() && dt > 0.0
}

/// Elevation of a direction above the XZ plane, in radians
pub fn elevation(direction: &Vec3) -> f32 {
    let length = direction.magnitude();
    if length <= f32::EPSILON {
        return 0.0;
    }
    (direction.y / length).clamp(-1.0, 1.0).asin()
}

/// Rotation whose -Z axis points along `direction`
///
/// Falls back to identity for a zero direction and picks an alternate up
/// vector when `direction` is parallel to +Y.
pub fn look_rotation(direction: &Vec3) -> Quat {
    if direction.magnitude_squared() <= f32::EPSILON {
        return Quat::identity();
    }
    let up = if direction.normalize().y.abs() > 0.999 {
        Vec3::z()
    } else {
        Vec3::y()
    };
    // face_towards aligns +Z with the direction, so face away from it
    Quat::face_towards(&-direction, &up)
}

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Component-wise linear interpolation between two vectors
    pub fn lerp_vec(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
        a + (b - a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_axes() {
        let transform = Transform::identity();
        assert_relative_eq!(transform.right(), Vec3::x());
        assert_relative_eq!(transform.up(), Vec3::y());
        assert_relative_eq!(transform.forward(), -Vec3::z());
    }

    #[test]
    fn test_rotated_forward() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        let transform = Transform::from_position_rotation(Vec3::zeros(), rotation);
        assert_relative_eq!(transform.forward(), -Vec3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_finite_checks() {
        assert!(is_finite_vec(&Vec3::new(1.0, 2.0, 3.0)));
        assert!(!is_finite_vec(&Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(!is_finite_vec(&Vec3::new(0.0, f32::INFINITY, 0.0)));

        let mut transform = Transform::identity();
        assert!(transform.is_finite());
        transform.position.z = f32::NEG_INFINITY;
        assert!(!transform.is_finite());
    }

    #[test]
    fn test_dt_validity() {
        assert!(is_valid_dt(0.016));
        assert!(!is_valid_dt(0.0));
        assert!(!is_valid_dt(-0.1));
        assert!(!is_valid_dt(f32::NAN));
        assert!(!is_valid_dt(f32::INFINITY));
    }

    #[test]
    fn test_look_rotation_points_forward() {
        let direction = Vec3::new(3.0, 0.0, 0.0);
        let rotation = look_rotation(&direction);
        assert_relative_eq!(rotation * -Vec3::z(), Vec3::x(), epsilon = 1e-5);

        let straight_up = look_rotation(&Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(straight_up * -Vec3::z(), Vec3::y(), epsilon = 1e-5);
    }

    #[test]
    fn test_elevation() {
        assert_relative_eq!(elevation(&Vec3::new(1.0, 0.0, 0.0)), 0.0);
        assert_relative_eq!(elevation(&Vec3::new(0.0, 1.0, 0.0)), FRAC_PI_2);
        assert_relative_eq!(elevation(&Vec3::zeros()), 0.0);
    }

    #[test]
    fn test_lerp() {
        assert_relative_eq!(utils::lerp(0.0, 10.0, 0.25), 2.5);
        let v = utils::lerp_vec(&Vec3::zeros(), &Vec3::new(2.0, 4.0, 6.0), 0.5);
        assert_relative_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }
}
