//! Rigid body state for simulated entities

use crate::foundation::math::{is_valid_dt, Quat, Vec3};

/// Rigid body with force and torque accumulators
///
/// Forces and torques are world-space and are cleared after each
/// integration step.
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Mass (also used as a uniform moment of inertia)
    pub mass: f32,

    /// Linear velocity in units per second
    pub velocity: Vec3,

    /// Angular velocity in radians per second (world axes)
    pub angular_velocity: Vec3,

    /// Damping factor for velocity (0 = no damping)
    pub linear_damping: f32,

    /// Damping factor for angular velocity
    pub angular_damping: f32,

    force: Vec3,
    torque: Vec3,
}

impl RigidBody {
    /// Create a body at rest
    pub fn new(mass: f32) -> Self {
        Self {
            mass: if mass > 0.0 && mass.is_finite() { mass } else { 1.0 },
            velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            force: Vec3::zeros(),
            torque: Vec3::zeros(),
        }
    }

    /// Set linear damping
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping.max(0.0);
        self
    }

    /// Set angular damping
    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping.max(0.0);
        self
    }

    /// Accumulate a force for the next step
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulate a torque for the next step
    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Force accumulated since the last step
    pub fn pending_force(&self) -> Vec3 {
        self.force
    }

    /// Torque accumulated since the last step
    pub fn pending_torque(&self) -> Vec3 {
        self.torque
    }

    /// Apply physics integration step
    ///
    /// Returns the position delta and rotation delta for this step.
    pub fn integrate(&mut self, delta_time: f32) -> (Vec3, Quat) {
        if !is_valid_dt(delta_time) {
            return (Vec3::zeros(), Quat::identity());
        }

        self.velocity += self.force / self.mass * delta_time;
        if self.linear_damping > 0.0 {
            self.velocity *= (1.0 - self.linear_damping * delta_time).max(0.0);
        }

        self.angular_velocity += self.torque / self.mass * delta_time;
        if self.angular_damping > 0.0 {
            self.angular_velocity *= (1.0 - self.angular_damping * delta_time).max(0.0);
        }

        self.force = Vec3::zeros();
        self.torque = Vec3::zeros();

        (
            self.velocity * delta_time,
            Quat::from_scaled_axis(self.angular_velocity * delta_time),
        )
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(1.0)
    }
}
