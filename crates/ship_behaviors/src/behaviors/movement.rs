//! Ship movement controller
//!
//! Turns thrust and rotation intents into rigid-body forces and torques.
//! When the ship has no usable physics body the controller moves the
//! transform directly instead; that kinematic fallback is the only visible
//! sign of degraded mode.
//!
//! Rotation vectors are `(pitch, yaw, roll)` about the ship's local right,
//! up and forward axes.

use crate::config::MovementConfig;
use crate::foundation::math::{elevation, is_finite_vec, is_valid_dt, Quat, Unit, Vec3};
use crate::scene::{Entity, SceneContext};

/// One frame of player intent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipInput {
    /// Positive thrusts forward, negative thrusts backward, zero coasts
    pub thrust: f32,
    /// Requested `(pitch, yaw, roll)` rotation
    pub rotation: Vec3,
}

impl Default for ShipInput {
    fn default() -> Self {
        Self {
            thrust: 0.0,
            rotation: Vec3::zeros(),
        }
    }
}

/// Movement controller bound to one ship entity
#[derive(Debug, Clone)]
pub struct MovementController {
    entity: Entity,
    config: MovementConfig,
    is_thrusting: bool,
    physics_initialized: bool,
    physics_warning_logged: bool,
}

impl MovementController {
    /// Create a controller for `entity`
    pub fn new(entity: Entity, config: MovementConfig) -> Self {
        Self {
            entity,
            config,
            is_thrusting: false,
            physics_initialized: false,
            physics_warning_logged: false,
        }
    }

    /// Controlled entity
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Active configuration
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Whether thrust was applied since the last `stop_thrust`
    pub fn is_thrusting(&self) -> bool {
        self.is_thrusting
    }

    /// Whether forces go through a rigid body
    pub fn physics_initialized(&self) -> bool {
        self.physics_initialized
    }

    /// Bind the controller to the entity's rigid body
    ///
    /// Succeeds only when the entity has both a rigid body and a collider
    /// and is attached to the scene graph. Safe to call repeatedly.
    pub fn initialize_physics<S: SceneContext + ?Sized>(&mut self, scene: &S) -> bool {
        if self.physics_initialized {
            return true;
        }

        let missing = if !scene.has_rigid_body(self.entity) {
            Some("rigid body")
        } else if !scene.has_collider(self.entity) {
            Some("collider")
        } else if !scene.is_attached(self.entity) {
            Some("scene attachment")
        } else {
            None
        };

        match missing {
            None => {
                self.physics_initialized = true;
                log::debug!("Physics initialized for {:?}", self.entity);
                true
            }
            Some(what) => {
                if !self.physics_warning_logged {
                    self.physics_warning_logged = true;
                    log::warn!(
                        "No {} on {:?}, falling back to kinematic movement",
                        what,
                        self.entity
                    );
                }
                false
            }
        }
    }

    /// Thrust along a world-space direction
    pub fn thrust<S: SceneContext + ?Sized>(&mut self, scene: &mut S, direction: Vec3) {
        if !is_finite_vec(&direction) {
            log::debug!("Ignoring non-finite thrust direction {:?}", direction);
            return;
        }

        if !self.physics_initialized {
            self.initialize_physics(&*scene);
        }

        if self.physics_initialized {
            scene.apply_force(self.entity, direction * self.config.thrust_force);
        } else if let Some(mut transform) = scene.transform(self.entity) {
            transform.position += direction * self.config.speed * self.config.kinematic_step;
            scene.set_transform(self.entity, transform);
        }

        self.is_thrusting = true;
    }

    /// Thrust along the ship's current forward axis
    pub fn thrust_forward<S: SceneContext + ?Sized>(&mut self, scene: &mut S) {
        if let Some(transform) = scene.transform(self.entity) {
            self.thrust(scene, transform.forward());
        }
    }

    /// Reverse thrust, weakened by the backward thrust ratio
    pub fn thrust_backward<S: SceneContext + ?Sized>(&mut self, scene: &mut S) {
        if let Some(transform) = scene.transform(self.entity) {
            let direction = -transform.forward() * self.config.backward_thrust_ratio;
            self.thrust(scene, direction);
        }
    }

    /// Stop thrusting and bleed off some velocity
    pub fn stop_thrust<S: SceneContext + ?Sized>(&mut self, scene: &mut S) {
        self.is_thrusting = false;

        if self.physics_initialized {
            if let Some(velocity) = scene.linear_velocity(self.entity) {
                scene.set_linear_velocity(self.entity, velocity * self.config.velocity_damping);
            }
        }
    }

    /// Rotate through torque, or directly when physics is unavailable
    pub fn rotate<S: SceneContext + ?Sized>(&mut self, scene: &mut S, rotation: Vec3, dt: f32) {
        if !self.physics_initialized {
            self.rotate_directly(scene, rotation, dt);
            return;
        }

        if !is_finite_vec(&rotation) {
            return;
        }
        let Some(transform) = scene.transform(self.entity) else {
            return;
        };

        let local_torque = rotation * self.config.rotation_speed * self.config.torque_scale;
        scene.apply_torque(self.entity, transform.rotation * local_torque);
    }

    /// Rotate the transform incrementally about its current local axes
    ///
    /// Each axis is clamped to `max_rotation_per_frame`. The increments are
    /// composed as yaw * pitch * roll, pre-multiplied onto the current
    /// orientation and renormalized every call. A pitch step that would push
    /// the nose further past `max_pitch_angle` is dropped.
    ///
    /// Returns the `(pitch, yaw, roll)` angles actually applied.
    pub fn rotate_directly<S: SceneContext + ?Sized>(
        &mut self,
        scene: &mut S,
        rotation: Vec3,
        dt: f32,
    ) -> Vec3 {
        if !is_valid_dt(dt) || !is_finite_vec(&rotation) {
            return Vec3::zeros();
        }
        let Some(mut transform) = scene.transform(self.entity) else {
            return Vec3::zeros();
        };

        let limit = self.config.max_rotation_per_frame;
        let amount = self.config.rotation_speed * dt;
        let mut angles = (rotation * amount).map(|angle| angle.clamp(-limit, limit));

        let q_pitch = Quat::from_axis_angle(&Unit::new_normalize(transform.right()), angles.x);
        let forward = transform.forward();
        let current = elevation(&forward).abs();
        let pitched = elevation(&(q_pitch * forward)).abs();
        let q_pitch = if pitched > self.config.max_pitch_angle && pitched > current {
            angles.x = 0.0;
            Quat::identity()
        } else {
            q_pitch
        };

        let q_yaw = Quat::from_axis_angle(&Unit::new_normalize(transform.up()), angles.y);
        let q_roll = Quat::from_axis_angle(&Unit::new_normalize(forward), angles.z);

        let delta = q_yaw * q_pitch * q_roll;
        transform.rotation = delta * transform.rotation;
        transform.rotation.renormalize();
        scene.set_transform(self.entity, transform);

        angles
    }

    /// Apply one frame of player input
    pub fn apply_input<S: SceneContext + ?Sized>(
        &mut self,
        scene: &mut S,
        input: &ShipInput,
        dt: f32,
    ) {
        if input.thrust.is_finite() && input.thrust > 0.0 {
            self.thrust_forward(scene);
        } else if input.thrust.is_finite() && input.thrust < 0.0 {
            self.thrust_backward(scene);
        } else {
            self.stop_thrust(scene);
        }

        if input.rotation != Vec3::zeros() {
            self.rotate(scene, input.rotation, dt);
        }
    }
}
