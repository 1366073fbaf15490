//! Behavior configuration structs and their defaults

use super::{Config, ConfigError};
use crate::foundation::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Ship movement settings
    pub movement: MovementConfig,

    /// Laser mining settings
    pub harvesting: HarvestConfig,

    /// Chase camera settings
    pub camera: CameraConfig,

    /// Resource pickup settings
    pub pickup: PickupConfig,

    /// Projectile settings
    pub projectile: ProjectileConfig,
}

impl Config for RuntimeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate()?;
        self.harvesting.validate()?;
        self.camera.validate()?;
        self.pickup.validate()?;
        self.projectile.validate()
    }
}

/// Movement controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Kinematic fallback speed (units per second)
    pub speed: f32,

    /// Rotation speed (radians per second per unit of input)
    pub rotation_speed: f32,

    /// Force applied while thrusting
    pub thrust_force: f32,

    /// Fraction of `thrust_force` available when thrusting backwards
    pub backward_thrust_ratio: f32,

    /// Maximum nose elevation from the horizon (radians)
    pub max_pitch_angle: f32,

    /// Largest rotation applied about any axis in one frame (radians)
    pub max_rotation_per_frame: f32,

    /// Time step for kinematic thrust, which carries no dt of its own
    pub kinematic_step: f32,

    /// Velocity multiplier applied when thrust stops
    pub velocity_damping: f32,

    /// Multiplier converting rotation input into torque
    pub torque_scale: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            rotation_speed: 2.0,
            thrust_force: 50.0,
            backward_thrust_ratio: 0.5,
            max_pitch_angle: 80.0_f32.to_radians(),
            max_rotation_per_frame: 0.1,
            kinematic_step: 0.016,
            velocity_damping: 0.98,
            torque_scale: 1.0,
        }
    }
}

impl MovementConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("movement.speed", self.speed)?;
        positive("movement.rotation_speed", self.rotation_speed)?;
        positive("movement.thrust_force", self.thrust_force)?;
        unit_interval("movement.backward_thrust_ratio", self.backward_thrust_ratio)?;
        positive("movement.max_pitch_angle", self.max_pitch_angle)?;
        positive("movement.max_rotation_per_frame", self.max_rotation_per_frame)?;
        positive("movement.kinematic_step", self.kinematic_step)?;
        unit_interval("movement.velocity_damping", self.velocity_damping)?;
        finite("movement.torque_scale", self.torque_scale)
    }
}

/// Harvesting state machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Furthest distance at which a target may be mined
    pub max_range: f32,

    /// Length of one mining cycle (seconds)
    pub mining_duration: f32,

    /// Amount deposited into the inventory per completed cycle
    pub resource_yield: f32,

    /// Pause between collection and returning to idle (seconds)
    pub settle_delay: f32,

    /// Damage applied to the target per completed cycle
    pub damage_per_cycle: f32,

    /// How far toward the target the line-of-sight ray starts
    pub los_origin_offset: f32,

    /// Slack between a blocking hit and the target surface
    pub los_tolerance: f32,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_range: 50.0,
            mining_duration: 3.0,
            resource_yield: 1.5,
            settle_delay: 0.5,
            damage_per_cycle: 1.0,
            los_origin_offset: 2.0,
            los_tolerance: 0.5,
        }
    }
}

impl HarvestConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("harvesting.max_range", self.max_range)?;
        positive("harvesting.mining_duration", self.mining_duration)?;
        positive("harvesting.resource_yield", self.resource_yield)?;
        non_negative("harvesting.settle_delay", self.settle_delay)?;
        non_negative("harvesting.damage_per_cycle", self.damage_per_cycle)?;
        non_negative("harvesting.los_origin_offset", self.los_origin_offset)?;
        non_negative("harvesting.los_tolerance", self.los_tolerance)
    }
}

/// Chase camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera offset in the target's local frame at `reference_distance`
    pub local_offset: Vec3,

    /// Initial follow distance
    pub distance: f32,

    /// Distance at which `local_offset` applies unscaled
    pub reference_distance: f32,

    /// Closest allowed zoom
    pub min_distance: f32,

    /// Furthest allowed zoom
    pub max_distance: f32,

    /// Translation smoothing rate (per second)
    pub follow_speed: f32,

    /// Extra rotation applied after the target's orientation, as
    /// (pitch, yaw, roll) radians
    pub offset_euler: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            local_offset: Vec3::new(0.0, 4.0, 15.0),
            distance: 15.0,
            reference_distance: 15.0,
            min_distance: 5.0,
            max_distance: 50.0,
            follow_speed: 5.0,
            offset_euler: Vec3::new(-0.15, 0.0, 0.0),
        }
    }
}

impl CameraConfig {
    /// Offset rotation as a quaternion
    pub fn offset_rotation(&self) -> Quat {
        Quat::from_euler_angles(self.offset_euler.x, self.offset_euler.y, self.offset_euler.z)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("camera.min_distance", self.min_distance)?;
        if self.min_distance > self.max_distance {
            return Err(ConfigError::Invalid {
                field: "camera.min_distance",
                reason: format!(
                    "{} is greater than max_distance {}",
                    self.min_distance, self.max_distance
                ),
            });
        }
        finite("camera.distance", self.distance)?;
        non_negative("camera.follow_speed", self.follow_speed)?;
        if !self.local_offset.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "camera.local_offset",
                reason: "contains a non-finite component".to_string(),
            });
        }
        Ok(())
    }
}

/// Resource pickup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Seconds before an uncollected pickup self-destructs
    pub lifetime: f32,

    /// Fraction of a destroyed target's max yield dropped as a pickup
    pub salvage_fraction: f32,

    /// Radius of the collection trigger
    pub trigger_radius: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            lifetime: 30.0,
            salvage_fraction: 0.5,
            trigger_radius: 1.5,
        }
    }
}

impl PickupConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("pickup.lifetime", self.lifetime)?;
        unit_interval("pickup.salvage_fraction", self.salvage_fraction)?;
        positive("pickup.trigger_radius", self.trigger_radius)
    }
}

/// Projectile configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Travel speed (units per second)
    pub speed: f32,

    /// Damage per impact
    pub damage: f32,

    /// Seconds before a projectile expires
    pub lifetime: f32,

    /// Cap on simultaneously active projectiles
    pub max_active: usize,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 80.0,
            damage: 1.0,
            lifetime: 2.0,
            max_active: 64,
        }
    }
}

impl ProjectileConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("projectile.speed", self.speed)?;
        non_negative("projectile.damage", self.damage)?;
        positive("projectile.lifetime", self.lifetime)
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is not finite"),
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be greater than zero"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must not be negative"),
        })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    non_negative(field, value)?;
    if value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be at most 1"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RuntimeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RuntimeConfig::default();
        let text = config.to_string_with_format(ConfigFormat::Toml).unwrap();
        let parsed = RuntimeConfig::from_str_with_format(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = RuntimeConfig::default();
        let text = config.to_string_with_format(ConfigFormat::Ron).unwrap();
        let parsed = RuntimeConfig::from_str_with_format(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = "[harvesting]\nmining_duration = 5.0\n";
        let config = RuntimeConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.harvesting.mining_duration, 5.0);
        assert_eq!(config.harvesting.resource_yield, 1.5);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_inverted_camera_bounds_rejected() {
        let text = "[camera]\nmin_distance = 60.0\nmax_distance = 10.0\n";
        let result = RuntimeConfig::from_str_with_format(text, ConfigFormat::Toml);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "camera.min_distance", .. })
        ));
    }

    #[test]
    fn test_zero_mining_duration_rejected() {
        let mut config = RuntimeConfig::default();
        config.harvesting.mining_duration = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = RuntimeConfig::from_str_with_format("not = [valid", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
