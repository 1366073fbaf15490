//! Harvestable component and the shared damage path

use crate::config::PickupConfig;
use crate::foundation::math::{Transform, Vec3};
use crate::foundation::time::{OneShotTimer, Timestamp};
use crate::scene::{Entity, SceneContext, SpawnDesc};
use crate::world::pickup::ResourcePickup;
use serde::{Deserialize, Serialize};

/// How long a harvestable flashes after being hit (seconds)
pub const HIT_FLASH_DURATION: f32 = 0.15;

/// Kinds of resource a harvestable can yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Common metallic ore
    Ore,
    /// Water ice
    Ice,
    /// Rare crystal
    Crystal,
}

impl ResourceType {
    /// Lowercase display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Ore => "ore",
            Self::Ice => "ice",
            Self::Crystal => "crystal",
        }
    }
}

/// Result of hitting a harvestable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// The target was missing or already destroyed
    Ignored,
    /// The target absorbed the hit
    Damaged {
        /// Yield left after the hit
        remaining: f32,
    },
    /// This hit destroyed the target
    Destroyed {
        /// Pickup spawned in its place, if the scene could spawn one
        pickup: Option<Entity>,
    },
}

/// Destructible world object that yields a resource
#[derive(Debug, Clone)]
pub struct Harvestable {
    /// Resource produced when mined
    pub resource_type: ResourceType,

    /// Yield when intact
    pub max_yield: f32,

    current_yield: f32,
    destroyed: bool,
    flash: OneShotTimer,
}

impl Harvestable {
    /// Create an intact harvestable
    pub fn new(resource_type: ResourceType, max_yield: f32) -> Self {
        let max_yield = max_yield.max(0.0);
        Self {
            resource_type,
            max_yield,
            current_yield: max_yield,
            destroyed: false,
            flash: OneShotTimer::new(),
        }
    }

    /// Yield left before destruction
    pub fn current_yield(&self) -> f32 {
        self.current_yield
    }

    /// Whether the destroyed latch has been set
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Set the destroyed latch
    ///
    /// Returns `true` only for the call that flipped it; the latch never
    /// resets.
    pub fn mark_destroyed(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }

    /// Whether the hit flash is showing at `now`
    pub fn is_flashing(&self, now: Timestamp) -> bool {
        self.flash.is_running(now)
    }

    /// Apply damage from any source
    ///
    /// First writer to take yield to zero wins the destruction; every later
    /// hit is ignored.
    pub fn on_hit(&mut self, damage: f32, now: Timestamp) -> HitOutcome {
        if self.destroyed || !damage.is_finite() || damage < 0.0 {
            return HitOutcome::Ignored;
        }

        self.current_yield -= damage;
        self.flash.cancel();
        self.flash.schedule(now, HIT_FLASH_DURATION);

        if self.current_yield <= 0.0 {
            self.current_yield = 0.0;
            self.mark_destroyed();
            HitOutcome::Destroyed { pickup: None }
        } else {
            HitOutcome::Damaged {
                remaining: self.current_yield,
            }
        }
    }
}

/// Damage a harvestable entity through the shared path
///
/// On destruction this spawns a single pickup at the target's position and
/// despawns the target, so stale references to it stop resolving.
pub fn apply_damage<S: SceneContext + ?Sized>(
    scene: &mut S,
    target: Entity,
    amount: f32,
    pickups: &PickupConfig,
) -> HitOutcome {
    let now = scene.now();
    let (outcome, resource_type, max_yield) = match scene.harvestable_mut(target) {
        Some(harvestable) => (
            harvestable.on_hit(amount, now),
            harvestable.resource_type,
            harvestable.max_yield,
        ),
        None => return HitOutcome::Ignored,
    };

    if !matches!(outcome, HitOutcome::Destroyed { .. }) {
        return outcome;
    }

    let position = scene
        .transform(target)
        .map(|transform| transform.position)
        .unwrap_or_else(Vec3::zeros);
    let pickup = ResourcePickup::new(
        resource_type,
        max_yield * pickups.salvage_fraction,
        now,
        pickups.lifetime,
    );
    let spawned = scene.spawn(
        SpawnDesc::Pickup {
            pickup,
            trigger_radius: pickups.trigger_radius,
        },
        Transform::from_position(position),
    );
    if spawned.is_none() {
        log::warn!("Scene refused to spawn a pickup for destroyed {:?}", target);
    }
    scene.despawn(target);

    log::info!(
        "Harvestable {:?} destroyed, dropped {} pickup",
        target,
        resource_type.name()
    );
    HitOutcome::Destroyed { pickup: spawned }
}
