//! Resource pickups dropped by destroyed harvestables

use crate::foundation::time::{Lifetime, Timestamp};
use crate::scene::{tags, Entity, SceneContext};
use crate::world::{Inventory, ResourceType};

/// Floating resource that self-destructs unless collected
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePickup {
    /// Resource carried
    pub resource_type: ResourceType,
    /// Amount added to the inventory on collection
    pub amount: f32,
    /// Self-destruct timer
    pub lifetime: Lifetime,
}

impl ResourcePickup {
    /// Create a pickup spawned at `now`
    pub fn new(resource_type: ResourceType, amount: f32, now: Timestamp, lifetime: f32) -> Self {
        Self {
            resource_type,
            amount,
            lifetime: Lifetime::new(now, lifetime),
        }
    }
}

/// What one collector pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickupReport {
    /// Pickups moved into the inventory
    pub collected: usize,
    /// Pickups that timed out
    pub expired: usize,
}

/// Expires and auto-collects pickups each frame
#[derive(Debug, Default)]
pub struct PickupCollector;

impl PickupCollector {
    /// Create a collector
    pub fn new() -> Self {
        Self
    }

    /// Run one frame
    ///
    /// Expired pickups are despawned first. Any remaining pickup whose
    /// trigger overlaps `collector` is deposited into `inventory`; if the
    /// inventory refuses it the pickup stays in the world.
    pub fn update<S: SceneContext + ?Sized>(
        &mut self,
        scene: &mut S,
        collector: Entity,
        inventory: &mut dyn Inventory,
    ) -> PickupReport {
        let now = scene.now();
        let mut report = PickupReport::default();

        for entity in scene.tagged(tags::PICKUP) {
            let Some(pickup) = scene.pickup(entity).cloned() else {
                continue;
            };

            if pickup.lifetime.is_expired(now) {
                scene.despawn(entity);
                report.expired += 1;
                log::debug!("Pickup {:?} expired uncollected", entity);
                continue;
            }

            if !scene.overlaps(entity, collector) {
                continue;
            }

            if inventory.add_item(pickup.resource_type, pickup.amount) {
                scene.despawn(entity);
                report.collected += 1;
                log::info!(
                    "Collected {:.2} {} pickup",
                    pickup.amount,
                    pickup.resource_type.name()
                );
            }
        }

        report
    }
}
