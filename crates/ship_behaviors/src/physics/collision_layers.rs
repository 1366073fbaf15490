//! Collision layer bits for filtering raycasts and overlaps

/// Collision layer definitions as bit constants
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision layer
    pub const NONE: u32 = 0;

    /// All collision layers
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Player ships
    pub const PLAYER: u32 = 1 << 0;

    /// Harvestable asteroids and other minable bodies
    pub const HARVESTABLE: u32 = 1 << 1;

    /// Static environment geometry
    pub const ENVIRONMENT: u32 = 1 << 2;

    /// Resource pickups (trigger volumes)
    pub const PICKUP: u32 = 1 << 3;

    /// Visual-only effects such as laser beams
    pub const EFFECT: u32 = 1 << 4;

    /// Layers that stop a line-of-sight or projectile ray
    pub const SOLID: u32 = Self::PLAYER | Self::HARVESTABLE | Self::ENVIRONMENT;

    /// Check if two entities should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask and B's layer must be in A's mask.
    pub fn should_collide(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        (layer_a & mask_b) != 0 && (layer_b & mask_a) != 0
    }

    /// Whether an entity on `layer` is visible to a query using `mask`
    pub fn matches(layer: u32, mask: u32) -> bool {
        (layer & mask) != 0
    }

    /// Helper to create a mask from multiple layers
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(0, |acc, &layer| acc | layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::PICKUP,
            CollisionLayers::PICKUP,
            CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::PICKUP,
            CollisionLayers::PICKUP,
            CollisionLayers::HARVESTABLE,
        ));
    }

    #[test]
    fn test_solid_excludes_triggers_and_effects() {
        assert!(CollisionLayers::matches(CollisionLayers::HARVESTABLE, CollisionLayers::SOLID));
        assert!(!CollisionLayers::matches(CollisionLayers::PICKUP, CollisionLayers::SOLID));
        assert!(!CollisionLayers::matches(CollisionLayers::EFFECT, CollisionLayers::SOLID));
    }

    #[test]
    fn test_mask_creation() {
        let mask = CollisionLayers::mask(&[
            CollisionLayers::PLAYER,
            CollisionLayers::HARVESTABLE,
            CollisionLayers::ENVIRONMENT,
        ]);
        assert_eq!(mask, CollisionLayers::SOLID);
    }
}
