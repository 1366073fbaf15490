//! Scene abstraction consumed by the behaviors
//!
//! The scene engine owns every entity, transform and physics body. Behaviors
//! only see it through [`SceneContext`], borrowed for the duration of a single
//! call, so no controller can hold on to scene state between frames.

mod entity;

pub use entity::Entity;
pub use crate::foundation::time::Timestamp;

use crate::foundation::math::{Transform, Vec3};
use crate::physics::{Ray, RayHit};
use crate::world::{Harvestable, ResourcePickup};

/// Well-known entity tags used by world queries
pub mod tags {
    /// Entities the harvester may mine
    pub const HARVESTABLE: &str = "harvestable";

    /// Resource pickups awaiting collection
    pub const PICKUP: &str = "pickup";

    /// Laser beam visuals
    pub const LASER_BEAM: &str = "laser_beam";
}

/// Outcome of a raycast query
#[derive(Debug, Clone, Copy)]
pub enum RaycastResult {
    /// The scene has no raycast capability
    Unsupported,
    /// Nothing was hit within range
    Miss,
    /// Closest hit along the ray
    Hit(RayHit),
}

/// Entities a behavior may ask the scene to create
#[derive(Debug, Clone)]
pub enum SpawnDesc {
    /// Laser beam visual (no collider)
    LaserBeam,
    /// Resource pickup with a trigger collider of the given radius
    Pickup {
        /// Pickup payload
        pickup: ResourcePickup,
        /// Trigger radius
        trigger_radius: f32,
    },
}

/// Per-call access to the scene engine
///
/// Every method is infallible: a missing entity or capability is reported
/// through `None`/`false` and callers degrade instead of erroring.
pub trait SceneContext {
    // Clock

    /// Current scene time in seconds
    fn now(&self) -> Timestamp;

    // Transforms and scene graph

    /// World transform of an entity
    fn transform(&self, entity: Entity) -> Option<Transform>;

    /// Overwrite an entity's world transform
    fn set_transform(&mut self, entity: Entity, transform: Transform) -> bool;

    /// Whether the entity is attached to the scene graph
    fn is_attached(&self, entity: Entity) -> bool;

    /// Show or hide an entity's visual
    fn set_visible(&mut self, entity: Entity, visible: bool) -> bool;

    // Physics

    /// Whether the entity has a rigid-body component
    fn has_rigid_body(&self, entity: Entity) -> bool;

    /// Whether the entity has a collision component
    fn has_collider(&self, entity: Entity) -> bool;

    /// Accumulate a world-space force for the next physics step
    fn apply_force(&mut self, entity: Entity, force: Vec3) -> bool;

    /// Accumulate a world-space torque for the next physics step
    fn apply_torque(&mut self, entity: Entity, torque: Vec3) -> bool;

    /// Current linear velocity of a rigid body
    fn linear_velocity(&self, entity: Entity) -> Option<Vec3>;

    /// Overwrite the linear velocity of a rigid body
    fn set_linear_velocity(&mut self, entity: Entity, velocity: Vec3) -> bool;

    /// Closest solid (non-trigger) hit along `ray` within `max_distance`
    fn raycast(&self, ray: &Ray, max_distance: f32) -> RaycastResult;

    /// Bounding radius of an entity's collider
    fn bounding_radius(&self, entity: Entity) -> Option<f32>;

    /// Whether two entities' colliders overlap (triggers included)
    fn overlaps(&self, a: Entity, b: Entity) -> bool;

    // World queries and components

    /// All live entities carrying `tag`
    fn tagged(&self, tag: &str) -> Vec<Entity>;

    /// Harvestable component of an entity
    fn harvestable(&self, entity: Entity) -> Option<&Harvestable>;

    /// Mutable harvestable component of an entity
    fn harvestable_mut(&mut self, entity: Entity) -> Option<&mut Harvestable>;

    /// Pickup component of an entity
    fn pickup(&self, entity: Entity) -> Option<&ResourcePickup>;

    // Lifecycle

    /// Create a new entity at `transform`
    fn spawn(&mut self, desc: SpawnDesc, transform: Transform) -> Option<Entity>;

    /// Remove an entity; stale references stop resolving afterwards
    fn despawn(&mut self, entity: Entity) -> bool;
}
