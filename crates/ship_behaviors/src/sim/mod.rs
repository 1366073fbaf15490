//! In-memory scene implementation
//!
//! `SimScene` stands in for the scene engine in tests and headless runs:
//! slotmap-backed entity storage, sphere colliders, explicit Euler
//! integration for rigid bodies and sphere raycasts. It renders nothing.

mod entity;

pub use entity::{Collider, SimEntity};

use crate::foundation::math::{Transform, Vec3};
use crate::foundation::time::{FrameClock, Timestamp};
use crate::physics::{CollisionLayers, Ray, RayHit};
use crate::scene::{tags, Entity, RaycastResult, SceneContext, SpawnDesc};
use crate::world::{Harvestable, ResourcePickup};
use slotmap::SlotMap;

/// Simulated scene
#[derive(Debug, Clone)]
pub struct SimScene {
    entities: SlotMap<Entity, SimEntity>,
    clock: FrameClock,
    raycast_enabled: bool,
}

impl Default for SimScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SimScene {
    /// Create an empty scene with raycasting available
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            clock: FrameClock::new(),
            raycast_enabled: true,
        }
    }

    /// Create a scene whose physics backend offers no raycasts
    pub fn without_raycast() -> Self {
        Self {
            raycast_enabled: false,
            ..Self::new()
        }
    }

    /// Add an entity
    pub fn insert(&mut self, entity: SimEntity) -> Entity {
        self.entities.insert(entity)
    }

    /// Look up an entity record
    pub fn get(&self, entity: Entity) -> Option<&SimEntity> {
        self.entities.get(entity)
    }

    /// Look up an entity record mutably
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut SimEntity> {
        self.entities.get_mut(entity)
    }

    /// Whether the entity is still alive
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Attach an entity to the scene graph
    pub fn attach(&mut self, entity: Entity) -> bool {
        self.entities
            .get_mut(entity)
            .map(|record| record.attached = true)
            .is_some()
    }

    /// Advance time without integrating physics
    pub fn advance_clock(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    /// Integrate rigid bodies and advance time by `dt`
    pub fn step(&mut self, dt: f32) {
        for record in self.entities.values_mut() {
            if !record.attached {
                continue;
            }
            let Some(body) = record.body.as_mut() else {
                continue;
            };
            let (translation, rotation) = body.integrate(dt);
            record.transform.position += translation;
            record.transform.rotation = rotation * record.transform.rotation;
            record.transform.rotation.renormalize();
        }
        self.clock.advance(dt);
    }

    /// Frame counter from the scene clock
    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }
}

impl SceneContext for SimScene {
    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn transform(&self, entity: Entity) -> Option<Transform> {
        self.entities.get(entity).map(|record| record.transform)
    }

    fn set_transform(&mut self, entity: Entity, transform: Transform) -> bool {
        self.entities
            .get_mut(entity)
            .map(|record| record.transform = transform)
            .is_some()
    }

    fn is_attached(&self, entity: Entity) -> bool {
        self.entities.get(entity).is_some_and(|record| record.attached)
    }

    fn set_visible(&mut self, entity: Entity, visible: bool) -> bool {
        self.entities
            .get_mut(entity)
            .map(|record| record.visible = visible)
            .is_some()
    }

    fn has_rigid_body(&self, entity: Entity) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|record| record.body.is_some())
    }

    fn has_collider(&self, entity: Entity) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|record| record.collider.is_some())
    }

    fn apply_force(&mut self, entity: Entity, force: Vec3) -> bool {
        match self.entities.get_mut(entity).and_then(|record| record.body.as_mut()) {
            Some(body) => {
                body.add_force(force);
                true
            }
            None => false,
        }
    }

    fn apply_torque(&mut self, entity: Entity, torque: Vec3) -> bool {
        match self.entities.get_mut(entity).and_then(|record| record.body.as_mut()) {
            Some(body) => {
                body.add_torque(torque);
                true
            }
            None => false,
        }
    }

    fn linear_velocity(&self, entity: Entity) -> Option<Vec3> {
        self.entities
            .get(entity)
            .and_then(|record| record.body.as_ref())
            .map(|body| body.velocity)
    }

    fn set_linear_velocity(&mut self, entity: Entity, velocity: Vec3) -> bool {
        match self.entities.get_mut(entity).and_then(|record| record.body.as_mut()) {
            Some(body) => {
                body.velocity = velocity;
                true
            }
            None => false,
        }
    }

    fn raycast(&self, ray: &Ray, max_distance: f32) -> RaycastResult {
        if !self.raycast_enabled {
            return RaycastResult::Unsupported;
        }

        let mut closest: Option<RayHit> = None;
        for (entity, record) in &self.entities {
            let Some(collider) = record.collider else {
                continue;
            };
            if !record.attached
                || collider.is_trigger
                || !CollisionLayers::matches(collider.layer, CollisionLayers::SOLID)
            {
                continue;
            }
            let Some(sphere) = record.bounding_sphere() else {
                continue;
            };
            let Some((distance, point, normal)) = sphere.intersect_ray(ray) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            if closest.map_or(true, |hit| distance < hit.distance) {
                closest = Some(RayHit {
                    entity,
                    distance,
                    point,
                    normal,
                });
            }
        }

        closest.map_or(RaycastResult::Miss, RaycastResult::Hit)
    }

    fn bounding_radius(&self, entity: Entity) -> Option<f32> {
        self.entities
            .get(entity)
            .and_then(|record| record.collider)
            .map(|collider| collider.radius)
    }

    fn overlaps(&self, a: Entity, b: Entity) -> bool {
        let sphere_a = self.entities.get(a).and_then(SimEntity::bounding_sphere);
        let sphere_b = self.entities.get(b).and_then(SimEntity::bounding_sphere);
        match (sphere_a, sphere_b) {
            (Some(sphere_a), Some(sphere_b)) => sphere_a.intersects(&sphere_b),
            _ => false,
        }
    }

    fn tagged(&self, tag: &str) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|(_, record)| record.attached && record.has_tag(tag))
            .map(|(entity, _)| entity)
            .collect()
    }

    fn harvestable(&self, entity: Entity) -> Option<&Harvestable> {
        self.entities
            .get(entity)
            .and_then(|record| record.harvestable.as_ref())
    }

    fn harvestable_mut(&mut self, entity: Entity) -> Option<&mut Harvestable> {
        self.entities
            .get_mut(entity)
            .and_then(|record| record.harvestable.as_mut())
    }

    fn pickup(&self, entity: Entity) -> Option<&ResourcePickup> {
        self.entities
            .get(entity)
            .and_then(|record| record.pickup.as_ref())
    }

    fn spawn(&mut self, desc: SpawnDesc, transform: Transform) -> Option<Entity> {
        let record = match desc {
            SpawnDesc::LaserBeam => SimEntity::new(transform).with_tag(tags::LASER_BEAM),
            SpawnDesc::Pickup {
                pickup,
                trigger_radius,
            } => {
                let mut record = SimEntity::new(transform)
                    .with_trigger(trigger_radius, CollisionLayers::PICKUP)
                    .with_tag(tags::PICKUP);
                record.pickup = Some(pickup);
                record
            }
        };
        Some(self.entities.insert(record))
    }

    fn despawn(&mut self, entity: Entity) -> bool {
        self.entities.remove(entity).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ResourceType;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_integrates_forces() {
        let mut scene = SimScene::new();
        let ship = scene.insert(SimEntity::new(Transform::identity()).with_rigid_body(1.0));

        scene.apply_force(ship, Vec3::new(0.0, 0.0, -10.0));
        scene.step(0.5);

        assert_relative_eq!(scene.linear_velocity(ship).unwrap(), Vec3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(
            scene.transform(ship).unwrap().position,
            Vec3::new(0.0, 0.0, -2.5)
        );
        assert_relative_eq!(scene.now(), 0.5);
    }

    #[test]
    fn test_raycast_closest_solid() {
        let mut scene = SimScene::new();
        let near = scene.insert(SimEntity::asteroid(
            Transform::from_position(Vec3::new(0.0, 0.0, -10.0)),
            1.0,
            Harvestable::new(ResourceType::Ore, 3.0),
        ));
        scene.insert(SimEntity::asteroid(
            Transform::from_position(Vec3::new(0.0, 0.0, -20.0)),
            1.0,
            Harvestable::new(ResourceType::Ore, 3.0),
        ));
        scene.insert(
            SimEntity::new(Transform::from_position(Vec3::new(0.0, 0.0, -5.0)))
                .with_trigger(1.0, CollisionLayers::PICKUP),
        );

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        match scene.raycast(&ray, 100.0) {
            RaycastResult::Hit(hit) => {
                assert_eq!(hit.entity, near);
                assert_relative_eq!(hit.distance, 9.0, epsilon = 1e-4);
            }
            other => panic!("expected a hit, got {other:?}"),
        }

        assert!(matches!(scene.raycast(&ray, 5.0), RaycastResult::Miss));
    }

    #[test]
    fn test_raycast_unsupported() {
        let scene = SimScene::without_raycast();
        let ray = Ray::new(Vec3::zeros(), Vec3::x());
        assert!(matches!(scene.raycast(&ray, 10.0), RaycastResult::Unsupported));
    }

    #[test]
    fn test_despawned_entity_stops_resolving() {
        let mut scene = SimScene::new();
        let rock = scene.insert(SimEntity::asteroid(
            Transform::identity(),
            1.0,
            Harvestable::new(ResourceType::Ice, 1.0),
        ));
        assert_eq!(scene.tagged(tags::HARVESTABLE), vec![rock]);
        assert!(scene.despawn(rock));
        assert!(scene.harvestable(rock).is_none());
        assert!(scene.tagged(tags::HARVESTABLE).is_empty());
        assert!(!scene.despawn(rock));
    }

    #[test]
    fn test_detached_entities_skip_queries() {
        let mut scene = SimScene::new();
        let rock = scene.insert(
            SimEntity::asteroid(
                Transform::identity(),
                1.0,
                Harvestable::new(ResourceType::Ore, 1.0),
            )
            .detached(),
        );
        assert!(!scene.is_attached(rock));
        assert!(scene.tagged(tags::HARVESTABLE).is_empty());
        scene.attach(rock);
        assert!(scene.is_attached(rock));
    }
}
