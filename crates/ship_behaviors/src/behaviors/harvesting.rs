//! Laser mining state machine
//!
//! The harvester cycles through four states:
//!
//! ```text
//! Idle --activate--> Targeting --target found--> Mining --cycle done--> Collecting
//!  ^                     |                         |                       |
//!  +----no target--------+----target invalid-------+------settle delay-----+
//! ```
//!
//! Targeting is transient: acquisition runs synchronously on entry, so the
//! machine leaves it before `activate` returns. Mining re-validates its
//! target every frame and aborts without partial credit if the target is
//! destroyed, moves out of range or loses line of sight.

use crate::config::{HarvestConfig, PickupConfig};
use crate::foundation::math::Vec3;
use crate::foundation::time::{OneShotTimer, Timestamp};
use crate::physics::Ray;
use crate::scene::{tags, Entity, RaycastResult, SceneContext};
use crate::world::{apply_damage, HitOutcome, Inventory};

use super::beam::LaserBeam;

const SHIP_SKIP: f32 = 1e-3;

/// Harvester state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarvestState {
    /// Waiting for activation
    Idle,
    /// Searching for a target
    Targeting,
    /// Beam on target, cycle running
    Mining,
    /// Cycle finished, yield deposited, settling before Idle
    Collecting,
}

impl HarvestState {
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Targeting => "targeting",
            Self::Mining => "mining",
            Self::Collecting => "collecting",
        }
    }
}

/// Target-acquisition and mining state machine for one ship
pub struct HarvestingStateMachine {
    ship: Entity,
    config: HarvestConfig,
    pickups: PickupConfig,
    inventory: Option<Box<dyn Inventory>>,

    state: HarvestState,
    target: Option<Entity>,
    mining_started_at: Timestamp,
    cycle_progress: f32,

    settle: OneShotTimer,
    beam: LaserBeam,
}

impl std::fmt::Debug for HarvestingStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvestingStateMachine")
            .field("ship", &self.ship)
            .field("state", &self.state)
            .field("target", &self.target)
            .field("cycle_progress", &self.cycle_progress)
            .field("has_inventory", &self.inventory.is_some())
            .finish_non_exhaustive()
    }
}

impl HarvestingStateMachine {
    /// Create an idle harvester for `ship`
    pub fn new(ship: Entity, config: HarvestConfig) -> Self {
        Self {
            ship,
            config,
            pickups: PickupConfig::default(),
            inventory: None,
            state: HarvestState::Idle,
            target: None,
            mining_started_at: 0.0,
            cycle_progress: 0.0,
            settle: OneShotTimer::new(),
            beam: LaserBeam::new(),
        }
    }

    /// Attach the inventory yields are deposited into
    pub fn with_inventory(mut self, inventory: Box<dyn Inventory>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    /// Use a pickup configuration for targets this harvester destroys
    pub fn with_pickup_config(mut self, pickups: PickupConfig) -> Self {
        self.pickups = pickups;
        self
    }

    /// Replace the inventory
    pub fn set_inventory(&mut self, inventory: Option<Box<dyn Inventory>>) {
        self.inventory = inventory;
    }

    /// Current state
    pub fn state(&self) -> HarvestState {
        self.state
    }

    /// Target being mined; only set while Mining or Collecting
    pub fn current_target(&self) -> Option<Entity> {
        self.target
    }

    /// Fraction of the current cycle completed, in `[0, 1]`
    pub fn cycle_progress(&self) -> f32 {
        self.cycle_progress
    }

    /// Active configuration
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Beam visual
    pub fn beam(&self) -> &LaserBeam {
        &self.beam
    }

    /// Attached inventory
    pub fn inventory(&self) -> Option<&dyn Inventory> {
        self.inventory.as_deref()
    }

    /// Attached inventory, mutably
    pub fn inventory_mut(&mut self) -> Option<&mut dyn Inventory> {
        match self.inventory.as_mut() {
            Some(inventory) => Some(inventory.as_mut()),
            None => None,
        }
    }

    /// Whether `activate` would start a new search
    pub fn can_activate(&self) -> bool {
        self.state == HarvestState::Idle
    }

    /// Start searching for a target
    ///
    /// From Idle this enters Targeting. From Targeting it forces a reset to
    /// Idle and starts over. Returns `false` while Mining or Collecting.
    pub fn activate<S: SceneContext + ?Sized>(&mut self, scene: &mut S) -> bool {
        match self.state {
            HarvestState::Idle => {
                self.transition_to(scene, HarvestState::Targeting);
                true
            }
            HarvestState::Targeting => {
                log::debug!("Harvester stuck in targeting, resetting");
                self.transition_to(scene, HarvestState::Idle);
                self.activate(scene)
            }
            HarvestState::Mining | HarvestState::Collecting => false,
        }
    }

    /// Advance one frame
    ///
    /// Cycle timing reads the scene clock, so `dt` only matters to the
    /// scene's own integration.
    pub fn update<S: SceneContext + ?Sized>(&mut self, scene: &mut S, _dt: f32) {
        match self.state {
            HarvestState::Idle | HarvestState::Targeting => {}
            HarvestState::Mining => self.update_mining(scene),
            HarvestState::Collecting => self.update_collecting(scene),
        }
    }

    fn update_mining<S: SceneContext + ?Sized>(&mut self, scene: &mut S) {
        let Some(target) = self.target else {
            self.transition_to(scene, HarvestState::Idle);
            return;
        };

        if !self.is_valid_target(&*scene, target) {
            log::info!("Mining target {:?} lost, cycle aborted", target);
            self.transition_to(scene, HarvestState::Idle);
            return;
        }

        let endpoints = (
            self.position(&*scene, self.ship),
            self.position(&*scene, target),
        );
        if let (Some(from), Some(to)) = endpoints {
            self.beam.align(scene, from, to);
        }

        let duration = self.config.mining_duration;
        #[allow(clippy::cast_possible_truncation)]
        let elapsed = (scene.now() - self.mining_started_at) as f32;
        self.cycle_progress = if duration > 0.0 {
            (elapsed / duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if elapsed >= duration {
            self.transition_to(scene, HarvestState::Collecting);
        }
    }

    fn update_collecting<S: SceneContext + ?Sized>(&mut self, scene: &mut S) {
        let now = scene.now();
        if self.settle.schedule(now, self.config.settle_delay) {
            log::debug!("Settle delay scheduled from update");
        }
        if self.settle.poll(now) {
            self.transition_to(scene, HarvestState::Idle);
        }
    }

    fn transition_to<S: SceneContext + ?Sized>(&mut self, scene: &mut S, next: HarvestState) {
        log::debug!("Harvester {} -> {}", self.state.name(), next.name());
        self.state = next;

        match next {
            HarvestState::Idle => {
                self.target = None;
                self.cycle_progress = 0.0;
                self.settle.cancel();
                self.beam.hide(scene);
            }
            HarvestState::Targeting => {
                self.find_target(scene);
            }
            HarvestState::Mining => {
                self.mining_started_at = scene.now();
                self.cycle_progress = 0.0;
                self.beam.show(scene);
            }
            HarvestState::Collecting => {
                self.beam.hide(scene);
                self.collect_resources(scene);
            }
        }
    }

    /// Pick the nearest valid harvestable and start mining it
    ///
    /// Falls back to Idle when nothing qualifies.
    pub fn find_target<S: SceneContext + ?Sized>(&mut self, scene: &mut S) -> Option<Entity> {
        let view: &S = scene;
        let nearest = self.position(view, self.ship).and_then(|origin| {
            view.tagged(tags::HARVESTABLE)
                .into_iter()
                .filter(|&candidate| candidate != self.ship)
                .filter(|&candidate| self.is_valid_target(view, candidate))
                .filter_map(|candidate| {
                    self.position(view, candidate)
                        .map(|position| (candidate, (position - origin).magnitude()))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(candidate, _)| candidate)
        });

        match nearest {
            Some(target) => {
                log::info!("Harvester locked on {:?}", target);
                self.target = Some(target);
                self.transition_to(scene, HarvestState::Mining);
            }
            None => {
                log::debug!("No harvestable target in range");
                self.transition_to(scene, HarvestState::Idle);
            }
        }

        nearest
    }

    /// Whether `target` is intact, in range and visible from the ship
    pub fn is_valid_target<S: SceneContext + ?Sized>(&self, scene: &S, target: Entity) -> bool {
        match scene.harvestable(target) {
            Some(harvestable) if !harvestable.is_destroyed() => {}
            _ => return false,
        }

        let (Some(from), Some(to)) = (self.position(scene, self.ship), self.position(scene, target))
        else {
            return false;
        };

        let distance = (to - from).magnitude();
        if !distance.is_finite() || distance > self.config.max_range {
            return false;
        }

        self.has_line_of_sight(scene, from, target)
    }

    /// Whether nothing solid sits between `from` and `target`
    ///
    /// The ray starts `los_origin_offset` toward the target. Hits on the ship
    /// itself are stepped past. Without raycast support the answer is always
    /// yes.
    pub fn has_line_of_sight<S: SceneContext + ?Sized>(
        &self,
        scene: &S,
        from: Vec3,
        target: Entity,
    ) -> bool {
        let Some(to) = self.position(scene, target) else {
            return false;
        };
        let Some((ray, distance)) = Ray::between(from, to) else {
            return true;
        };

        let mut start = self.config.los_origin_offset.max(0.0);
        if start >= distance {
            return true;
        }
        let cast = |t: f32| scene.raycast(&Ray::new(ray.point_at(t), ray.direction), distance - t);

        let mut result = cast(start);
        // A ship wider than the offset reports its own exit point; cast again past it
        if let RaycastResult::Hit(hit) = &result {
            if hit.entity == self.ship {
                start += hit.distance + SHIP_SKIP;
                if start >= distance {
                    return true;
                }
                result = cast(start);
            }
        }

        match result {
            RaycastResult::Unsupported | RaycastResult::Miss => true,
            RaycastResult::Hit(hit) if hit.entity == target || hit.entity == self.ship => true,
            RaycastResult::Hit(hit) => {
                let radius = scene.bounding_radius(target).unwrap_or(0.0);
                let target_surface = distance - radius;
                target_surface - (start + hit.distance) <= self.config.los_tolerance
            }
        }
    }

    /// Deposit the cycle's yield and damage the target
    ///
    /// Aborts to Idle, leaving the inventory untouched, when there is no
    /// target or inventory or the yield would not fit. On success the Idle
    /// transition is scheduled after the settle delay. Outside Collecting, or
    /// once this cycle's yield is already deposited, nothing happens.
    pub fn collect_resources<S: SceneContext + ?Sized>(&mut self, scene: &mut S) -> bool {
        if self.state != HarvestState::Collecting || self.settle.is_pending() {
            log::debug!("Ignoring collection request in {}", self.state.name());
            return false;
        }
        let Some(target) = self.target else {
            self.transition_to(scene, HarvestState::Idle);
            return false;
        };
        let Some(resource_type) = scene.harvestable(target).map(|h| h.resource_type) else {
            log::debug!("Target {:?} vanished before collection", target);
            self.transition_to(scene, HarvestState::Idle);
            return false;
        };

        let amount = self.config.resource_yield;
        let deposited = match self.inventory.as_deref_mut() {
            Some(inventory) if inventory.can_accept(amount) => {
                inventory.add_item(resource_type, amount)
            }
            Some(_) => {
                log::info!("Cargo full, {:.2} {} discarded", amount, resource_type.name());
                false
            }
            None => {
                log::debug!("No inventory attached, nothing collected");
                false
            }
        };
        if !deposited {
            self.transition_to(scene, HarvestState::Idle);
            return false;
        }

        log::info!("Collected {:.2} {}", amount, resource_type.name());
        match apply_damage(scene, target, self.config.damage_per_cycle, &self.pickups) {
            HitOutcome::Destroyed { .. } => log::debug!("Mining destroyed {:?}", target),
            HitOutcome::Damaged { remaining } => {
                log::debug!("Target {:?} has {:.2} left", target, remaining);
            }
            HitOutcome::Ignored => {}
        }

        self.settle.schedule(scene.now(), self.config.settle_delay);
        true
    }

    fn position<S: SceneContext + ?Sized>(&self, scene: &S, entity: Entity) -> Option<Vec3> {
        scene.transform(entity).map(|transform| transform.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::physics::CollisionLayers;
    use crate::sim::{SimEntity, SimScene};
    use crate::world::{CargoHold, Harvestable, ResourceType};
    use approx::assert_relative_eq;

    fn setup(scene: &mut SimScene, rock_at: Vec3) -> (Entity, Entity) {
        let ship = scene.insert(
            SimEntity::new(Transform::identity()).with_collider(1.0, CollisionLayers::PLAYER),
        );
        let rock = scene.insert(SimEntity::asteroid(
            Transform::from_position(rock_at),
            2.0,
            Harvestable::new(ResourceType::Ore, 3.0),
        ));
        (ship, rock)
    }

    fn harvester(ship: Entity, capacity: f32) -> HarvestingStateMachine {
        HarvestingStateMachine::new(ship, HarvestConfig::default())
            .with_inventory(Box::new(CargoHold::new(capacity)))
    }

    #[test]
    fn test_activate_locks_nearest() {
        let mut scene = SimScene::new();
        let (ship, far) = setup(&mut scene, Vec3::new(0.0, 0.0, -30.0));
        let near = scene.insert(SimEntity::asteroid(
            Transform::from_position(Vec3::new(10.0, 0.0, 0.0)),
            1.0,
            Harvestable::new(ResourceType::Ice, 2.0),
        ));
        let mut machine = harvester(ship, 10.0);

        assert!(machine.can_activate());
        assert!(machine.activate(&mut scene));
        assert_eq!(machine.state(), HarvestState::Mining);
        assert_eq!(machine.current_target(), Some(near));
        assert_ne!(machine.current_target(), Some(far));
        assert!(machine.beam().is_visible());
        assert!(!machine.can_activate());
        assert!(!machine.activate(&mut scene));
    }

    #[test]
    fn test_no_target_returns_to_idle() {
        let mut scene = SimScene::new();
        let (ship, _) = setup(&mut scene, Vec3::new(0.0, 0.0, -80.0));
        let mut machine = harvester(ship, 10.0);

        assert!(machine.activate(&mut scene));
        assert_eq!(machine.state(), HarvestState::Idle);
        assert!(machine.current_target().is_none());
    }

    #[test]
    fn test_progress_tracks_clock() {
        let mut scene = SimScene::new();
        let (ship, _) = setup(&mut scene, Vec3::new(0.0, 0.0, -10.0));
        let mut machine = harvester(ship, 10.0);
        machine.activate(&mut scene);

        scene.advance_clock(1.5);
        machine.update(&mut scene, 1.5);
        assert_eq!(machine.state(), HarvestState::Mining);
        assert_relative_eq!(machine.cycle_progress(), 0.5);
    }

    #[test]
    fn test_full_cycle() {
        let mut scene = SimScene::new();
        let (ship, rock) = setup(&mut scene, Vec3::new(0.0, 0.0, -10.0));
        let mut machine = harvester(ship, 10.0);
        machine.activate(&mut scene);

        scene.advance_clock(3.0);
        machine.update(&mut scene, 3.0);
        assert_eq!(machine.state(), HarvestState::Collecting);
        assert_eq!(machine.current_target(), Some(rock));
        assert!(!machine.beam().is_visible());
        assert_relative_eq!(scene.harvestable(rock).unwrap().current_yield(), 2.0);

        scene.advance_clock(0.25);
        machine.update(&mut scene, 0.25);
        assert_eq!(machine.state(), HarvestState::Collecting);

        scene.advance_clock(0.25);
        machine.update(&mut scene, 0.25);
        assert_eq!(machine.state(), HarvestState::Idle);
        assert!(machine.current_target().is_none());
        assert_relative_eq!(machine.inventory().unwrap().amount_of(ResourceType::Ore), 1.5);
    }

    #[test]
    fn test_out_of_range_aborts() {
        let mut scene = SimScene::new();
        let (ship, rock) = setup(&mut scene, Vec3::new(0.0, 0.0, -10.0));
        let mut machine = harvester(ship, 10.0);
        machine.activate(&mut scene);

        scene.set_transform(rock, Transform::from_position(Vec3::new(0.0, 0.0, -60.0)));
        scene.advance_clock(1.0);
        machine.update(&mut scene, 1.0);

        assert_eq!(machine.state(), HarvestState::Idle);
        assert_eq!(machine.cycle_progress(), 0.0);
    }

    #[test]
    fn test_line_of_sight_blocked() {
        let mut scene = SimScene::new();
        let (ship, rock) = setup(&mut scene, Vec3::new(0.0, 0.0, -20.0));
        scene.insert(
            SimEntity::new(Transform::from_position(Vec3::new(0.0, 0.0, -10.0)))
                .with_collider(2.0, CollisionLayers::ENVIRONMENT),
        );
        let machine = harvester(ship, 10.0);

        assert!(!machine.has_line_of_sight(&scene, Vec3::zeros(), rock));
        assert!(!machine.is_valid_target(&scene, rock));
    }

    #[test]
    fn test_line_of_sight_tolerates_neighbour_at_surface() {
        let mut scene = SimScene::new();
        let (ship, rock) = setup(&mut scene, Vec3::new(0.0, 0.0, -20.0));
        // Neighbour surface 0.2 units in front of the target's surface
        scene.insert(
            SimEntity::new(Transform::from_position(Vec3::new(0.0, 0.0, -18.8)))
                .with_collider(1.0, CollisionLayers::HARVESTABLE),
        );
        let machine = harvester(ship, 10.0);

        assert!(machine.has_line_of_sight(&scene, Vec3::zeros(), rock));
    }

    #[test]
    fn test_line_of_sight_without_raycast() {
        let mut scene = SimScene::without_raycast();
        let (ship, rock) = setup(&mut scene, Vec3::new(0.0, 0.0, -20.0));
        scene.insert(
            SimEntity::new(Transform::from_position(Vec3::new(0.0, 0.0, -10.0)))
                .with_collider(2.0, CollisionLayers::ENVIRONMENT),
        );
        let machine = harvester(ship, 10.0);

        assert!(machine.has_line_of_sight(&scene, Vec3::zeros(), rock));
    }

    #[test]
    fn test_overflow_aborts_without_damage() {
        let mut scene = SimScene::new();
        let (ship, rock) = setup(&mut scene, Vec3::new(0.0, 0.0, -10.0));
        let mut machine = harvester(ship, 1.0);
        machine.activate(&mut scene);

        scene.advance_clock(3.0);
        machine.update(&mut scene, 3.0);

        assert_eq!(machine.state(), HarvestState::Idle);
        assert_eq!(machine.inventory().unwrap().current_load(), 0.0);
        assert_relative_eq!(scene.harvestable(rock).unwrap().current_yield(), 3.0);
    }

    #[test]
    fn test_missing_inventory_aborts() {
        let mut scene = SimScene::new();
        let (ship, _) = setup(&mut scene, Vec3::new(0.0, 0.0, -10.0));
        let mut machine = HarvestingStateMachine::new(ship, HarvestConfig::default());
        machine.activate(&mut scene);

        scene.advance_clock(3.0);
        machine.update(&mut scene, 3.0);
        assert_eq!(machine.state(), HarvestState::Idle);
    }

    #[test]
    fn test_line_of_sight_past_wide_ship() {
        let mut scene = SimScene::new();
        let ship = scene.insert(
            SimEntity::new(Transform::identity()).with_collider(3.0, CollisionLayers::PLAYER),
        );
        let rock = scene.insert(SimEntity::asteroid(
            Transform::from_position(Vec3::new(0.0, 0.0, -20.0)),
            2.0,
            Harvestable::new(ResourceType::Ore, 3.0),
        ));
        let machine = harvester(ship, 10.0);
        assert!(machine.has_line_of_sight(&scene, Vec3::zeros(), rock));

        scene.insert(
            SimEntity::new(Transform::from_position(Vec3::new(0.0, 0.0, -10.0)))
                .with_collider(3.0, CollisionLayers::ENVIRONMENT),
        );
        assert!(!machine.has_line_of_sight(&scene, Vec3::zeros(), rock));
        assert!(!machine.is_valid_target(&scene, rock));
    }

    #[test]
    fn test_collect_only_while_collecting() {
        let mut scene = SimScene::new();
        let (ship, rock) = setup(&mut scene, Vec3::new(0.0, 0.0, -10.0));
        let mut machine = harvester(ship, 10.0);

        assert!(!machine.collect_resources(&mut scene));
        machine.activate(&mut scene);
        assert!(!machine.collect_resources(&mut scene));
        assert_eq!(machine.state(), HarvestState::Mining);
        assert_eq!(machine.inventory().unwrap().current_load(), 0.0);

        scene.advance_clock(3.0);
        machine.update(&mut scene, 3.0);
        assert_eq!(machine.state(), HarvestState::Collecting);
        assert!(!machine.collect_resources(&mut scene));
        assert_relative_eq!(machine.inventory().unwrap().current_load(), 1.5);
        assert_relative_eq!(scene.harvestable(rock).unwrap().current_yield(), 2.0);

        scene.advance_clock(0.016);
        machine.update(&mut scene, 0.016);
        assert_eq!(machine.state(), HarvestState::Collecting);

        scene.advance_clock(0.5);
        machine.update(&mut scene, 0.5);
        assert_eq!(machine.state(), HarvestState::Idle);
    }
}
