//! Projectiles: the second damage source for harvestables

use crate::config::{PickupConfig, ProjectileConfig};
use crate::foundation::math::{is_finite_vec, is_valid_dt, Vec3};
use crate::foundation::time::{Lifetime, Timestamp};
use crate::physics::{Ray, RayHit};
use crate::scene::{Entity, RaycastResult, SceneContext};
use crate::world::harvestable::{apply_damage, HitOutcome};

const OWNER_SKIP: f32 = 1e-3;

/// A single projectile in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    /// Current position
    pub position: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Damage on impact
    pub damage: f32,
    /// Entity that fired it; its own collider never stops it
    pub owner: Option<Entity>,
    /// Expiry timer
    pub lifetime: Lifetime,
}

/// Active-projectile set owned by the driver
///
/// Projectiles are swept against the scene with a raycast each frame, so
/// fast shots cannot tunnel through thin targets.
#[derive(Debug)]
pub struct ProjectileSet {
    config: ProjectileConfig,
    pickups: PickupConfig,
    projectiles: Vec<Projectile>,
}

impl ProjectileSet {
    /// Create an empty set
    pub fn new(config: ProjectileConfig, pickups: PickupConfig) -> Self {
        Self {
            config,
            pickups,
            projectiles: Vec::new(),
        }
    }

    /// Number of projectiles in flight
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Whether nothing is in flight
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Projectiles in flight
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Launch a projectile
    ///
    /// Returns `false` if the set is full or the direction is unusable.
    pub fn fire(
        &mut self,
        now: Timestamp,
        origin: Vec3,
        direction: Vec3,
        owner: Option<Entity>,
    ) -> bool {
        if self.projectiles.len() >= self.config.max_active {
            return false;
        }
        if !is_finite_vec(&origin) || !is_finite_vec(&direction) {
            return false;
        }
        let Some(direction) = direction.try_normalize(f32::EPSILON) else {
            return false;
        };

        self.projectiles.push(Projectile {
            position: origin,
            velocity: direction * self.config.speed,
            damage: self.config.damage,
            owner,
            lifetime: Lifetime::new(now, self.config.lifetime),
        });
        true
    }

    /// Advance every projectile by `dt`
    ///
    /// Returns the outcome of every impact on a harvestable this frame.
    pub fn update<S: SceneContext + ?Sized>(&mut self, scene: &mut S, dt: f32) -> Vec<HitOutcome> {
        let mut impacts = Vec::new();
        if !is_valid_dt(dt) {
            return impacts;
        }
        let now = scene.now();

        let mut survivors = Vec::with_capacity(self.projectiles.len());
        for mut projectile in self.projectiles.drain(..) {
            if projectile.lifetime.is_expired(now) {
                continue;
            }

            let next = projectile.position + projectile.velocity * dt;
            let hit = Ray::between(projectile.position, next)
                .and_then(|(ray, length)| sweep(&*scene, &ray, length, projectile.owner));

            match hit {
                Some(hit) => {
                    if scene.harvestable(hit.entity).is_some() {
                        let outcome =
                            apply_damage(scene, hit.entity, projectile.damage, &self.pickups);
                        impacts.push(outcome);
                    }
                }
                None => {
                    projectile.position = next;
                    survivors.push(projectile);
                }
            }
        }
        self.projectiles = survivors;

        impacts
    }

    /// Drop every projectile
    pub fn clear(&mut self) {
        self.projectiles.clear();
    }
}

// Closest non-owner hit along the sweep; a hit on the owner is stepped past
// once, since shots leave from inside the firing ship's collider.
fn sweep<S: SceneContext + ?Sized>(
    scene: &S,
    ray: &Ray,
    length: f32,
    owner: Option<Entity>,
) -> Option<RayHit> {
    match scene.raycast(ray, length) {
        RaycastResult::Hit(hit) if Some(hit.entity) == owner => {
            let skip = hit.distance + OWNER_SKIP;
            if skip >= length {
                return None;
            }
            let rest = Ray::new(ray.point_at(skip), ray.direction);
            match scene.raycast(&rest, length - skip) {
                RaycastResult::Hit(next) if Some(next.entity) != owner => Some(RayHit {
                    distance: next.distance + skip,
                    ..next
                }),
                _ => None,
            }
        }
        RaycastResult::Hit(hit) => Some(hit),
        RaycastResult::Miss | RaycastResult::Unsupported => None,
    }
}
