//! # Ship Behaviors
//!
//! Per-frame behavior runtime for player-controlled ship entities.
//!
//! ## Features
//!
//! - **Movement**: thrust and rotation through rigid-body forces, with a
//!   kinematic fallback when the entity has no physics body
//! - **Laser Mining**: a target-acquisition and harvesting state machine that
//!   re-validates its target every frame
//! - **Chase Camera**: smoothed translation with rigid rotation and recovery
//!   from non-finite camera state
//!
//! The runtime never owns the scene. Every controller borrows a
//! [`SceneContext`](scene::SceneContext) for the duration of one call, so any
//! engine that implements the trait can drive it. [`sim::SimScene`] is the
//! bundled in-memory implementation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ship_behaviors::prelude::*;
//!
//! let config = RuntimeConfig::default();
//! let mut scene = SimScene::new();
//! let ship = scene.insert(
//!     SimEntity::new(Transform::identity())
//!         .with_rigid_body(1.0)
//!         .with_collider(1.0, CollisionLayers::PLAYER),
//! );
//!
//! let mut movement = MovementController::new(ship, config.movement.clone());
//! let mut harvester = HarvestingStateMachine::new(ship, config.harvesting.clone())
//!     .with_inventory(Box::new(CargoHold::new(50.0)));
//!
//! let dt = 1.0 / 60.0;
//! movement.thrust(&mut scene, Vec3::new(0.0, 0.0, -1.0));
//! harvester.activate(&mut scene);
//! scene.step(dt);
//! harvester.update(&mut scene, dt);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod physics;
pub mod world;
pub mod behaviors;
pub mod sim;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        behaviors::{
            CameraFollowController, HarvestState, HarvestingStateMachine, LaserBeam,
            MovementController, ShipInput,
        },
        config::{
            CameraConfig, Config, ConfigError, ConfigFormat, HarvestConfig, MovementConfig,
            PickupConfig, ProjectileConfig, RuntimeConfig,
        },
        foundation::math::{Quat, Transform, Vec3},
        physics::{CollisionLayers, Ray, RayHit},
        scene::{tags, Entity, RaycastResult, SceneContext, SpawnDesc, Timestamp},
        sim::{SimEntity, SimScene},
        world::{
            apply_damage, CargoHold, Harvestable, HitOutcome, Inventory, PickupCollector,
            ProjectileSet, ResourcePickup, ResourceType,
        },
    };
}
