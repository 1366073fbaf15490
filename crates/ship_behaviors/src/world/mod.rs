//! World-side components the behaviors act on
//!
//! Harvestables, the inventory collaborator, resource pickups and
//! projectiles. [`apply_damage`] is the single entry point for hurting a
//! harvestable, shared by the mining laser and projectile impacts.

pub mod harvestable;
pub mod inventory;
pub mod pickup;
pub mod projectile;

pub use harvestable::{apply_damage, Harvestable, HitOutcome, ResourceType};
pub use inventory::{CargoHold, Inventory};
pub use pickup::{PickupCollector, PickupReport, ResourcePickup};
pub use projectile::{Projectile, ProjectileSet};
