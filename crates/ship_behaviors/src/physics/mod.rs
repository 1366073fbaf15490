//! Physics primitives for raycasts, trigger overlap and rigid bodies
//!
//! These are the data types the scene abstraction speaks in. The bundled
//! [`SimScene`](crate::sim::SimScene) uses them for its own collision and
//! integration; a real engine only needs to produce [`RayHit`]s.

pub mod primitives;
pub mod collision_layers;
pub mod body;

pub use primitives::{BoundingSphere, Ray, RayHit};
pub use collision_layers::CollisionLayers;
pub use body::RigidBody;
