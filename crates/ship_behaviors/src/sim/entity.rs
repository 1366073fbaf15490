//! Entity record stored by the simulated scene

use crate::foundation::math::Transform;
use crate::physics::{BoundingSphere, CollisionLayers, RigidBody};
use crate::world::{Harvestable, ResourcePickup};

/// Sphere collider
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    /// Sphere radius
    pub radius: f32,
    /// Layer bits this collider lives on
    pub layer: u32,
    /// Trigger volumes report overlaps but never stop rays
    pub is_trigger: bool,
}

/// One entity in a [`SimScene`](super::SimScene)
///
/// Built with the `with_*` methods and handed to `SimScene::insert`.
#[derive(Debug, Clone)]
pub struct SimEntity {
    /// World transform
    pub transform: Transform,
    /// Whether the entity is attached to the scene graph
    pub attached: bool,
    /// Whether the visual is shown
    pub visible: bool,
    /// Tags for world queries
    pub tags: Vec<String>,
    /// Optional rigid body
    pub body: Option<RigidBody>,
    /// Optional collider
    pub collider: Option<Collider>,
    /// Optional harvestable component
    pub harvestable: Option<Harvestable>,
    /// Optional pickup component
    pub pickup: Option<ResourcePickup>,
}

impl SimEntity {
    /// Attached, visible entity with nothing but a transform
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            attached: true,
            visible: true,
            tags: Vec::new(),
            body: None,
            collider: None,
            harvestable: None,
            pickup: None,
        }
    }

    /// Add a rigid body
    pub fn with_rigid_body(mut self, mass: f32) -> Self {
        self.body = Some(RigidBody::new(mass));
        self
    }

    /// Add a solid sphere collider
    pub fn with_collider(mut self, radius: f32, layer: u32) -> Self {
        self.collider = Some(Collider {
            radius,
            layer,
            is_trigger: false,
        });
        self
    }

    /// Add a trigger sphere
    pub fn with_trigger(mut self, radius: f32, layer: u32) -> Self {
        self.collider = Some(Collider {
            radius,
            layer,
            is_trigger: true,
        });
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Make the entity harvestable, tagging it for target searches
    pub fn with_harvestable(mut self, harvestable: Harvestable) -> Self {
        self.harvestable = Some(harvestable);
        if !self.has_tag(crate::scene::tags::HARVESTABLE) {
            self.tags.push(crate::scene::tags::HARVESTABLE.to_string());
        }
        self
    }

    /// Asteroid helper: harvestable with a solid collider
    pub fn asteroid(transform: Transform, radius: f32, harvestable: Harvestable) -> Self {
        Self::new(transform)
            .with_collider(radius, CollisionLayers::HARVESTABLE)
            .with_harvestable(harvestable)
    }

    /// Start detached from the scene graph
    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    /// Whether the entity carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// World-space bounding sphere of the collider
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.collider
            .map(|collider| BoundingSphere::new(self.transform.position, collider.radius))
    }
}
