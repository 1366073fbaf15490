//! Inventory collaborator

use crate::world::ResourceType;
use std::collections::HashMap;

/// Storage the harvester and pickups deposit into
pub trait Inventory {
    /// Total amount currently stored
    fn current_load(&self) -> f32;

    /// Maximum total amount
    fn max_capacity(&self) -> f32;

    /// Store `amount` of `resource`; returns `false` and changes nothing if
    /// it does not fit
    fn add_item(&mut self, resource: ResourceType, amount: f32) -> bool;

    /// Amount stored of one resource
    fn amount_of(&self, resource: ResourceType) -> f32;

    /// Whether `amount` more would fit
    fn can_accept(&self, amount: f32) -> bool {
        amount.is_finite() && amount > 0.0 && self.current_load() + amount <= self.max_capacity()
    }
}

/// Simple capacity-limited cargo hold
#[derive(Debug, Clone, Default)]
pub struct CargoHold {
    capacity: f32,
    contents: HashMap<ResourceType, f32>,
}

impl CargoHold {
    /// Create an empty hold
    pub fn new(capacity: f32) -> Self {
        Self {
            capacity: capacity.max(0.0),
            contents: HashMap::new(),
        }
    }

    /// Iterate over stored resources
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, f32)> + '_ {
        self.contents.iter().map(|(resource, amount)| (*resource, *amount))
    }
}

impl Inventory for CargoHold {
    fn current_load(&self) -> f32 {
        self.contents.values().sum()
    }

    fn max_capacity(&self) -> f32 {
        self.capacity
    }

    fn add_item(&mut self, resource: ResourceType, amount: f32) -> bool {
        if !self.can_accept(amount) {
            return false;
        }
        *self.contents.entry(resource).or_insert(0.0) += amount;
        true
    }

    fn amount_of(&self, resource: ResourceType) -> f32 {
        self.contents.get(&resource).copied().unwrap_or(0.0)
    }
}
