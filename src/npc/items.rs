//! Dropped items
//!
//! Item kinds an ace can leave behind, the factory that turns a
//! [`LootDrop`](super::death::LootDrop) into an entity, and the pickup manager
//! that caps how many dropped pickups stay in the world.

use bevy::prelude::*;
use serde::Serialize;
use std::collections::VecDeque;

use super::components::{Dissolving, PhysicsBody};
use super::death::LootDrop;

/// Item types dropped on death
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemKind {
    Ar2AltFireAmmo,
    Smg1GrenadeAmmo,
    HealthVial,
}

impl ItemKind {
    /// Entity class name
    pub fn classname(&self) -> &'static str {
        match self {
            ItemKind::Ar2AltFireAmmo => "item_ammo_ar2_altfire",
            ItemKind::Smg1GrenadeAmmo => "item_ammo_smg1_grenade",
            ItemKind::HealthVial => "item_healthvial",
        }
    }

    /// Whether spawned items of this kind carry a physics body. Ammo crates
    /// tumble; health vials rest where they land.
    pub fn is_physics_simulated(&self) -> bool {
        match self {
            ItemKind::Ar2AltFireAmmo | ItemKind::Smg1GrenadeAmmo => true,
            ItemKind::HealthVial => false,
        }
    }
}

/// A dropped item entity
#[derive(Component, Debug, Clone)]
pub struct Item {
    pub kind: ItemKind,
}

/// Spawn a dropped item at its drop transform.
///
/// The drop's velocity and angular impulse go to the item's physics body; a
/// kind without one ignores them. Dissolving drops start decomposing at once.
pub fn spawn_item(commands: &mut Commands, drop: &LootDrop, dissolve_duration: f32) -> Entity {
    let rotation = Quat::from_euler(
        EulerRot::YXZ,
        drop.orientation.y.to_radians(),
        drop.orientation.x.to_radians(),
        drop.orientation.z.to_radians(),
    );
    let mut item = commands.spawn((
        Item { kind: drop.item },
        Transform::from_translation(drop.position).with_rotation(rotation),
    ));

    if drop.item.is_physics_simulated() {
        let mut body = PhysicsBody::default();
        if let Some(impulse) = drop.impulse {
            body.add_velocity(impulse.linear, impulse.angular);
        }
        item.insert(body);
    }

    if drop.dissolve {
        item.insert(Dissolving {
            remaining: dissolve_duration,
        });
    }

    item.id()
}

/// Tracks dropped pickups so the world never holds more than `capacity`
#[derive(Resource, Debug, Clone)]
pub struct PickupManager {
    capacity: usize,
    managed: VecDeque<Entity>,
}

impl Default for PickupManager {
    fn default() -> Self {
        Self::new(32)
    }
}

impl PickupManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            managed: VecDeque::new(),
        }
    }

    /// Start tracking `entity`. Returns the oldest tracked items that no
    /// longer fit; the caller removes them from the world.
    pub fn register(&mut self, entity: Entity) -> Vec<Entity> {
        self.managed.push_back(entity);
        let excess = self.managed.len().saturating_sub(self.capacity);
        self.managed.drain(..excess).collect()
    }

    /// Stop tracking an item picked up or removed elsewhere
    pub fn forget(&mut self, entity: Entity) {
        self.managed.retain(|e| *e != entity);
    }

    pub fn is_managed(&self, entity: Entity) -> bool {
        self.managed.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.managed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managed.is_empty()
    }
}
