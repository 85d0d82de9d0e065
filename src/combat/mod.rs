//! Combat system
//!
//! Shared combat plumbing the NPC archetypes build on:
//! - Damage descriptions, hit groups and the ammo registry
//! - Events between the host and the archetype systems
//! - Combat logging

use bevy::prelude::*;

pub mod damage;
pub mod events;
pub mod log;

use events::*;

/// Plugin for the combat events and log
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<DamageEvent>()
            .add_event::<AceKilledEvent>()
            .add_event::<HeadGibEvent>()
            .add_event::<LootDroppedEvent>()
            .add_event::<ShieldDroppedEvent>()
            .add_event::<SoundCueEvent>()
            .add_event::<ParticleEffectEvent>()
            .add_event::<ActivityRequestEvent>()
            .add_event::<AnimationEvent>()
            // Resources
            .init_resource::<log::CombatLog>();
    }
}
