//! Combat events
//!
//! Defines the events that flow between the host and the ace systems.

use bevy::prelude::*;

use crate::npc::activity::{Activity, AnimEvent};
use crate::npc::classifier::Reward;
use crate::npc::items::ItemKind;
use super::damage::{DamageInfo, HitGroup};

/// Event fired by the host when a hit lands on an entity
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving the damage
    pub target: Entity,
    /// Where the hit landed
    pub hit_group: HitGroup,
    pub info: DamageInfo,
}

/// Event fired when an ace's health reaches zero
#[derive(Event, Debug, Clone)]
pub struct AceKilledEvent {
    pub ace: Entity,
    /// The killing hit
    pub info: DamageInfo,
}

/// Event fired when an ace's head is gibbed
#[derive(Event, Debug, Clone)]
pub struct HeadGibEvent {
    pub ace: Entity,
    pub reward: Option<Reward>,
}

/// Event fired for every item an ace drops
#[derive(Event, Debug, Clone)]
pub struct LootDroppedEvent {
    pub ace: Entity,
    pub item: Entity,
    pub kind: ItemKind,
    pub dissolving: bool,
}

/// Event fired when an ace's shield becomes a physics prop
#[derive(Event, Debug, Clone)]
pub struct ShieldDroppedEvent {
    pub ace: Entity,
    pub prop: Entity,
}

/// Sound the host should play
#[derive(Event, Debug, Clone)]
pub struct SoundCueEvent {
    pub source: Entity,
    pub cue: &'static str,
}

/// Particle effect the host should play
#[derive(Event, Debug, Clone)]
pub struct ParticleEffectEvent {
    pub entity: Entity,
    pub effect: &'static str,
    pub attachment: &'static str,
}

/// The host's AI asks an ace to start an activity
#[derive(Event, Debug, Clone)]
pub struct ActivityRequestEvent {
    pub ace: Entity,
    pub activity: Activity,
}

/// An animation event fired by an ace's current sequence
#[derive(Event, Debug, Clone)]
pub struct AnimationEvent {
    pub ace: Entity,
    pub event: AnimEvent,
}
