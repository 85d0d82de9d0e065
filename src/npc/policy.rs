//! Behavior seams
//!
//! NPC archetypes plug into the damage and death pipelines through two
//! capability traits, [`DamageHandler`] and [`DeathHandler`]. Anything an
//! archetype does not override is answered by the [`BaseNpcPolicy`], which
//! every handler receives through its [`CombatContext`].
//!
//! Attackers are resolved once per event into an [`AttackerKind`] so the
//! handlers never look at raw entities.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::damage::{AmmoRegistry, DamageInfo, DamageTypeFlags, HitGroup};
use crate::tunables::{HitGroupMultipliers, Tunables};
use super::activity::{Activity, AnimEvent};
use super::classifier::HitgroupOutcome;
use super::components::{CombineAce, GameRng, Player, Vehicle, WeaponClass};
use super::constants::DEATH_SENTENCE;
use super::death::DeathOutcome;
use super::rules::GameRules;

// ============================================================================
// Attacker resolution
// ============================================================================

/// What a player looked like when they landed a hit
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub entity: Entity,
    pub health: f32,
    pub max_health: f32,
    pub active_weapon: Option<WeaponClass>,
}

impl PlayerSnapshot {
    pub fn of(entity: Entity, player: &Player) -> Self {
        Self {
            entity,
            health: player.health,
            max_health: player.max_health,
            active_weapon: player.active_weapon,
        }
    }

    pub fn wields_instant_kill_weapon(&self) -> bool {
        self.active_weapon.is_some_and(|w| w.is_instant_kill())
    }
}

/// Who is responsible for a hit
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttackerKind {
    Player(PlayerSnapshot),
    /// A vehicle driven by a player; the driver gets the credit
    VehicleOccupant { vehicle: Entity, driver: PlayerSnapshot },
    #[default]
    Other,
}

impl AttackerKind {
    /// The player credited with the hit, if any
    pub fn player(&self) -> Option<&PlayerSnapshot> {
        match self {
            AttackerKind::Player(player) => Some(player),
            AttackerKind::VehicleOccupant { driver, .. } => Some(driver),
            AttackerKind::Other => None,
        }
    }
}

/// Lookup of the actor components needed to resolve attackers
pub trait ActorLookup {
    fn player(&self, entity: Entity) -> Option<PlayerSnapshot>;
    /// `Some(driver)` when `entity` is a vehicle
    fn vehicle_driver(&self, entity: Entity) -> Option<Option<Entity>>;
}

/// Actor lookup backed by the ECS world
#[derive(SystemParam)]
pub struct Actors<'w, 's> {
    players: Query<'w, 's, &'static Player>,
    vehicles: Query<'w, 's, &'static Vehicle>,
}

impl ActorLookup for Actors<'_, '_> {
    fn player(&self, entity: Entity) -> Option<PlayerSnapshot> {
        self.players
            .get(entity)
            .ok()
            .map(|player| PlayerSnapshot::of(entity, player))
    }

    fn vehicle_driver(&self, entity: Entity) -> Option<Option<Entity>> {
        self.vehicles.get(entity).ok().map(|vehicle| vehicle.driver)
    }
}

/// Resolve the attacker of a hit.
///
/// A player is used directly. A vehicle resolves to its driver when the
/// driver is a player. Everything else is [`AttackerKind::Other`].
pub fn resolve_attacker(attacker: Option<Entity>, actors: &impl ActorLookup) -> AttackerKind {
    let Some(attacker) = attacker else {
        return AttackerKind::Other;
    };

    if let Some(player) = actors.player(attacker) {
        return AttackerKind::Player(player);
    }

    match actors.vehicle_driver(attacker) {
        Some(Some(driver)) => match actors.player(driver) {
            Some(driver) => AttackerKind::VehicleOccupant {
                vehicle: attacker,
                driver,
            },
            None => AttackerKind::Other,
        },
        _ => AttackerKind::Other,
    }
}

// ============================================================================
// Capability traits
// ============================================================================

/// Everything a handler may read or mutate while handling one event
pub struct CombatContext<'a> {
    pub tunables: &'a Tunables,
    pub base: &'a BaseNpcPolicy,
    pub ammo: &'a AmmoRegistry,
    pub rules: &'a mut GameRules,
    pub rng: &'a mut GameRng,
    pub attacker: &'a AttackerKind,
}

/// Reaction to incoming damage
pub trait DamageHandler {
    /// Damage multiplier for a hit on `hit_group`, plus any cosmetic override
    fn hitgroup_damage_multiplier(
        &self,
        ace: &mut CombineAce,
        hit_group: HitGroup,
        info: &DamageInfo,
        ctx: &mut CombatContext<'_>,
    ) -> HitgroupOutcome;

    /// Damage heavy enough to make the NPC flinch
    fn is_heavy_damage(&self, info: &DamageInfo, ctx: &CombatContext<'_>) -> bool {
        ctx.base.is_heavy_damage(info)
    }

    fn is_light_damage(&self, info: &DamageInfo, ctx: &CombatContext<'_>) -> bool {
        ctx.base.is_light_damage(info)
    }
}

/// Reaction to being killed
pub trait DeathHandler {
    /// Resolve a death. Returns `None` when this death was already handled.
    fn on_killed(
        &self,
        ace: &mut CombineAce,
        origin: Vec3,
        info: &DamageInfo,
        ctx: &mut CombatContext<'_>,
    ) -> Option<DeathOutcome>;
}

// ============================================================================
// Base policy
// ============================================================================

/// Result of the generic death path
#[derive(Debug, Clone, PartialEq)]
pub struct GenericDeath {
    /// Seconds until the corpse is removed
    pub corpse_cleanup_in: f32,
    /// Sentence to speak, if any
    pub death_sentence: Option<&'static str>,
}

/// Default NPC behavior used wherever an archetype does not override it
#[derive(Resource, Debug, Clone)]
pub struct BaseNpcPolicy {
    pub multipliers: HitGroupMultipliers,
    pub heavy_damage_threshold: f32,
    pub light_damage_threshold: f32,
    pub corpse_cleanup_delay: f32,
}

impl Default for BaseNpcPolicy {
    fn default() -> Self {
        Self::from_tunables(&Tunables::default())
    }
}

impl BaseNpcPolicy {
    pub fn from_tunables(tunables: &Tunables) -> Self {
        Self {
            multipliers: tunables.hit_group_multipliers.clone(),
            heavy_damage_threshold: tunables.heavy_damage_threshold,
            light_damage_threshold: tunables.light_damage_threshold,
            corpse_cleanup_delay: tunables.corpse_cleanup_delay,
        }
    }

    /// Flat per-hit-group multiplier
    pub fn hitgroup_damage_multiplier(&self, hit_group: HitGroup) -> f32 {
        self.multipliers.for_group(hit_group)
    }

    pub fn is_heavy_damage(&self, info: &DamageInfo) -> bool {
        info.is_well_formed() && info.amount > self.heavy_damage_threshold
    }

    pub fn is_light_damage(&self, info: &DamageInfo) -> bool {
        info.is_well_formed() && info.amount > 0.0 && info.amount <= self.light_damage_threshold
    }

    /// Generic death: mark dead, schedule cleanup, speak unless dissolving
    pub fn on_killed(&self, ace: &mut CombineAce, info: &DamageInfo) -> GenericDeath {
        ace.is_dead = true;
        ace.health = ace.health.min(0.0);
        ace.blocking = false;

        let death_sentence = if info.has(DamageTypeFlags::DISSOLVE) {
            None
        } else {
            Some(DEATH_SENTENCE)
        };

        GenericDeath {
            corpse_cleanup_in: self.corpse_cleanup_delay,
            death_sentence,
        }
    }

    pub fn translate_activity(&self, activity: Activity) -> Activity {
        activity
    }

    /// Animation events no archetype claimed are ignored
    pub fn handle_anim_event(&self, event: AnimEvent) {
        debug!("Unhandled animation event {:?}", event);
    }
}
