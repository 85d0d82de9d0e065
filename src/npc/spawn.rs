//! Spawning
//!
//! Creates a fully equipped ace: health from the tunables, a grenade count
//! rolled by difficulty, dormant eye glow and a shield armor piece parented
//! to the `shield_attach` attachment.

use bevy::prelude::*;

use crate::tunables::{SkillLevel, Tunables};
use super::components::{ArmorPiece, CombineAce, GameRng, WeaponClass};
use super::constants::{SHIELD_ATTACHMENT, SHIELD_MODEL};
use super::eyes::{EyeGlow, EyeState};

/// Per-ace spawn settings
#[derive(Debug, Clone, Default)]
pub struct AceSpawn {
    pub position: Vec3,
    pub active_weapon: Option<WeaponClass>,
    /// Extra weapons carried besides the active one
    pub extra_weapons: Vec<WeaponClass>,
    pub use_march: bool,
    pub no_alt_ammo_drop: bool,
}

/// Roll the starting grenade count for a difficulty
pub fn roll_grenades(skill: SkillLevel, rng: &mut GameRng) -> u32 {
    let (min, max) = match skill {
        SkillLevel::Hard => (2, 3),
        SkillLevel::VeryHard => (4, 6),
        SkillLevel::Nightmare => (8, 12),
        SkillLevel::Easy | SkillLevel::Normal => (0, 2),
    };
    rng.random_int(min, max) as u32
}

/// Build the ace component for a spawn, without its armor piece
pub fn build_ace(spawn: &AceSpawn, tunables: &Tunables, rng: &mut GameRng) -> CombineAce {
    let mut ace = CombineAce::new(tunables.ace_health, spawn.active_weapon);
    ace.kick_damage = tunables.ace_kick;
    ace.weapons.extend(spawn.extra_weapons.iter().copied());
    ace.use_march = spawn.use_march;
    ace.no_alt_ammo_drop = spawn.no_alt_ammo_drop;

    if tunables.spawn_with_grenades {
        ace.grenades = roll_grenades(tunables.skill, rng);
    }

    ace.eyes = Some(EyeGlow::default());
    ace.set_eye_state(EyeState::Dormant);

    if ace.use_march {
        debug!("Ace set to march; the blended march only suits straight-ahead walks");
    }

    ace
}

/// Spawn an ace and its armor piece. Returns the ace entity.
pub fn spawn_combine_ace(
    commands: &mut Commands,
    spawn: &AceSpawn,
    tunables: &Tunables,
    rng: &mut GameRng,
) -> Entity {
    let mut ace = build_ace(spawn, tunables, rng);

    let entity = commands.spawn(Transform::from_translation(spawn.position)).id();
    let armor = commands
        .spawn((
            ArmorPiece {
                model: SHIELD_MODEL,
                attachment: SHIELD_ATTACHMENT,
            },
            Transform::IDENTITY,
        ))
        .set_parent(entity)
        .id();
    ace.armor = Some(armor);

    info!(
        "Spawned Combine Ace with {}, {} grenade(s), {:.0} health",
        ace.active_weapon.map_or("no weapon", |w| w.classname()),
        ace.grenades,
        ace.health
    );
    commands.entity(entity).insert(ace);

    entity
}
