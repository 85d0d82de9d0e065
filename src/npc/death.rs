//! Death resolution
//!
//! Runs once when an ace dies. Unless death loot is disabled or the killer
//! carries an instant-kill weapon, the ace sheds its shield as a free prop,
//! drops alt-fire ammo for its weapon and may drop a health vial for the
//! player who killed it. The generic death path always runs last.

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::combat::damage::{DamageInfo, DamageTypeFlags};
use super::components::{CombineAce, GameRng};
use super::constants::*;
use super::eyes::EyeState;
use super::items::ItemKind;
use super::policy::{CombatContext, DeathHandler, GenericDeath};

/// Initial motion handed to a dropped item's physics body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropImpulse {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// An item to spawn for a death
#[derive(Debug, Clone, PartialEq)]
pub struct LootDrop {
    pub item: ItemKind,
    pub position: Vec3,
    /// Euler angles in degrees (pitch, yaw, roll)
    pub orientation: Vec3,
    pub impulse: Option<DropImpulse>,
    /// Decompose immediately instead of staying as a pickup
    pub dissolve: bool,
    /// Track with the pickup manager
    pub managed: bool,
}

/// Shield left behind as a free-standing prop
#[derive(Debug, Clone, PartialEq)]
pub struct ShieldProp {
    pub model: &'static str,
    pub position: Vec3,
    /// Armor piece entity to destroy
    pub armor: Entity,
}

/// Everything a death produced
#[derive(Debug, Clone, PartialEq)]
pub struct DeathOutcome {
    pub loot: SmallVec<[LootDrop; 2]>,
    pub shield: Option<ShieldProp>,
    pub generic: GenericDeath,
}

impl DeathOutcome {
    pub fn shield_converted(&self) -> bool {
        self.shield.is_some()
    }

    pub fn health_dropped(&self) -> bool {
        self.loot.iter().any(|drop| drop.item == ItemKind::HealthVial)
    }
}

/// Death handler of the Combine Ace
#[derive(Debug, Clone, Copy, Default)]
pub struct DeathResolver;

impl DeathResolver {
    /// Resolve a death: `(loot drops, shield converted)` plus the generic path.
    /// Returns `None` if this ace's death was already resolved.
    pub fn resolve(
        &self,
        ace: &mut CombineAce,
        origin: Vec3,
        kill: &DamageInfo,
        ctx: &mut CombatContext<'_>,
    ) -> Option<DeathOutcome> {
        self.on_killed(ace, origin, kill, ctx)
    }

    fn resolve_loot(
        &self,
        ace: &mut CombineAce,
        origin: Vec3,
        kill: &DamageInfo,
        ctx: &mut CombatContext<'_>,
    ) -> (SmallVec<[LootDrop; 2]>, Option<ShieldProp>) {
        let mut loot = SmallVec::new();

        ace.set_eye_state(EyeState::Dead);

        let shield = ace.armor.take().map(|armor| ShieldProp {
            model: SHIELD_MODEL,
            position: origin,
            armor,
        });

        let Some(player) = ctx.attacker.player() else {
            debug!("Ace killed without a player attacker, no loot");
            return (loot, shield);
        };

        let center = origin + Vec3::Y * CENTER_HEIGHT;

        let alt_ammo = ace.active_weapon.and_then(|weapon| weapon.alt_fire_drop());
        if let Some(item) = alt_ammo.filter(|_| !ace.no_alt_ammo_drop) {
            let dissolve = kill.has(DamageTypeFlags::DISSOLVE);
            let mut drop = drop_at(item, center, ctx.rng);
            drop.impulse = Some(random_impulse(ctx.rng));
            drop.dissolve = dissolve;
            drop.managed = !dissolve;
            loot.push(drop);
        }

        if ctx.rules.should_drop_health(player, ctx.rng) {
            loot.push(drop_at(ItemKind::HealthVial, center, ctx.rng));
            ctx.rules.dropped_health();
        }

        (loot, shield)
    }
}

impl DeathHandler for DeathResolver {
    fn on_killed(
        &self,
        ace: &mut CombineAce,
        origin: Vec3,
        info: &DamageInfo,
        ctx: &mut CombatContext<'_>,
    ) -> Option<DeathOutcome> {
        if ace.death_resolved {
            return None;
        }
        ace.death_resolved = true;

        let killer_has_instant_kill = ctx
            .attacker
            .player()
            .is_some_and(|player| player.wields_instant_kill_weapon());

        let (loot, shield) = if !ctx.tunables.spawn_health_on_death || killer_has_instant_kill {
            (SmallVec::new(), None)
        } else {
            self.resolve_loot(ace, origin, info, ctx)
        };

        let generic = ctx.base.on_killed(ace, info);

        info!(
            "Ace died: {} drop(s), shield {}",
            loot.len(),
            if shield.is_some() { "shed" } else { "kept" }
        );

        Some(DeathOutcome {
            loot,
            shield,
            generic,
        })
    }
}

/// A pickup at a random offset around `center` with a random orientation
fn drop_at(item: ItemKind, center: Vec3, rng: &mut GameRng) -> LootDrop {
    LootDrop {
        item,
        position: center + rng.random_vector(-DROP_OFFSET, DROP_OFFSET),
        orientation: rng.random_angle(0.0, 360.0),
        impulse: None,
        dissolve: false,
        managed: false,
    }
}

/// Random horizontal toss plus spin
fn random_impulse(rng: &mut GameRng) -> DropImpulse {
    let mut linear = rng.random_vector(-DROP_MAX_SPEED, DROP_MAX_SPEED);
    linear.y = 0.0;
    let angular = rng.random_angular_impulse(-DROP_MAX_ANGULAR_IMPULSE, DROP_MAX_ANGULAR_IMPULSE);

    DropImpulse { linear, angular }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_is_horizontal() {
        let mut rng = GameRng::from_seed(5);
        for _ in 0..50 {
            let impulse = random_impulse(&mut rng);
            assert_eq!(impulse.linear.y, 0.0);
            assert!(impulse.linear.x.abs() <= DROP_MAX_SPEED);
            assert!(impulse.angular.z.abs() <= DROP_MAX_ANGULAR_IMPULSE);
        }
    }

    #[test]
    fn test_drop_stays_in_offset_cube() {
        let mut rng = GameRng::from_seed(5);
        let center = Vec3::new(10.0, 36.0, -4.0);
        for _ in 0..50 {
            let drop = drop_at(ItemKind::HealthVial, center, &mut rng);
            let offset = drop.position - center;
            assert!(offset.abs().max_element() <= DROP_OFFSET + 1e-3);
            assert!(drop.orientation.min_element() >= 0.0);
            assert!(drop.orientation.max_element() < 360.0);
        }
    }
}
