//! Integration tests for death resolution
//!
//! These tests verify that:
//! - Loot logic runs at most once per death
//! - Disabled loot and instant-kill weapons skip loot and the shield
//! - Only a player attacker (or a player-driven vehicle) earns drops
//! - Dropped ammo lands around the ace's center with a horizontal toss

use bevy::prelude::*;

use combine_ace::combat::damage::{AmmoRegistry, DamageInfo, DamageTypeFlags};
use combine_ace::npc::components::{CombineAce, GameRng, WeaponClass};
use combine_ace::npc::constants::{CENTER_HEIGHT, DEATH_SENTENCE, DROP_OFFSET, SHIELD_MODEL};
use combine_ace::npc::death::DeathResolver;
use combine_ace::npc::eyes::{EyeGlow, EyeState};
use combine_ace::npc::items::ItemKind;
use combine_ace::npc::policy::{AttackerKind, BaseNpcPolicy, CombatContext, PlayerSnapshot};
use combine_ace::npc::rules::GameRules;
use combine_ace::tunables::Tunables;

const ARMOR: Entity = Entity::from_raw(99);
const PLAYER: Entity = Entity::from_raw(1);

struct Fixture {
    tunables: Tunables,
    base: BaseNpcPolicy,
    ammo: AmmoRegistry,
    rules: GameRules,
    rng: GameRng,
    attacker: AttackerKind,
}

impl Fixture {
    fn new(attacker: AttackerKind) -> Self {
        Self::with_tunables(Tunables::default(), attacker)
    }

    fn with_tunables(tunables: Tunables, attacker: AttackerKind) -> Self {
        Self {
            base: BaseNpcPolicy::from_tunables(&tunables),
            rules: GameRules::from_tunables(&tunables),
            tunables,
            ammo: AmmoRegistry::default(),
            rng: GameRng::from_seed(1234),
            attacker,
        }
    }

    fn ctx(&mut self) -> CombatContext<'_> {
        CombatContext {
            tunables: &self.tunables,
            base: &self.base,
            ammo: &self.ammo,
            rules: &mut self.rules,
            rng: &mut self.rng,
            attacker: &self.attacker,
        }
    }
}

fn snapshot(health: f32, weapon: WeaponClass) -> PlayerSnapshot {
    PlayerSnapshot {
        entity: PLAYER,
        health,
        max_health: 100.0,
        active_weapon: Some(weapon),
    }
}

/// Player at full health: never earns a health vial
fn healthy_player() -> AttackerKind {
    AttackerKind::Player(snapshot(100.0, WeaponClass::Shotgun))
}

/// Player at zero health: always earns a health vial past the cooldown
fn dying_player() -> AttackerKind {
    AttackerKind::Player(snapshot(0.0, WeaponClass::Shotgun))
}

fn dead_ace(weapon: WeaponClass) -> CombineAce {
    let mut ace = CombineAce::new(0.0, Some(weapon));
    ace.armor = Some(ARMOR);
    ace.eyes = Some(EyeGlow::default());
    ace
}

fn bullet() -> DamageInfo {
    DamageInfo::new(50.0, DamageTypeFlags::BULLET).with_attacker(PLAYER)
}

// =============================================================================
// Once-only and skip conditions
// =============================================================================

#[test]
fn test_resolves_at_most_once() {
    let mut fixture = Fixture::new(healthy_player());
    let mut ace = dead_ace(WeaponClass::Ar2);

    let first = DeathResolver.resolve(&mut ace, Vec3::ZERO, &bullet(), &mut fixture.ctx());
    let second = DeathResolver.resolve(&mut ace, Vec3::ZERO, &bullet(), &mut fixture.ctx());

    assert!(first.is_some());
    assert!(second.is_none(), "Second resolution must be a no-op");
}

#[test]
fn test_loot_disabled_drops_nothing() {
    let tunables = Tunables {
        spawn_health_on_death: false,
        ..default()
    };
    let mut fixture = Fixture::with_tunables(tunables, dying_player());
    let mut ace = dead_ace(WeaponClass::Ar2);

    let outcome = DeathResolver
        .resolve(&mut ace, Vec3::ZERO, &bullet(), &mut fixture.ctx())
        .unwrap();

    assert!(outcome.loot.is_empty());
    assert!(!outcome.shield_converted());
    assert_eq!(ace.armor, Some(ARMOR), "Armor stays attached");
    assert_eq!(ace.eye_state, EyeState::Dormant, "Eye state unchanged");
    assert!(ace.is_dead, "Generic death path still runs");
}

#[test]
fn test_instant_kill_weapon_skips_loot() {
    let attacker = AttackerKind::Player(snapshot(0.0, WeaponClass::MegaPhysCannon));
    let mut fixture = Fixture::new(attacker);
    let mut ace = dead_ace(WeaponClass::Ar2);

    let outcome = DeathResolver
        .resolve(&mut ace, Vec3::ZERO, &bullet(), &mut fixture.ctx())
        .unwrap();

    assert!(outcome.loot.is_empty());
    assert!(outcome.shield.is_none());
    assert_eq!(outcome.generic.death_sentence, Some(DEATH_SENTENCE));
}

#[test]
fn test_no_player_still_converts_shield() {
    let mut fixture = Fixture::new(AttackerKind::Other);
    let mut ace = dead_ace(WeaponClass::Ar2);
    let origin = Vec3::new(12.0, 0.0, -8.0);

    let outcome = DeathResolver
        .resolve(&mut ace, origin, &DamageInfo::new(50.0, DamageTypeFlags::BLAST), &mut fixture.ctx())
        .unwrap();

    assert!(outcome.loot.is_empty(), "No player: no ammo, no health");
    let shield = outcome.shield.expect("shield should be converted");
    assert_eq!(shield.model, SHIELD_MODEL);
    assert_eq!(shield.position, origin);
    assert_eq!(shield.armor, ARMOR);
    assert_eq!(ace.armor, None);
    assert_eq!(ace.eye_state, EyeState::Dead);
}

#[test]
fn test_no_armor_skips_conversion_only() {
    let mut fixture = Fixture::new(healthy_player());
    let mut ace = dead_ace(WeaponClass::Ar2);
    ace.armor = None;

    let outcome = DeathResolver
        .resolve(&mut ace, Vec3::ZERO, &bullet(), &mut fixture.ctx())
        .unwrap();

    assert!(outcome.shield.is_none());
    assert_eq!(outcome.loot.len(), 1);
}

// =============================================================================
// Ammo drops
// =============================================================================

#[test]
fn test_ar2_drops_one_alt_fire_ammo_near_center() {
    for seed in 0..25 {
        let mut fixture = Fixture::new(healthy_player());
        fixture.rng = GameRng::from_seed(seed);
        let mut ace = dead_ace(WeaponClass::Ar2);
        let origin = Vec3::new(100.0, 8.0, -50.0);

        let outcome = DeathResolver
            .resolve(&mut ace, origin, &bullet(), &mut fixture.ctx())
            .unwrap();

        let ammo: Vec<_> = outcome
            .loot
            .iter()
            .filter(|d| d.item == ItemKind::Ar2AltFireAmmo)
            .collect();
        assert_eq!(ammo.len(), 1);
        assert_eq!(outcome.loot.len(), 1, "Healthy player gets no vial");

        let drop = ammo[0];
        let center = origin + Vec3::Y * CENTER_HEIGHT;
        let offset = drop.position - center;
        assert!(offset.abs().max_element() <= DROP_OFFSET + 1e-3);

        let impulse = drop.impulse.expect("ammo gets tossed");
        assert_eq!(impulse.linear.y, 0.0);
        assert!(drop.managed);
        assert!(!drop.dissolve);
    }
}

#[test]
fn test_smg1_drops_grenade_ammo() {
    let mut fixture = Fixture::new(healthy_player());
    let mut ace = dead_ace(WeaponClass::Smg1);

    let outcome = DeathResolver
        .resolve(&mut ace, Vec3::ZERO, &bullet(), &mut fixture.ctx())
        .unwrap();

    assert_eq!(outcome.loot.len(), 1);
    assert_eq!(outcome.loot[0].item, ItemKind::Smg1GrenadeAmmo);
}

#[test]
fn test_other_weapons_drop_no_ammo() {
    let mut fixture = Fixture::new(healthy_player());
    let mut ace = dead_ace(WeaponClass::Shotgun);

    let outcome = DeathResolver
        .resolve(&mut ace, Vec3::ZERO, &bullet(), &mut fixture.ctx())
        .unwrap();

    assert!(outcome.loot.is_empty());
    assert!(outcome.shield_converted());
}

#[test]
fn test_no_alt_ammo_flag() {
    let mut fixture = Fixture::new(healthy_player());
    let mut ace = dead_ace(WeaponClass::Ar2);
    ace.no_alt_ammo_drop = true;

    let outcome = DeathResolver
        .resolve(&mut ace, Vec3::ZERO, &bullet(), &mut fixture.ctx())
        .unwrap();

    assert!(outcome.loot.is_empty());
}

#[test]
fn test_dissolving_kill_dissolves_ammo_and_silences_death() {
    let mut fixture = Fixture::new(healthy_player());
    let mut ace = dead_ace(WeaponClass::Ar2);
    let kill = DamageInfo::new(500.0, DamageTypeFlags::DISSOLVE).with_attacker(PLAYER);

    let outcome = DeathResolver
        .resolve(&mut ace, Vec3::ZERO, &kill, &mut fixture.ctx())
        .unwrap();

    assert_eq!(outcome.loot.len(), 1);
    assert!(outcome.loot[0].dissolve);
    assert!(!outcome.loot[0].managed, "Dissolving items are not tracked");
    assert_eq!(outcome.generic.death_sentence, None);
}

// =============================================================================
// Health drops and vehicles
// =============================================================================

#[test]
fn test_health_vial_respects_cooldown() {
    let mut fixture = Fixture::new(dying_player());

    let mut first = dead_ace(WeaponClass::Shotgun);
    let outcome = DeathResolver
        .resolve(&mut first, Vec3::ZERO, &bullet(), &mut fixture.ctx())
        .unwrap();
    assert!(outcome.health_dropped());

    let mut second = dead_ace(WeaponClass::Shotgun);
    let outcome = DeathResolver
        .resolve(&mut second, Vec3::ZERO, &bullet(), &mut fixture.ctx())
        .unwrap();
    assert!(!outcome.health_dropped(), "Second vial within the cooldown");

    fixture.rules.now += fixture.tunables.health_drop_interval;
    let mut third = dead_ace(WeaponClass::Shotgun);
    let outcome = DeathResolver
        .resolve(&mut third, Vec3::ZERO, &bullet(), &mut fixture.ctx())
        .unwrap();
    assert!(outcome.health_dropped());
}

#[test]
fn test_vehicle_driver_earns_loot() {
    let attacker = AttackerKind::VehicleOccupant {
        vehicle: Entity::from_raw(50),
        driver: snapshot(0.0, WeaponClass::Pistol),
    };
    let mut fixture = Fixture::new(attacker);
    let mut ace = dead_ace(WeaponClass::Ar2);

    let outcome = DeathResolver
        .resolve(&mut ace, Vec3::ZERO, &DamageInfo::new(80.0, DamageTypeFlags::CRUSH), &mut fixture.ctx())
        .unwrap();

    assert_eq!(outcome.loot.len(), 2);
    assert!(outcome.health_dropped());
    assert!(outcome.loot.iter().any(|d| d.item == ItemKind::Ar2AltFireAmmo));
}
