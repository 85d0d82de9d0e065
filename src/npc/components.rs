//! Component Definitions
//!
//! ECS components and resources for Combine Aces and the actors around them:
//! the ace itself, its armor piece, players, vehicles, dropped items, gibs and
//! the shared random number generator.

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::combat::damage::DamageInfo;
use super::activity::{Activity, NpcState};
use super::constants::ACE_MODEL;
use super::eyes::{EyeGlow, EyeState};
use super::items::ItemKind;

// ============================================================================
// Resources
// ============================================================================

/// Seeded random number generator shared by every ace.
///
/// When a seed is provided (e.g., via a scenario file), the same seed will
/// always produce the same rolls. Without a seed, uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Generate a random integer in `[min, max]`, both ends inclusive
    pub fn random_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Random vector with every component in `[min, max)`
    pub fn random_vector(&mut self, min: f32, max: f32) -> Vec3 {
        Vec3::new(
            self.random_range(min, max),
            self.random_range(min, max),
            self.random_range(min, max),
        )
    }

    /// Random Euler angles (pitch, yaw, roll) in degrees, each in `[min, max)`
    pub fn random_angle(&mut self, min: f32, max: f32) -> Vec3 {
        self.random_vector(min, max)
    }

    /// Random angular impulse with every axis in `[min, max)`
    pub fn random_angular_impulse(&mut self, min: f32, max: f32) -> Vec3 {
        self.random_vector(min, max)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ============================================================================
// Weapons
// ============================================================================

/// Weapon classes an NPC or player can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    Ar2,
    Smg1,
    Shotgun,
    Pistol,
    Revolver,
    Crossbow,
    Rpg,
    GrenadeLauncher,
    Frag,
    Stunstick,
    PhysCannon,
    /// Supercharged gravity gun
    MegaPhysCannon,
}

impl WeaponClass {
    /// Entity class name
    pub fn classname(&self) -> &'static str {
        match self {
            WeaponClass::Ar2 => "weapon_ar2",
            WeaponClass::Smg1 => "weapon_smg1",
            WeaponClass::Shotgun => "weapon_shotgun",
            WeaponClass::Pistol => "weapon_pistol",
            WeaponClass::Revolver => "weapon_357",
            WeaponClass::Crossbow => "weapon_crossbow",
            WeaponClass::Rpg => "weapon_rpg",
            WeaponClass::GrenadeLauncher => "weapon_grenadelauncher",
            WeaponClass::Frag => "weapon_frag",
            WeaponClass::Stunstick => "weapon_stunstick",
            WeaponClass::PhysCannon => "weapon_physcannon",
            WeaponClass::MegaPhysCannon => "weapon_physcannon_mega",
        }
    }

    /// Weapons that kill outright, which suppresses death loot
    pub fn is_instant_kill(&self) -> bool {
        matches!(self, WeaponClass::MegaPhysCannon)
    }

    /// Alt-fire ammo dropped by an ace wielding this weapon.
    /// Each weapon maps to at most one item.
    pub fn alt_fire_drop(&self) -> Option<ItemKind> {
        match self {
            WeaponClass::Ar2 => Some(ItemKind::Ar2AltFireAmmo),
            WeaponClass::Smg1 => Some(ItemKind::Smg1GrenadeAmmo),
            _ => None,
        }
    }
}

// ============================================================================
// Combine Ace
// ============================================================================

/// Core component for a Combine Ace
#[derive(Component, Debug, Clone)]
pub struct CombineAce {
    pub health: f32,
    pub max_health: f32,
    pub kick_damage: f32,
    /// Grenades left to throw
    pub grenades: u32,

    // === Loadout ===
    pub active_weapon: Option<WeaponClass>,
    /// Every weapon carried, including the active one
    pub weapons: SmallVec<[WeaponClass; 4]>,

    // === Owned entities ===
    /// Shield armor piece, taken on death
    pub armor: Option<Entity>,

    // === Visual state ===
    pub model: &'static str,
    pub eye_state: EyeState,
    /// Eye sprite and trail; aces spawned without eyes ignore eye state changes
    pub eyes: Option<EyeGlow>,
    /// Head has been gibbed; never gibs twice
    pub beheaded: bool,

    // === AI state ===
    pub npc_state: NpcState,
    pub activity: Activity,
    pub crouching: bool,
    /// Bracing against an incoming physics object
    pub blocking: bool,
    /// Use the casual marching walk
    pub use_march: bool,
    /// `casual` pose parameter for marching aces
    pub casual_pose: f32,
    /// Last hit was heavy (drives flinch reactions)
    pub heavy_damage_taken: bool,

    // === Spawn flags ===
    /// Never drop alt-fire ammo
    pub no_alt_ammo_drop: bool,

    // === Death ===
    /// Last hit received, used as the killing event
    pub last_damage: Option<DamageInfo>,
    /// Death loot has been resolved
    pub death_resolved: bool,
    pub is_dead: bool,
}

impl CombineAce {
    pub fn new(health: f32, active_weapon: Option<WeaponClass>) -> Self {
        let weapons = active_weapon.into_iter().collect();
        Self {
            health,
            max_health: health,
            kick_damage: 0.0,
            grenades: 0,
            active_weapon,
            weapons,
            armor: None,
            model: ACE_MODEL,
            eye_state: EyeState::Dormant,
            eyes: None,
            beheaded: false,
            npc_state: NpcState::Idle,
            activity: Activity::Idle,
            crouching: false,
            blocking: false,
            use_march: false,
            casual_pose: 0.0,
            heavy_damage_taken: false,
            no_alt_ammo_drop: false,
            last_damage: None,
            death_resolved: false,
            is_dead: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0 && !self.is_dead
    }

    /// Carries a weapon of this class, active or not
    pub fn owns_weapon(&self, weapon: WeaponClass) -> bool {
        self.weapons.contains(&weapon)
    }

    /// Change the eye state and drive the glow to match
    pub fn set_eye_state(&mut self, state: EyeState) {
        self.eye_state = state;
        if let Some(eyes) = self.eyes.as_mut() {
            eyes.apply(state);
        }
    }
}

/// Shield worn by an ace, parented to its `shield_attach` attachment
#[derive(Component, Debug, Clone)]
pub struct ArmorPiece {
    pub model: &'static str,
    pub attachment: &'static str,
}

/// Free-standing physics prop left behind when an ace sheds its shield
#[derive(Component, Debug, Clone)]
pub struct PhysicsProp {
    pub model: &'static str,
}

// ============================================================================
// Other actors
// ============================================================================

/// A player-controlled actor
#[derive(Component, Debug, Clone)]
pub struct Player {
    pub name: String,
    pub health: f32,
    pub max_health: f32,
    pub active_weapon: Option<WeaponClass>,
    /// Currency earned
    pub money: u32,
    /// Experience earned
    pub xp: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, active_weapon: Option<WeaponClass>) -> Self {
        Self {
            name: name.into(),
            health: 100.0,
            max_health: 100.0,
            active_weapon,
            money: 0,
            xp: 0,
        }
    }
}

/// A drivable vehicle
#[derive(Component, Debug, Clone, Default)]
pub struct Vehicle {
    pub driver: Option<Entity>,
}

// ============================================================================
// Debris and lifecycle
// ============================================================================

/// Physics body of a simulated entity. Integration is up to the host.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsBody {
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl PhysicsBody {
    /// Add a linear velocity and an angular impulse
    pub fn add_velocity(&mut self, velocity: Vec3, angular_impulse: Vec3) {
        self.linear_velocity += velocity;
        self.angular_velocity += angular_impulse;
    }
}

/// Gib fragment flung by a head gib
#[derive(Component, Debug, Clone)]
pub struct Gib {
    pub model: &'static str,
    /// Seconds until removal
    pub lifetime: f32,
}

/// Entity visually decomposing; removed when the timer runs out
#[derive(Component, Debug, Clone)]
pub struct Dissolving {
    pub remaining: f32,
}

/// Dead ace waiting for cleanup
#[derive(Component, Debug, Clone)]
pub struct Corpse {
    pub cleanup_in: f32,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut rng1 = GameRng::from_seed(42);
        let mut rng2 = GameRng::from_seed(42);

        for _ in 0..100 {
            assert_eq!(rng1.random_int(0, 6), rng2.random_int(0, 6));
            assert_eq!(rng1.random_vector(-4.0, 4.0), rng2.random_vector(-4.0, 4.0));
        }
    }

    #[test]
    fn test_random_int_is_inclusive() {
        let mut rng = GameRng::from_seed(7);
        let mut seen = [false; 7];

        for _ in 0..1000 {
            let value = rng.random_int(0, 6);
            assert!((0..=6).contains(&value), "Value {} out of range", value);
            seen[value as usize] = true;
        }

        assert!(seen.iter().all(|s| *s), "Every value in [0, 6] should appear");
    }

    #[test]
    fn test_random_int_degenerate_range() {
        let mut rng = GameRng::from_seed(1);
        assert_eq!(rng.random_int(3, 3), 3);
    }

    #[test]
    fn test_random_vector_bounds() {
        let mut rng = GameRng::from_seed(123);
        for _ in 0..100 {
            let v = rng.random_vector(-64.0, 64.0);
            for axis in [v.x, v.y, v.z] {
                assert!((-64.0..64.0).contains(&axis));
            }
        }
    }

    #[test]
    fn test_eye_state_without_eyes_is_recorded() {
        let mut ace = CombineAce::new(100.0, Some(WeaponClass::Ar2));
        assert!(ace.eyes.is_none());

        ace.set_eye_state(EyeState::Activated);
        assert_eq!(ace.eye_state, EyeState::Activated);
    }

    #[test]
    fn test_only_mega_cannon_is_instant_kill() {
        assert!(WeaponClass::MegaPhysCannon.is_instant_kill());
        assert!(!WeaponClass::PhysCannon.is_instant_kill());
        assert!(!WeaponClass::Ar2.is_instant_kill());
    }

    #[test]
    fn test_alt_fire_drop_table() {
        assert_eq!(WeaponClass::Ar2.alt_fire_drop(), Some(ItemKind::Ar2AltFireAmmo));
        assert_eq!(WeaponClass::Smg1.alt_fire_drop(), Some(ItemKind::Smg1GrenadeAmmo));
        assert_eq!(WeaponClass::Shotgun.alt_fire_drop(), None);
    }
}
