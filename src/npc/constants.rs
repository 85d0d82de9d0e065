//! Combine Ace Constants
//!
//! Asset names and fixed gameplay numbers for the archetype. Anything a
//! designer tunes per game lives in [`crate::tunables::Tunables`] instead.

// ============================================================================
// Models and attachments
// ============================================================================

pub const ACE_MODEL: &str = "models/combine_ace_soldier.mdl";
pub const BEHEADED_MODEL: &str = "models/gibs/combine_ace_soldier_beheaded.mdl";
pub const SHIELD_MODEL: &str = "models/armor/shield.mdl";
pub const SHIELD_ATTACHMENT: &str = "shield_attach";
pub const EYES_ATTACHMENT: &str = "eyes";
pub const BLOOD_ATTACHMENT: &str = "bloodspurt";

// ============================================================================
// Head gib
// ============================================================================

/// Gib roll is uniform in `[0, HEADSHOT_ROLL_MAX]`; only 0 gibs
pub const HEADSHOT_ROLL_MAX: i32 = 6;

/// Head hits that do not gib take double damage
pub const HEADSHOT_MULTIPLIER: f32 = 2.0;

/// Fragment models, one batch each
pub const GIB_MODELS: [&str; 2] = ["models/gibs/pgib_p3.mdl", "models/gibs/pgib_p4.mdl"];
pub const GIBS_PER_BATCH: usize = 6;
pub const GIB_MIN_SPEED: f32 = 750.0;
pub const GIB_MAX_SPEED: f32 = 1500.0;
/// Fragment lifetime is rolled in `[GIB_LIFETIME * 0.5, GIB_LIFETIME]`
pub const GIB_LIFETIME: f32 = 6.0;

/// Height of the head above the ace's origin, where fragments start
pub const HEAD_HEIGHT: f32 = 64.0;

pub const HEADSHOT_PARTICLE: &str = "headshotspray";
pub const HEADSHOT_SOUND: &str = "Gore.Headshot";

/// Currency granted for a head gib when the economy is on
pub const HEADSHOT_MONEY_REWARD: u32 = 7;
/// Experience granted for a head gib outside the classic ruleset
pub const HEADSHOT_XP_REWARD: u32 = 9;

// ============================================================================
// Death loot
// ============================================================================

/// Items spawn within ±this of the ace center on every axis
pub const DROP_OFFSET: f32 = 4.0;
/// Dropped ammo gets a linear velocity within ±this per horizontal axis
pub const DROP_MAX_SPEED: f32 = 64.0;
/// Dropped ammo gets an angular impulse within ±this per axis
pub const DROP_MAX_ANGULAR_IMPULSE: f32 = 300.0;

/// Sentence spoken on death unless dissolving
pub const DEATH_SENTENCE: &str = "COMBINE_DIE";

/// Height of the ace's world-space center above its origin
pub const CENTER_HEIGHT: f32 = 36.0;

// ============================================================================
// Eyes
// ============================================================================

pub const EYE_SPRITE: &str = "sprites/redglow1.vmt";
pub const EYE_TRAIL: &str = "sprites/bluelaser1.vmt";
