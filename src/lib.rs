//! Combine Ace - elite soldier NPC archetype
//!
//! Hit-group damage scaling with a one-time head gib, heavy-damage flinch
//! rules, and death handling that sheds the ace's shield and drops loot, all
//! packaged as Bevy plugins.
//!
//! This library exposes the archetype modules for testing and reuse.

pub mod cli;
pub mod combat;
pub mod headless;
pub mod npc;
pub mod tunables;

// Re-export commonly used types
pub use combat::damage::{DamageInfo, DamageTypeFlags, HitGroup};
pub use combat::log::{CombatLog, CombatLogEventType};
pub use combat::CombatPlugin;
pub use headless::ScenarioConfig;
pub use npc::classifier::DamageClassifier;
pub use npc::death::DeathResolver;
pub use npc::AcePlugin;
pub use tunables::{Tunables, TunablesPlugin};
