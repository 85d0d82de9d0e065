//! Gameplay tunables
//!
//! Every knob the ace behavior reads lives in [`Tunables`], loaded from
//! `assets/config/tunables.ron` at startup. Systems receive it as a resource
//! and pass it down explicitly to the damage and death procedures.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::combat::damage::{AmmoRegistry, HitGroup};
use crate::npc::items::PickupManager;
use crate::npc::policy::BaseNpcPolicy;
use crate::npc::rules::GameRules;

/// Default location of the tunables file
pub const DEFAULT_TUNABLES_PATH: &str = "assets/config/tunables.ron";

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkillLevel {
    Easy,
    #[default]
    Normal,
    Hard,
    VeryHard,
    Nightmare,
}

/// Content locale. Some locales restrict gore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    German,
    French,
    Spanish,
    Russian,
}

impl Language {
    /// Locales where dismemberment must never be shown
    pub fn restricts_gore(&self) -> bool {
        matches!(self, Language::German)
    }
}

/// Flat damage multipliers per hit group used when no archetype overrides them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitGroupMultipliers {
    pub head: f32,
    pub chest: f32,
    pub stomach: f32,
    pub arm: f32,
    pub leg: f32,
}

impl Default for HitGroupMultipliers {
    fn default() -> Self {
        Self {
            head: 3.0,
            chest: 1.0,
            stomach: 1.0,
            arm: 1.0,
            leg: 1.0,
        }
    }
}

impl HitGroupMultipliers {
    pub fn for_group(&self, hit_group: HitGroup) -> f32 {
        match hit_group {
            HitGroup::Head => self.head,
            HitGroup::Chest => self.chest,
            HitGroup::Stomach => self.stomach,
            HitGroup::LeftArm | HitGroup::RightArm => self.arm,
            HitGroup::LeftLeg | HitGroup::RightLeg => self.leg,
            HitGroup::Generic | HitGroup::Gear => 1.0,
        }
    }
}

/// All configuration read by the ace behavior
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    // === Archetype ===
    /// Health (and max health) on spawn
    pub ace_health: f32,
    /// Kick melee damage
    pub ace_kick: f32,
    /// Drop loot and shed the shield on death
    pub spawn_health_on_death: bool,
    /// Roll a grenade count on spawn
    pub spawn_with_grenades: bool,

    // === Gore and content ===
    pub headshot_gore: bool,
    pub low_violence: bool,
    pub language: Language,

    // === Rulesets ===
    pub skill: SkillLevel,
    /// Currency rewards enabled
    pub economy: bool,
    /// Classic ruleset: no experience rewards
    pub classic: bool,
    /// Extended content ruleset: shocks count as heavy damage
    pub episodic: bool,

    // === Player weapons ===
    /// Damage per shotgun pellet
    pub plr_dmg_buckshot: f32,
    /// Pellets per shotgun blast
    pub plr_num_shotgun_pellets: i32,

    // === Generic NPC policy ===
    /// Damage strictly above this is heavy
    pub heavy_damage_threshold: f32,
    /// Damage at or below this is light
    pub light_damage_threshold: f32,
    pub hit_group_multipliers: HitGroupMultipliers,

    // === Lifecycle ===
    /// Minimum seconds between two health drops
    pub health_drop_interval: f32,
    /// Seconds a corpse stays before cleanup
    pub corpse_cleanup_delay: f32,
    /// Seconds a dissolving item takes to vanish
    pub dissolve_duration: f32,
    /// Tracked pickups before the oldest is removed
    pub max_managed_pickups: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            ace_health: 100.0,
            ace_kick: 15.0,
            spawn_health_on_death: true,
            spawn_with_grenades: true,
            headshot_gore: true,
            low_violence: false,
            language: Language::English,
            skill: SkillLevel::Normal,
            economy: true,
            classic: false,
            episodic: true,
            plr_dmg_buckshot: 8.0,
            plr_num_shotgun_pellets: 7,
            heavy_damage_threshold: 20.0,
            light_damage_threshold: 10.0,
            hit_group_multipliers: HitGroupMultipliers::default(),
            health_drop_interval: 30.0,
            corpse_cleanup_delay: 20.0,
            dissolve_duration: 2.0,
            max_managed_pickups: 32,
        }
    }
}

impl Tunables {
    /// Gore is shown at all under the current content settings
    pub fn gore_permitted(&self) -> bool {
        self.headshot_gore && !self.low_violence && !self.language.restricts_gore()
    }

    /// Half of a full shotgun payload, truncated to whole damage points
    pub fn half_buckshot_payload(&self) -> i32 {
        (self.plr_dmg_buckshot * self.plr_num_shotgun_pellets as f32 * 0.5) as i32
    }

    /// Parse tunables from RON text and validate them
    pub fn from_ron(contents: &str) -> Result<Self, String> {
        let tunables: Tunables =
            ron::from_str(contents).map_err(|e| format!("Failed to parse tunables: {}", e))?;
        tunables.validate()?;
        Ok(tunables)
    }

    /// Load tunables from a file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            warn!("No tunables file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let tunables = Self::from_ron(&contents)
            .map_err(|e| format!("{} ({})", e, path.display()))?;

        info!("Loaded tunables from {:?}", path);
        Ok(tunables)
    }

    fn validate(&self) -> Result<(), String> {
        if self.ace_health <= 0.0 {
            return Err(format!("ace_health must be positive, got {}", self.ace_health));
        }
        if self.plr_num_shotgun_pellets < 0 {
            return Err("plr_num_shotgun_pellets cannot be negative".to_string());
        }
        if self.health_drop_interval < 0.0 {
            return Err("health_drop_interval cannot be negative".to_string());
        }
        if self.max_managed_pickups == 0 {
            return Err("max_managed_pickups must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Plugin inserting the tunables and the services derived from them
pub struct TunablesPlugin {
    pub path: PathBuf,
}

impl Default for TunablesPlugin {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_TUNABLES_PATH),
        }
    }
}

impl Plugin for TunablesPlugin {
    fn build(&self, app: &mut App) {
        let tunables = match Tunables::load(&self.path) {
            Ok(tunables) => tunables,
            Err(e) => {
                error!("{}; falling back to default tunables", e);
                Tunables::default()
            }
        };

        insert_tunables(app, tunables);
    }
}

/// Insert `tunables` and the resources built from them
pub fn insert_tunables(app: &mut App, tunables: Tunables) {
    app.insert_resource(BaseNpcPolicy::from_tunables(&tunables))
        .insert_resource(GameRules::from_tunables(&tunables))
        .insert_resource(PickupManager::new(tunables.max_managed_pickups))
        .init_resource::<AmmoRegistry>()
        .insert_resource(tunables);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_payload_truncates() {
        let tunables = Tunables {
            plr_dmg_buckshot: 8.0,
            plr_num_shotgun_pellets: 7,
            ..default()
        };
        assert_eq!(tunables.half_buckshot_payload(), 28);

        let odd = Tunables {
            plr_dmg_buckshot: 5.0,
            plr_num_shotgun_pellets: 7,
            ..default()
        };
        // 17.5 truncates to 17
        assert_eq!(odd.half_buckshot_payload(), 17);
    }

    #[test]
    fn test_gore_permitted() {
        assert!(Tunables::default().gore_permitted());

        let german = Tunables {
            language: Language::German,
            ..default()
        };
        assert!(!german.gore_permitted());

        let low_violence = Tunables {
            low_violence: true,
            ..default()
        };
        assert!(!low_violence.gore_permitted());

        let no_gore = Tunables {
            headshot_gore: false,
            ..default()
        };
        assert!(!no_gore.gore_permitted());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let tunables = Tunables::from_ron("(ace_health: 250.0, classic: true)").unwrap();
        assert_eq!(tunables.ace_health, 250.0);
        assert!(tunables.classic);
        assert_eq!(tunables.plr_num_shotgun_pellets, 7);
    }

    #[test]
    fn test_invalid_health_rejected() {
        let err = Tunables::from_ron("(ace_health: 0.0)").unwrap_err();
        assert!(err.contains("ace_health"));
    }

    #[test]
    fn test_shipped_tunables_parse() {
        let tunables = Tunables::load(Path::new(DEFAULT_TUNABLES_PATH)).unwrap();
        assert!(tunables.ace_health > 0.0);
    }
}
