//! JSON configuration parsing for headless scenarios
//!
//! A scenario lists the aces, players and vehicles to spawn plus a timed
//! script of hits to land on the aces.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::damage::{AmmoRegistry, DamageInfo, DamageTypeFlags, HitGroup};
use crate::npc::components::WeaponClass;
use crate::npc::spawn::AceSpawn;

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Aces to spawn (at least one)
    pub aces: Vec<AceConfig>,
    #[serde(default)]
    pub players: Vec<PlayerConfig>,
    #[serde(default)]
    pub vehicles: Vec<VehicleConfig>,
    /// Hits to land, in any order
    #[serde(default)]
    pub script: Vec<ScriptedHit>,
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Maximum scenario duration in seconds (default: 60)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic replays
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// One ace to spawn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AceConfig {
    pub position: [f32; 3],
    pub active_weapon: Option<WeaponClass>,
    pub extra_weapons: Vec<WeaponClass>,
    pub use_march: bool,
    pub no_alt_ammo_drop: bool,
}

/// One player to spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default = "default_player_health")]
    pub health: f32,
    #[serde(default = "default_player_health")]
    pub max_health: f32,
    #[serde(default)]
    pub active_weapon: Option<WeaponClass>,
}

/// One vehicle to spawn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Index into `players` of the driver, if any
    #[serde(default)]
    pub driver: Option<usize>,
}

/// Who lands a scripted hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedAttacker {
    /// Index into `players`
    Player(usize),
    /// Index into `vehicles`
    Vehicle(usize),
    #[default]
    World,
}

/// A hit landed on an ace at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedHit {
    /// Seconds since the scenario started
    pub at_secs: f32,
    /// Index into `aces`
    pub target: usize,
    #[serde(default)]
    pub hit_group: HitGroup,
    pub amount: f32,
    /// Damage type flag names, e.g. `["BULLET", "SNIPER"]`
    #[serde(default)]
    pub damage_types: Vec<String>,
    /// Ammo type name, e.g. `"357"`
    #[serde(default)]
    pub ammo: Option<String>,
    #[serde(default)]
    pub attacker: ScriptedAttacker,
}

fn default_max_duration() -> f32 {
    60.0
}

fn default_player_health() -> f32 {
    100.0
}

impl AceConfig {
    pub fn to_spawn(&self) -> AceSpawn {
        AceSpawn {
            position: self.position.into(),
            active_weapon: self.active_weapon,
            extra_weapons: self.extra_weapons.clone(),
            use_march: self.use_march,
            no_alt_ammo_drop: self.no_alt_ammo_drop,
        }
    }
}

impl ScriptedHit {
    /// Combined damage type flags
    pub fn damage_type(&self) -> Result<DamageTypeFlags, String> {
        self.damage_types
            .iter()
            .try_fold(DamageTypeFlags::empty(), |flags, name| {
                DamageTypeFlags::from_name(name)
                    .map(|flag| flags | flag)
                    .ok_or_else(|| format!("Unknown damage type: '{}'", name))
            })
    }

    /// Build the damage info for this hit, without its attacker
    pub fn to_damage_info(&self, ammo: &AmmoRegistry) -> Result<DamageInfo, String> {
        let ammo_type = match &self.ammo {
            Some(name) => Some(
                ammo.index(name)
                    .ok_or_else(|| format!("Unknown ammo type: '{}'", name))?,
            ),
            None => None,
        };

        Ok(DamageInfo::new(self.amount, self.damage_type()?).with_ammo(ammo_type))
    }
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario file: {}", e))?;

        Self::from_json(&contents)
    }

    /// Parse and validate a JSON scenario
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: ScenarioConfig = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.aces.is_empty() {
            return Err("scenario must spawn at least one ace".to_string());
        }

        for (i, player) in self.players.iter().enumerate() {
            if player.max_health <= 0.0 {
                return Err(format!("player {} max_health must be positive", i));
            }
        }

        for (i, vehicle) in self.vehicles.iter().enumerate() {
            if let Some(driver) = vehicle.driver {
                if driver >= self.players.len() {
                    return Err(format!(
                        "vehicle {} driver {} is out of range ({} players)",
                        i,
                        driver,
                        self.players.len()
                    ));
                }
            }
        }

        let ammo = AmmoRegistry::default();
        for (i, hit) in self.script.iter().enumerate() {
            if hit.target >= self.aces.len() {
                return Err(format!(
                    "script entry {} target {} is out of range ({} aces)",
                    i,
                    hit.target,
                    self.aces.len()
                ));
            }
            if hit.at_secs < 0.0 {
                return Err(format!("script entry {} at_secs must not be negative", i));
            }
            match hit.attacker {
                ScriptedAttacker::Player(p) if p >= self.players.len() => {
                    return Err(format!("script entry {} attacker player {} is out of range", i, p));
                }
                ScriptedAttacker::Vehicle(v) if v >= self.vehicles.len() => {
                    return Err(format!("script entry {} attacker vehicle {} is out of range", i, v));
                }
                _ => {}
            }
            hit.to_damage_info(&ammo)
                .map_err(|e| format!("script entry {}: {}", i, e))?;
        }

        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "aces": [{ "active_weapon": "Ar2" }],
        "players": [{ "name": "Gordon", "health": 40, "active_weapon": "Shotgun" }],
        "vehicles": [{ "driver": 0 }],
        "script": [
            { "at_secs": 0.5, "target": 0, "hit_group": "Head", "amount": 50,
              "damage_types": ["BULLET", "SNIPER"], "ammo": "357",
              "attacker": { "player": 0 } }
        ],
        "random_seed": 42
    }"#;

    #[test]
    fn test_parse_scenario() {
        let config = ScenarioConfig::from_json(SCENARIO).unwrap();
        assert_eq!(config.aces.len(), 1);
        assert_eq!(config.players[0].max_health, 100.0);
        assert_eq!(config.max_duration_secs, 60.0);
        assert_eq!(config.script[0].attacker, ScriptedAttacker::Player(0));

        let info = config.script[0].to_damage_info(&AmmoRegistry::default()).unwrap();
        assert!(info.has(DamageTypeFlags::SNIPER));
        assert!(AmmoRegistry::default().is(info.ammo_type, "357"));
    }

    #[test]
    fn test_world_attacker_is_default() {
        let json = r#"{ "aces": [{}], "script": [{ "at_secs": 0, "target": 0, "amount": 5 }] }"#;
        let config = ScenarioConfig::from_json(json).unwrap();
        assert_eq!(config.script[0].attacker, ScriptedAttacker::World);
        assert_eq!(config.script[0].hit_group, HitGroup::Generic);
    }

    #[test]
    fn test_rejects_bad_references() {
        let no_aces = r#"{ "aces": [] }"#;
        assert!(ScenarioConfig::from_json(no_aces).is_err());

        let bad_target = r#"{ "aces": [{}], "script": [{ "at_secs": 0, "target": 3, "amount": 5 }] }"#;
        let err = ScenarioConfig::from_json(bad_target).unwrap_err();
        assert!(err.contains("target 3"));

        let bad_flag = r#"{ "aces": [{}], "script": [{ "at_secs": 0, "target": 0, "amount": 5, "damage_types": ["LASER"] }] }"#;
        let err = ScenarioConfig::from_json(bad_flag).unwrap_err();
        assert!(err.contains("LASER"));

        let bad_driver = r#"{ "aces": [{}], "vehicles": [{ "driver": 0 }] }"#;
        assert!(ScenarioConfig::from_json(bad_driver).is_err());
    }
}
