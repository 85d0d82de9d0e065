//! Headless mode for scripted scenarios
//!
//! This module runs Combine Ace scenarios without any graphical output,
//! suitable for automated testing and tuning checks.
//!
//! ## Usage
//!
//! ```bash
//! # Run a scenario
//! cargo run --release -- --scenario scenarios/sniper_headshot.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "aces": [{ "active_weapon": "Ar2" }],
//!   "players": [{ "name": "Gordon", "health": 40, "active_weapon": "Crossbow" }],
//!   "script": [
//!     { "at_secs": 0.5, "target": 0, "hit_group": "Head", "amount": 100,
//!       "damage_types": ["BULLET", "SNIPER"], "attacker": { "player": 0 } }
//!   ],
//!   "random_seed": 42,
//!   "max_duration_secs": 30
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::ScenarioConfig;
pub use runner::{build_scenario_app, run_scenario, step_scenario, ScenarioResult};
