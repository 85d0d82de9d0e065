//! Game rules
//!
//! Global, mutable match state the ace consults: the health-drop rate limiter,
//! the headshot counter and the active rulesets.

use bevy::prelude::*;

use crate::tunables::{SkillLevel, Tunables};
use super::components::GameRng;
use super::policy::PlayerSnapshot;

/// Match-wide rules and counters
#[derive(Resource, Debug, Clone)]
pub struct GameRules {
    pub skill: SkillLevel,
    pub economy: bool,
    pub classic: bool,
    pub episodic: bool,
    /// Head gibs so far this match
    pub headshot_count: u32,
    /// Match clock in seconds
    pub now: f32,
    /// No health drops before this time
    next_health_drop: f32,
    health_drop_interval: f32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self::from_tunables(&Tunables::default())
    }
}

impl GameRules {
    pub fn from_tunables(tunables: &Tunables) -> Self {
        Self {
            skill: tunables.skill,
            economy: tunables.economy,
            classic: tunables.classic,
            episodic: tunables.episodic,
            headshot_count: 0,
            now: 0.0,
            next_health_drop: 0.0,
            health_drop_interval: tunables.health_drop_interval,
        }
    }

    /// Decide whether a killed NPC should drop health for `recipient`.
    ///
    /// Drops are rate limited; past the cooldown, the chance equals the
    /// fraction of health the recipient is missing.
    pub fn should_drop_health(&self, recipient: &PlayerSnapshot, rng: &mut GameRng) -> bool {
        if self.now < self.next_health_drop {
            return false;
        }

        if recipient.max_health <= 0.0 {
            return false;
        }

        let missing = 1.0 - (recipient.health / recipient.max_health).clamp(0.0, 1.0);
        rng.random_f32() < missing
    }

    /// Record that a health item dropped, starting the cooldown
    pub fn dropped_health(&mut self) {
        self.next_health_drop = self.now + self.health_drop_interval;
    }

    pub fn record_headshot(&mut self) {
        self.headshot_count += 1;
    }
}
