//! Combat logging
//!
//! Records every ace-related event for post-match analysis.

use bevy::prelude::*;
use serde::Serialize;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in match time (seconds since match start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// Damage taken
    Damage,
    /// Head gibbed
    Headshot,
    /// Ace died
    Death,
    /// Item dropped on death
    LootDrop,
    /// Shield shed as a prop
    ShieldDropped,
    /// Reward granted to a player
    Reward,
    /// Match event (start, end, etc.)
    MatchEvent,
}

/// The combat log resource storing all events
#[derive(Resource, Default, Debug, Serialize)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current match time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new match
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Write the log as pretty JSON. Returns the path written.
    pub fn save_to_file(&self, path: &str) -> Result<String, String> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize combat log: {}", e))?;
        std::fs::write(path, contents)
            .map_err(|e| format!("Failed to write {}: {}", path, e))?;
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_and_recent() {
        let mut log = CombatLog::default();
        log.log(CombatLogEventType::MatchEvent, "start".to_string());
        log.match_time = 1.5;
        log.log(CombatLogEventType::Damage, "hit".to_string());
        log.log(CombatLogEventType::Death, "dead".to_string());

        assert_eq!(log.filter_by_type(CombatLogEventType::Damage).len(), 1);
        let recent = log.recent(2);
        assert_eq!(recent[0].message, "hit");
        assert_eq!(recent[1].timestamp, 1.5);
    }

    #[test]
    fn test_clear_resets_time() {
        let mut log = CombatLog::default();
        log.match_time = 10.0;
        log.log(CombatLogEventType::Damage, "hit".to_string());
        log.clear();
        assert!(log.entries.is_empty());
        assert_eq!(log.match_time, 0.0);
    }
}
