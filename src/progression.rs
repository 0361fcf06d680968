//! Player progression: level, xp, per-mode high scores, finished missions
//!
//! Stored by the host between sessions. A session works on its own copy and
//! signals level ups, new high scores and mission completions so the host
//! knows when to write it back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::state::{DropKind, GameMode};
use crate::tuning::Tuning;

/// Result of an xp grant that crossed at least one level threshold
#[derive(Debug, Clone, PartialEq)]
pub struct LevelUp {
    pub level: u32,
    /// Label of the last unlock reached, if any
    pub unlock: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub level: u32,
    /// Xp toward the next level
    pub xp: u32,
    #[serde(default)]
    pub high_scores: BTreeMap<GameMode, u64>,
    #[serde(default)]
    pub missions_completed: Vec<String>,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerProgress {
    /// Fresh level-1 player
    pub fn new() -> Self {
        Self {
            level: 1,
            xp: 0,
            high_scores: BTreeMap::new(),
            missions_completed: Vec::new(),
        }
    }

    /// Xp needed to go from `level - 1` to `level`
    pub fn xp_for_level(level: u32, tuning: &Tuning) -> u32 {
        level * tuning.play.xp_per_level
    }

    /// Add xp, levelling up as many times as it covers
    pub fn add_xp(&mut self, amount: u32, tuning: &Tuning) -> Option<LevelUp> {
        self.xp += amount;
        let mut result: Option<LevelUp> = None;
        loop {
            let cost = Self::xp_for_level(self.level + 1, tuning);
            if self.xp < cost {
                break;
            }
            self.xp -= cost;
            self.level += 1;
            let unlock = tuning
                .level_unlocks
                .iter()
                .find(|u| u.level == self.level)
                .map(|u| u.label.clone());
            let previous = result.and_then(|r| r.unlock);
            result = Some(LevelUp {
                level: self.level,
                unlock: unlock.or(previous),
            });
        }
        result
    }

    /// Drop kinds available at the current level
    pub fn unlocked_kinds(&self, tuning: &Tuning) -> Vec<DropKind> {
        tuning
            .level_unlocks
            .iter()
            .filter(|u| u.level <= self.level)
            .map(|u| u.kind)
            .collect()
    }

    pub fn high_score(&self, mode: GameMode) -> u64 {
        self.high_scores.get(&mode).copied().unwrap_or(0)
    }

    /// Returns true if `score` beats the stored high score for `mode`
    pub fn update_high_score(&mut self, mode: GameMode, score: u64) -> bool {
        if score > self.high_score(mode) {
            self.high_scores.insert(mode, score);
            return true;
        }
        false
    }

    /// Returns true the first time a mission id is recorded
    pub fn record_mission(&mut self, id: &str) -> bool {
        if self.missions_completed.iter().any(|m| m == id) {
            return false;
        }
        self.missions_completed.push(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_costs_grow() {
        let tuning = Tuning::default();
        assert_eq!(PlayerProgress::xp_for_level(2, &tuning), 20);
        assert_eq!(PlayerProgress::xp_for_level(5, &tuning), 50);
    }

    #[test]
    fn test_add_xp_multiple_levels() {
        let tuning = Tuning::default();
        let mut progress = PlayerProgress::new();
        progress.level = 3;
        // 40 to reach 4, 50 to reach 5
        let result = progress.add_xp(95, &tuning).unwrap();
        assert_eq!(result.level, 5);
        assert_eq!(result.unlock.as_deref(), Some("Fast Drops Unlocked!"));
        assert_eq!(progress.xp, 5);
    }

    #[test]
    fn test_add_xp_without_level() {
        let tuning = Tuning::default();
        let mut progress = PlayerProgress::new();
        assert!(progress.add_xp(5, &tuning).is_none());
        assert_eq!(progress.xp, 5);
    }

    #[test]
    fn test_unlocks_by_level() {
        let tuning = Tuning::default();
        let mut progress = PlayerProgress::new();
        assert_eq!(progress.unlocked_kinds(&tuning), vec![DropKind::Normal]);
        progress.level = 12;
        assert_eq!(
            progress.unlocked_kinds(&tuning),
            vec![DropKind::Normal, DropKind::Fast, DropKind::Sticky]
        );
    }

    #[test]
    fn test_high_score_per_mode() {
        let mut progress = PlayerProgress::new();
        assert!(!progress.update_high_score(GameMode::Classic, 0));
        assert!(progress.update_high_score(GameMode::Classic, 12));
        assert!(!progress.update_high_score(GameMode::Classic, 12));
        assert_eq!(progress.high_score(GameMode::Survival), 0);
    }

    #[test]
    fn test_missions_recorded_once() {
        let mut progress = PlayerProgress::new();
        assert!(progress.record_mission("left_only"));
        assert!(!progress.record_mission("left_only"));
        assert_eq!(progress.missions_completed.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let mut progress = PlayerProgress::new();
        progress.update_high_score(GameMode::TimeAttack, 40);
        let json = serde_json::to_string(&progress).unwrap();
        let back: PlayerProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(back.high_score(GameMode::TimeAttack), 40);

        let minimal: PlayerProgress = serde_json::from_str(r#"{"level":7,"xp":3}"#).unwrap();
        assert_eq!(minimal.level, 7);
        assert!(minimal.high_scores.is_empty());
    }
}
