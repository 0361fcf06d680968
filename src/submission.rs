//! Score submission payload
//!
//! Packaged once the session is over and handed to the leaderboard client.
//! Field names match what the service expects.

use serde::{Deserialize, Serialize};

use crate::sim::state::Session;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    /// Mode name, e.g. `CLASSIC`
    pub mode: String,
    pub score: u64,
    pub drops_wiped: u32,
    /// Highest combo multiplier reached
    pub max_combo: u32,
    pub level: u32,
    pub duration_seconds: u32,
}

impl ScoreSubmission {
    pub fn from_session(state: &Session) -> Self {
        Self {
            mode: state.mode.as_str().to_string(),
            score: state.score,
            drops_wiped: state.stats.drops_wiped,
            max_combo: state.stats.peak_multiplier,
            level: state.level(),
            duration_seconds: state.elapsed.round() as u32,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::PlayerProgress;
    use crate::sim::state::GameMode;
    use crate::tuning::Tuning;

    #[test]
    fn test_fields_from_session() {
        let mut state = Session::new(GameMode::TimeAttack, PlayerProgress::new(), None, Tuning::default(), 4);
        state.score = 42;
        state.stats.drops_wiped = 17;
        state.stats.peak_multiplier = 3;
        state.elapsed = 59.6;

        let submission = ScoreSubmission::from_session(&state);
        assert_eq!(submission.mode, "TIME_ATTACK");
        assert_eq!(submission.max_combo, 3);
        assert_eq!(submission.level, 1);
        assert_eq!(submission.duration_seconds, 60);
    }

    #[test]
    fn test_service_field_names() {
        let state = Session::new(GameMode::Classic, PlayerProgress::new(), None, Tuning::default(), 4);
        let json = ScoreSubmission::from_session(&state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in ["mode", "score", "dropsWiped", "maxCombo", "level", "durationSeconds"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["mode"], "CLASSIC");
    }
}
