//! Outward notifications queued during a tick or a tap

use serde::Serialize;

use super::state::Outcome;

/// Audio/visual cue types for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cue {
    /// A drop left a nostril
    Spawn,
    /// A tap landed on a drop
    Wipe,
    /// A drop was fully wiped
    Cleared,
    /// A drop hit the plate
    Splash,
    /// A shield absorbed a drop
    ShieldBlock,
    /// A collectible was picked up
    PowerUp,
    Freeze,
    /// Combo tier reached
    Combo,
    /// Top combo tier reached
    SuperWipe,
    LevelUp,
    BossWarning,
    /// Burst of drops from a sneeze
    Sneeze,
    /// Tap hit nothing while drops were falling
    WrongSide,
}

/// Notifications for the UI, audio and progression collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    LivesChanged { lives: u32 },
    /// Time attack only
    TimeRemaining { seconds: f32 },
    ComboChanged { multiplier: u32, label: String },
    LevelUp { level: u32, unlock: Option<String> },
    MissionCompleted { id: String },
    /// Terminal, queued once per session
    GameOver { outcome: Outcome, new_high_score: bool },
    Cue(Cue),
}
