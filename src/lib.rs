//! Plate Guard - tap the drops before they hit the plate
//!
//! Core modules:
//! - `sim`: Per-frame simulation (spawning, combos, boss waves, weather, power-ups, taps)
//! - `tuning`: Data-driven game balance, validated once at startup
//! - `progression`: Persisted player progression (level, xp, high scores)
//! - `submission`: Score payload handed to the leaderboard service at game over

pub mod progression;
pub mod sim;
pub mod submission;
pub mod tuning;

pub use progression::PlayerProgress;
pub use submission::ScoreSubmission;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Logical canvas geometry. Taps and entity positions share this space.
pub mod consts {
    /// Logical canvas size
    pub const WIDTH: f32 = 400.0;
    pub const HEIGHT: f32 = 800.0;

    /// Nose sits near the top, drops fall out of the nostrils
    pub const NOSE_Y: f32 = 100.0;
    pub const NOSTRIL_OFFSET_X: f32 = 40.0;
    pub const NOSTRIL_Y_OFFSET: f32 = 30.0;

    /// The plate is the boundary: a drop touching it is a miss
    pub const PLATE_Y: f32 = 700.0;

    /// Speeds are expressed in pixels per 16 ms reference frame
    pub const FRAME_SCALE: f32 = 1000.0 / 16.0;

    /// Collectibles leave the field this far below the canvas
    pub const POWER_UP_EXIT_MARGIN: f32 = 30.0;
    /// Collectibles enter this far above the canvas
    pub const POWER_UP_ENTRY_Y: f32 = -20.0;
    /// Horizontal inset for collectible spawn positions
    pub const POWER_UP_SPAWN_INSET: f32 = 50.0;
}

/// Distance test used by the hit resolver
#[inline]
pub fn within_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}
