//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes from the caller and is clamped per tick
//! - Seeded RNG only, owned by the session
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod boss;
pub mod combo;
pub mod difficulty;
pub mod events;
pub mod hit;
pub mod mission;
pub mod powerup;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weather;

pub use events::{Cue, GameEvent};
pub use hit::{TapResult, handle_tap};
pub use mission::{Mission, MissionCondition};
pub use state::{
    BossPhase, Drop, DropKind, GameMode, GamePhase, Outcome, PowerUpKind, Session, Side, UnknownMode,
    Weather,
};
pub use tick::tick;
