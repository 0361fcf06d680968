//! Session state and core simulation types
//!
//! One `Session` exists per play. Every subsystem mutates it in place through
//! `&mut Session`; renderers and audio only read it.

use std::str::FromStr;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::events::GameEvent;
use super::mission::Mission;
use crate::consts::*;
use crate::progression::PlayerProgress;
use crate::tuning::Tuning;

/// Game mode picked on the mode-select screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameMode {
    Classic,
    TimeAttack,
    Survival,
    Challenge,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "CLASSIC",
            GameMode::TimeAttack => "TIME_ATTACK",
            GameMode::Survival => "SURVIVAL",
            GameMode::Challenge => "CHALLENGE",
        }
    }

    /// Starting lives for this mode
    pub fn starting_lives(&self, tuning: &Tuning) -> u32 {
        match self {
            GameMode::TimeAttack => tuning.play.time_attack_lives,
            GameMode::Survival => 1,
            GameMode::Classic | GameMode::Challenge => tuning.play.initial_lives,
        }
    }

    /// Time attack is a pure tapping race: no boss, no sneezes
    pub fn allows_boss(&self) -> bool {
        *self != GameMode::TimeAttack
    }

    pub fn allows_sneeze(&self) -> bool {
        *self != GameMode::TimeAttack
    }
}

/// Mode name that matches no known mode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game mode {0:?}")]
pub struct UnknownMode(pub String);

impl FromStr for GameMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "classic" => Ok(GameMode::Classic),
            "time_attack" | "timeattack" => Ok(GameMode::TimeAttack),
            "survival" => Ok(GameMode::Survival),
            "challenge" => Ok(GameMode::Challenge),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Drop kinds, unlocked by player level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DropKind {
    #[default]
    Normal,
    Fast,
    Sticky,
    Infection,
}

impl DropKind {
    /// Display color used by renderers
    pub fn color(&self) -> u32 {
        match self {
            DropKind::Normal => 0x84cc16,
            DropKind::Fast => 0x3b82f6,
            DropKind::Sticky => 0xeab308,
            DropKind::Infection => 0xef4444,
        }
    }
}

/// Where a drop is released from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    /// Only boss volleys use the center
    Center,
}

impl Side {
    /// Release position for a drop on this side
    pub fn spawn_pos(&self) -> Vec2 {
        let x = match self {
            Side::Left => WIDTH / 2.0 - NOSTRIL_OFFSET_X,
            Side::Right => WIDTH / 2.0 + NOSTRIL_OFFSET_X,
            Side::Center => WIDTH / 2.0,
        };
        Vec2::new(x, NOSE_Y + NOSTRIL_Y_OFFSET)
    }
}

/// A falling drop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drop {
    pub id: u32,
    pub kind: DropKind,
    pub side: Side,
    pub pos: Vec2,
    /// Pixels per reference frame, fixed at spawn
    pub speed: f32,
    /// Shrinks a little on every tap
    pub radius: f32,
    pub taps_required: u32,
    pub taps_received: u32,
    pub points: u64,
    pub hearts: u32,
}

impl Drop {
    pub fn is_satisfied(&self) -> bool {
        self.taps_received >= self.taps_required
    }

    /// True once the drop's lower edge touches the plate
    pub fn reached_plate(&self) -> bool {
        self.pos.y + self.radius >= PLATE_Y
    }
}

/// Collectible modifier kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Timed auto-clear of the oldest drop
    Tissue,
    /// Absorbs one drop reaching the plate
    Shield,
    /// Timed slow-down
    Freeze,
    /// Instant extra life
    ExtraHeart,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Tissue,
        PowerUpKind::Shield,
        PowerUpKind::Freeze,
        PowerUpKind::ExtraHeart,
    ];
}

/// A collectible on screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vy: f32,
    pub radius: f32,
}

/// Remaining lifetime of an installed effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectTimer {
    /// Seconds left
    Timed(f32),
    /// Consumed by use, never expires on its own
    SingleUse,
}

/// An installed power-up effect. At most one per kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub timer: EffectTimer,
}

/// Combo streak and its timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboState {
    pub streak: u32,
    pub multiplier: u32,
    pub label: String,
    /// Seconds the label stays visible
    pub display_timer: f32,
    /// Seconds of slow motion left (top tier only)
    pub slow_motion_timer: f32,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            streak: 0,
            multiplier: 1,
            label: String::new(),
            display_timer: 0.0,
            slow_motion_timer: 0.0,
        }
    }
}

/// Boss sequence phase
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BossPhase {
    #[default]
    Dormant,
    /// Warning cue is showing, gameplay unchanged
    Warning { remaining: f32 },
    /// Volleys are falling
    Active,
    /// Normal spawning suspended after the last volley
    Relief { remaining: f32 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BossState {
    pub phase: BossPhase,
    pub waves_remaining: u32,
    /// Session-scoped, never cleared
    pub triggered: bool,
    /// Drops released by volleys this session
    pub drops_spawned: u32,
}

impl BossState {
    pub fn is_active(&self) -> bool {
        self.phase == BossPhase::Active
    }
}

/// Ambient hazard kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    None,
    /// Cosmetic snowfall
    Cold,
    /// Dust haze ending in a sneeze burst
    Dust,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Snowflake {
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
    pub drift: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherState {
    pub kind: Weather,
    /// Seconds left in the current hazard
    pub timer: f32,
    /// Seconds until the next hazard while dormant
    pub cooldown: f32,
    /// Only populated while cold
    pub snowflakes: Vec<Snowflake>,
    pub dust_opacity: f32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32,
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    OutOfLives,
    TimeUp,
    MissionComplete,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Terminal
    GameOver(Outcome),
}

/// Run statistics reported at game over
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub drops_wiped: u32,
    pub peak_multiplier: u32,
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub mode: GameMode,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Session-wide fall speed multiplier
    pub speed_multiplier: f32,
    /// Seconds simulated so far
    pub elapsed: f32,
    /// Time attack countdown
    pub time_remaining: f32,
    pub survival_timer: f32,
    /// Copy of the persisted progression, updated as xp is earned
    pub progress: PlayerProgress,
    pub unlocked: Vec<DropKind>,
    pub mission: Option<Mission>,
    /// Drops in spawn order
    pub drops: Vec<Drop>,
    pub power_ups: Vec<PowerUp>,
    pub effects: Vec<ActiveEffect>,
    pub combo: ComboState,
    pub boss: BossState,
    pub weather: WeatherState,
    /// `None` while waiting for the field to clear
    pub spawn_timer: Option<f32>,
    pub power_up_timer: f32,
    pub sneeze_cooldown: f32,
    pub stats: RunStats,
    pub screen_shake: f32,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Notifications not yet drained by the caller
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl Session {
    /// Start a new session. `tuning` must already be validated.
    pub fn new(
        mode: GameMode,
        progress: PlayerProgress,
        mission: Option<Mission>,
        tuning: Tuning,
        seed: u64,
    ) -> Self {
        debug_assert!(tuning.validate().is_ok());

        let mut rng = Pcg32::seed_from_u64(seed);
        let power_up_timer = super::powerup::next_spawn_interval(&mut rng, &tuning);
        let unlocked = progress.unlocked_kinds(&tuning);

        log::info!(
            "New {} session at level {} (seed {})",
            mode.as_str(),
            progress.level,
            seed
        );

        Self {
            seed,
            rng,
            mode,
            phase: GamePhase::Playing,
            score: 0,
            lives: mode.starting_lives(&tuning),
            speed_multiplier: 1.0,
            elapsed: 0.0,
            time_remaining: if mode == GameMode::TimeAttack {
                tuning.play.time_attack_duration
            } else {
                0.0
            },
            survival_timer: 0.0,
            progress,
            unlocked,
            mission,
            drops: Vec::new(),
            power_ups: Vec::new(),
            effects: Vec::new(),
            combo: ComboState::default(),
            boss: BossState::default(),
            weather: WeatherState {
                kind: Weather::None,
                timer: 0.0,
                cooldown: tuning.weather.cold_cooldown,
                snowflakes: Vec::new(),
                dust_opacity: 0.0,
            },
            spawn_timer: Some(tuning.play.first_spawn_delay),
            power_up_timer,
            sneeze_cooldown: tuning.sneeze.interval,
            stats: RunStats {
                drops_wiped: 0,
                peak_multiplier: 1,
            },
            screen_shake: 0.0,
            particles: Vec::new(),
            events: Vec::new(),
            tuning,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    /// Player level, tracked by the progression copy
    pub fn level(&self) -> u32 {
        self.progress.level
    }

    /// Take all queued notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Spray a handful of cosmetic particles
    pub(crate) fn burst_particles(&mut self, pos: Vec2, color: u32, count: usize) {
        use rand::Rng;

        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                self.rng.random_range(-5.0..5.0),
                self.rng.random_range(-5.0..5.0),
            );
            let size = self.rng.random_range(2.0..6.0);
            self.particles.push(Particle {
                pos,
                vel,
                color,
                life: 1.0,
                size,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mode: GameMode) -> Session {
        Session::new(mode, PlayerProgress::new(), None, Tuning::default(), 42)
    }

    #[test]
    fn test_starting_lives_per_mode() {
        assert_eq!(session(GameMode::Classic).lives, 3);
        assert_eq!(session(GameMode::Survival).lives, 1);
        assert_eq!(session(GameMode::TimeAttack).lives, 99);
        assert_eq!(session(GameMode::Challenge).lives, 3);
    }

    #[test]
    fn test_time_attack_countdown_seeded() {
        assert_eq!(session(GameMode::TimeAttack).time_remaining, 60.0);
        assert_eq!(session(GameMode::Classic).time_remaining, 0.0);
    }

    #[test]
    fn test_entity_ids_monotonic() {
        let mut state = session(GameMode::Classic);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_particles_capped() {
        let mut state = session(GameMode::Classic);
        for _ in 0..100 {
            state.burst_particles(Vec2::ZERO, 0xffffff, 20);
        }
        assert_eq!(state.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_mode_names_roundtrip() {
        for mode in [
            GameMode::Classic,
            GameMode::TimeAttack,
            GameMode::Survival,
            GameMode::Challenge,
        ] {
            assert_eq!(mode.as_str().parse::<GameMode>(), Ok(mode));
        }
        assert_eq!("time-attack".parse::<GameMode>(), Ok(GameMode::TimeAttack));
        assert_eq!(
            "arcade".parse::<GameMode>(),
            Err(UnknownMode("arcade".to_string()))
        );
    }
}
