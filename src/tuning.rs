//! Game balance tables
//!
//! Everything the simulation reads lives here instead of in globals. A
//! `Tuning` is validated once at startup; the simulation assumes a valid one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::state::DropKind;

/// Startup-time configuration errors
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("difficulty table is empty")]
    EmptyDifficulty,
    #[error("difficulty tier {index} does not increase over the previous tier")]
    DifficultyNotIncreasing { index: usize },
    #[error("combo table is empty")]
    EmptyCombo,
    #[error("combo tier {index} does not increase over the previous tier")]
    ComboNotIncreasing { index: usize },
    #[error("level unlock table is empty")]
    EmptyUnlocks,
    #[error("level 1 must unlock the Normal drop kind")]
    BaselineNotUnlocked,
    #[error("power-up spawn interval {min}..{max} is invalid")]
    PowerUpInterval { min: f32, max: f32 },
    #[error("cold weather chance must be within 0..=1, got {0}")]
    WeatherChance(f64),
    #[error("sneeze jitter must not be negative, got {0}")]
    SneezeJitter(f32),
    #[error("xp per level must be at least 1")]
    XpPerLevel,
    #[error("survival ramp interval must be positive, got {0}")]
    SurvivalRamp(f32),
    #[error("{name} must be within (0, 1], got {value}")]
    Factor { name: &'static str, value: f32 },
    #[error("drop radius must be positive, got {0}")]
    DropRadius(f32),
    #[error("max frame delta must be positive, got {0}")]
    FrameClamp(f32),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One row of the difficulty table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    /// Cumulative score at which this tier starts
    pub score: u64,
    /// Base fall speed before kind and session multipliers
    pub base_speed: f32,
    /// Taps added on top of the kind's baseline
    pub extra_taps: u32,
}

/// Fixed per-kind drop parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropParams {
    pub speed_mult: f32,
    pub base_taps: u32,
    pub points: u64,
    /// Lives lost when this drop reaches the plate
    pub hearts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropTable {
    pub normal: DropParams,
    pub fast: DropParams,
    pub sticky: DropParams,
    pub infection: DropParams,
}

impl DropTable {
    pub fn get(&self, kind: DropKind) -> &DropParams {
        match kind {
            DropKind::Normal => &self.normal,
            DropKind::Fast => &self.fast,
            DropKind::Sticky => &self.sticky,
            DropKind::Infection => &self.infection,
        }
    }
}

/// A (streak, multiplier, label) entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboTier {
    pub streak: u32,
    pub multiplier: u32,
    pub label: String,
}

/// Which multiplier a wiped drop scores with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComboScoring {
    /// Score with the multiplier in effect before this wipe extends the streak
    #[default]
    BeforeEscalation,
    /// Extend the streak first, then score with the resulting multiplier
    AfterEscalation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboTuning {
    pub tiers: Vec<ComboTier>,
    /// Seconds of slow motion granted by the top tier
    pub slow_motion_duration: f32,
    pub slow_motion_factor: f32,
    /// Seconds a tier label stays on screen
    pub display_duration: f32,
    #[serde(default)]
    pub scoring: ComboScoring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpTuning {
    pub spawn_min: f32,
    pub spawn_max: f32,
    pub fall_speed: f32,
    pub radius: f32,
    pub tissue_duration: f32,
    pub freeze_duration: f32,
    pub freeze_factor: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossTuning {
    pub trigger_score: u64,
    pub unlock_level: u32,
    pub waves: u32,
    pub speed_mult: f32,
    pub warning_time: f32,
    pub relief_time: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherTuning {
    pub cold_cooldown: f32,
    pub cold_duration: f32,
    pub snowflake_count: usize,
    pub dust_cooldown: f32,
    pub dust_duration: f32,
    pub dust_drops: u32,
    pub dust_max_opacity: f32,
    pub dust_opacity_rate: f32,
    /// Probability of picking cold over dust
    pub cold_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SneezeTuning {
    pub interval: f32,
    pub jitter: f32,
    pub drops: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUnlock {
    pub level: u32,
    pub kind: DropKind,
    pub label: String,
}

/// Mode-independent play constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayTuning {
    pub initial_lives: u32,
    pub max_lives: u32,
    pub time_attack_lives: u32,
    pub max_drop_speed: f32,
    pub time_attack_duration: f32,
    pub spawn_delay: f32,
    pub spawn_delay_miss: f32,
    pub first_spawn_delay: f32,
    /// Survival: speed multiplier gained every `survival_ramp_interval` seconds
    pub survival_ramp_step: f32,
    pub survival_ramp_interval: f32,
    /// Speed multiplier gained per wiped drop, up to `wipe_speed_cap`
    pub wipe_speed_gain: f32,
    pub wipe_speed_cap: f32,
    /// Taps land within `radius * tap_radius_factor`
    pub tap_radius_factor: f32,
    pub tap_shrink: f32,
    pub drop_radius: f32,
    /// Elapsed time per tick is clamped to this many seconds
    pub max_frame_delta: f32,
    pub xp_per_level: u32,
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub difficulty: Vec<DifficultyTier>,
    pub drops: DropTable,
    pub combo: ComboTuning,
    pub power_ups: PowerUpTuning,
    pub boss: BossTuning,
    pub weather: WeatherTuning,
    pub sneeze: SneezeTuning,
    pub level_unlocks: Vec<LevelUnlock>,
    pub play: PlayTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        let tier = |score, base_speed| DifficultyTier {
            score,
            base_speed,
            extra_taps: 0,
        };
        let combo = |streak, multiplier, label: &str| ComboTier {
            streak,
            multiplier,
            label: label.to_string(),
        };
        let unlock = |level, kind, label: &str| LevelUnlock {
            level,
            kind,
            label: label.to_string(),
        };

        Self {
            difficulty: vec![
                tier(0, 1.5),
                tier(5, 1.6),
                tier(10, 1.7),
                tier(15, 1.8),
                tier(20, 1.9),
                tier(25, 2.0),
                tier(30, 2.1),
                tier(40, 2.2),
                tier(50, 2.3),
                tier(60, 2.4),
                tier(75, 2.5),
                tier(100, 2.7),
                tier(150, 3.0),
            ],
            drops: DropTable {
                normal: DropParams { speed_mult: 1.0, base_taps: 3, points: 1, hearts: 1 },
                fast: DropParams { speed_mult: 2.0, base_taps: 3, points: 2, hearts: 1 },
                sticky: DropParams { speed_mult: 0.7, base_taps: 3, points: 1, hearts: 1 },
                infection: DropParams { speed_mult: 1.5, base_taps: 3, points: 3, hearts: 2 },
            },
            combo: ComboTuning {
                tiers: vec![
                    combo(3, 2, "COMBO x2!"),
                    combo(5, 3, "COMBO x3!"),
                    combo(10, 5, "SUPER WIPE!"),
                ],
                slow_motion_duration: 3.0,
                slow_motion_factor: 0.3,
                display_duration: 1.5,
                scoring: ComboScoring::BeforeEscalation,
            },
            power_ups: PowerUpTuning {
                spawn_min: 15.0,
                spawn_max: 20.0,
                fall_speed: 0.8,
                radius: 18.0,
                tissue_duration: 3.0,
                freeze_duration: 5.0,
                freeze_factor: 0.3,
            },
            boss: BossTuning {
                trigger_score: 50,
                unlock_level: 20,
                waves: 10,
                speed_mult: 1.5,
                warning_time: 2.0,
                relief_time: 5.0,
            },
            weather: WeatherTuning {
                cold_cooldown: 60.0,
                cold_duration: 15.0,
                snowflake_count: 30,
                dust_cooldown: 90.0,
                dust_duration: 3.0,
                dust_drops: 5,
                dust_max_opacity: 0.4,
                dust_opacity_rate: 0.3,
                cold_chance: 0.6,
            },
            sneeze: SneezeTuning {
                interval: 45.0,
                jitter: 10.0,
                drops: 4,
            },
            level_unlocks: vec![
                unlock(1, DropKind::Normal, "Normal Drops"),
                unlock(5, DropKind::Fast, "Fast Drops Unlocked!"),
                unlock(10, DropKind::Sticky, "Sticky Drops Unlocked!"),
                unlock(15, DropKind::Infection, "Infection Drops Unlocked!"),
            ],
            play: PlayTuning {
                initial_lives: 3,
                max_lives: 5,
                time_attack_lives: 99,
                max_drop_speed: 10.0,
                time_attack_duration: 60.0,
                spawn_delay: 0.3,
                spawn_delay_miss: 0.8,
                first_spawn_delay: 0.1,
                survival_ramp_step: 0.15,
                survival_ramp_interval: 5.0,
                wipe_speed_gain: 0.05,
                wipe_speed_cap: 2.5,
                tap_radius_factor: 1.5,
                tap_shrink: 0.95,
                drop_radius: 25.0,
                max_frame_delta: 0.05,
                xp_per_level: 10,
            },
        }
    }
}

impl Tuning {
    /// Parse a tuning file and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        if let Err(err) = tuning.validate() {
            log::warn!("Rejected tuning: {}", err);
            return Err(err);
        }
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.difficulty.is_empty() {
            return Err(TuningError::EmptyDifficulty);
        }
        for (index, pair) in self.difficulty.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.score <= prev.score
                || next.base_speed < prev.base_speed
                || next.extra_taps < prev.extra_taps
            {
                return Err(TuningError::DifficultyNotIncreasing { index: index + 1 });
            }
        }

        if self.combo.tiers.is_empty() {
            return Err(TuningError::EmptyCombo);
        }
        for (index, pair) in self.combo.tiers.windows(2).enumerate() {
            if pair[1].streak <= pair[0].streak || pair[1].multiplier <= pair[0].multiplier {
                return Err(TuningError::ComboNotIncreasing { index: index + 1 });
            }
        }

        if self.level_unlocks.is_empty() {
            return Err(TuningError::EmptyUnlocks);
        }
        if !self
            .level_unlocks
            .iter()
            .any(|u| u.level <= 1 && u.kind == DropKind::Normal)
        {
            return Err(TuningError::BaselineNotUnlocked);
        }

        let (min, max) = (self.power_ups.spawn_min, self.power_ups.spawn_max);
        if !(min > 0.0 && min < max) {
            return Err(TuningError::PowerUpInterval { min, max });
        }

        if !(0.0..=1.0).contains(&self.weather.cold_chance) {
            return Err(TuningError::WeatherChance(self.weather.cold_chance));
        }

        if !(self.sneeze.jitter >= 0.0) {
            return Err(TuningError::SneezeJitter(self.sneeze.jitter));
        }

        let play = &self.play;
        if play.xp_per_level == 0 {
            return Err(TuningError::XpPerLevel);
        }
        if !(play.survival_ramp_interval > 0.0) {
            return Err(TuningError::SurvivalRamp(play.survival_ramp_interval));
        }
        for (name, value) in [
            ("tap shrink", play.tap_shrink),
            ("slow motion factor", self.combo.slow_motion_factor),
            ("freeze factor", self.power_ups.freeze_factor),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(TuningError::Factor { name, value });
            }
        }
        if !(play.drop_radius > 0.0) {
            return Err(TuningError::DropRadius(play.drop_radius));
        }
        if !(play.max_frame_delta > 0.0) {
            return Err(TuningError::FrameClamp(play.max_frame_delta));
        }

        Ok(())
    }

    /// Whether `tier` is the last (top) combo tier
    pub fn is_top_combo_tier(&self, tier: &ComboTier) -> bool {
        self.combo
            .tiers
            .last()
            .is_some_and(|top| top.multiplier == tier.multiplier)
    }
}
