//! Boss wave sequence
//!
//! Dormant -> Warning -> Active -> Relief -> Dormant, at most once per session.

use super::events::{Cue, GameEvent};
use super::hit::complete_mission;
use super::spawn::spawn_boss_volley;
use super::state::{BossPhase, Session};

/// Whether the trigger condition holds right now
pub fn should_trigger(state: &Session) -> bool {
    let boss = &state.tuning.boss;
    state.boss.phase == BossPhase::Dormant
        && !state.boss.triggered
        && state.mode.allows_boss()
        && state.score >= boss.trigger_score
        && state.level() >= boss.unlock_level
}

/// Advance the boss state machine by `dt`
pub fn update_boss(state: &mut Session, dt: f32) {
    if should_trigger(state) {
        state.boss.triggered = true;
        state.boss.waves_remaining = state.tuning.boss.waves;
        state.boss.phase = BossPhase::Warning {
            remaining: state.tuning.boss.warning_time,
        };
        log::info!("Boss incoming at score {}", state.score);
        state.emit(GameEvent::Cue(Cue::BossWarning));
    }

    let was_active = state.boss.is_active();
    match state.boss.phase {
        BossPhase::Dormant => {}
        BossPhase::Warning { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                // Volleys start on a clean field
                state.drops.clear();
                state.boss.phase = BossPhase::Active;
                state.boss.waves_remaining = state.boss.waves_remaining.saturating_sub(1);
                log::info!("Boss active, {} waves", state.tuning.boss.waves);
                spawn_boss_volley(state);
            } else {
                state.boss.phase = BossPhase::Warning { remaining };
            }
        }
        BossPhase::Active => {
            if state.drops.is_empty() {
                if state.boss.waves_remaining > 0 {
                    state.boss.waves_remaining -= 1;
                    spawn_boss_volley(state);
                } else {
                    let relief = state.tuning.boss.relief_time;
                    state.boss.phase = BossPhase::Relief { remaining: relief };
                    state.spawn_timer = None;
                    log::info!("Boss defeated, {:.1}s relief", relief);
                }
            }
        }
        BossPhase::Relief { remaining } => {
            let remaining = remaining - dt;
            state.boss.phase = if remaining <= 0.0 {
                BossPhase::Dormant
            } else {
                BossPhase::Relief { remaining }
            };
        }
    }

    if was_active {
        let completed = state
            .mission
            .as_mut()
            .is_some_and(|mission| mission.on_boss_time(dt));
        if completed {
            complete_mission(state);
        }
    }
}
