//! Per-frame simulation tick
//!
//! Advances every subsystem once, in a fixed order, for the elapsed time
//! since the previous frame.

use glam::Vec2;

use super::boss::update_boss;
use super::combo;
use super::events::{Cue, GameEvent};
use super::powerup;
use super::spawn::tick_spawn_timer;
use super::state::{Drop, GameMode, GamePhase, Outcome, Session};
use super::weather::{drift_snow, update_sneeze, update_weather};
use crate::consts::*;

/// Advance the session by `dt` seconds of wall time
pub fn tick(state: &mut Session, dt: f32) {
    // Game over is terminal
    if state.is_over() {
        return;
    }

    // Long stalls must not teleport drops through the plate; a NaN or
    // infinite frame time counts as no time at all
    let dt = if dt.is_finite() { dt } else { 0.0 };
    let dt = dt.clamp(0.0, state.tuning.play.max_frame_delta);
    state.elapsed += dt;

    // 1. Time attack countdown
    if state.mode == GameMode::TimeAttack {
        let shown = state.time_remaining.ceil();
        state.time_remaining = (state.time_remaining - dt).max(0.0);
        if state.time_remaining.ceil() != shown {
            state.emit(GameEvent::TimeRemaining {
                seconds: state.time_remaining,
            });
        }
        if state.time_remaining <= 0.0 {
            end_game(state, Outcome::TimeUp);
            return;
        }
    }

    // 2. Survival speed ramp
    if state.mode == GameMode::Survival {
        let interval = state.tuning.play.survival_ramp_interval;
        state.survival_timer += dt;
        while state.survival_timer >= interval {
            state.survival_timer -= interval;
            state.speed_multiplier += state.tuning.play.survival_ramp_step;
            log::debug!("Survival speed now x{:.2}", state.speed_multiplier);
        }
    }

    // 3. Normal spawning
    tick_spawn_timer(state, dt);

    // 4. Boss sequence
    update_boss(state, dt);
    if state.is_over() {
        return;
    }

    // 5. Falling drops
    let factor = powerup::speed_factor(state);
    for drop in state.drops.iter_mut() {
        drop.pos.y += drop.speed * factor * dt * FRAME_SCALE;
    }
    while let Some(idx) = state.drops.iter().position(|d| d.reached_plate()) {
        let drop = state.drops.remove(idx);
        land_on_plate(state, drop);
        if state.is_over() {
            return;
        }
    }

    // 6. Tissue auto-clear
    powerup::tick_auto_clear(state);
    if state.is_over() {
        return;
    }

    // 7-9. Collectibles, effects, combo timers
    powerup::tick_power_ups(state, dt);
    powerup::tick_effects(state, dt);
    combo::tick_timers(state, dt);

    // 10-11. Hazards
    update_weather(state, dt);
    update_sneeze(state, dt);

    // 12. Cosmetics
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.5 {
        state.screen_shake = 0.0;
    }
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += 0.2;
        particle.life -= 0.02;
    }
    state.particles.retain(|p| p.life > 0.0);
    drift_snow(state, dt);
}

/// A drop touched the plate: shield it or charge its hearts
fn land_on_plate(state: &mut Session, drop: Drop) {
    state.emit(GameEvent::Cue(Cue::Splash));
    state.screen_shake = state.screen_shake.max(10.0);
    state.burst_particles(Vec2::new(drop.pos.x, PLATE_Y), drop.kind.color(), 12);

    if powerup::take_shield(state) {
        log::debug!("Shield absorbed drop {}", drop.id);
        state.emit(GameEvent::Cue(Cue::ShieldBlock));
    } else {
        state.lives = state.lives.saturating_sub(drop.hearts);
        log::debug!("Missed drop {}, {} lives left", drop.id, state.lives);
        state.emit(GameEvent::LivesChanged { lives: state.lives });
        if state.lives == 0 {
            end_game(state, Outcome::OutOfLives);
            return;
        }
        combo::reset(state);
        if let Some(mission) = state.mission.as_mut() {
            mission.on_miss();
        }
    }

    if !state.boss.is_active() && state.drops.is_empty() {
        state.spawn_timer = Some(state.tuning.play.spawn_delay_miss);
    }
}

/// Enter the terminal phase. Queues the final notification.
pub(crate) fn end_game(state: &mut Session, outcome: Outcome) {
    if state.is_over() {
        return;
    }
    state.phase = GamePhase::GameOver(outcome);
    let new_high_score = state.progress.update_high_score(state.mode, state.score);
    log::info!(
        "Game over ({:?}): score {}, {} drops wiped{}",
        outcome,
        state.score,
        state.stats.drops_wiped,
        if new_high_score { ", new high score" } else { "" }
    );
    state.emit(GameEvent::GameOver {
        outcome,
        new_high_score,
    });
}
