//! Weather hazards and the periodic sneeze
//!
//! Both run on their own timers, independent of difficulty.

use glam::Vec2;
use rand::Rng;

use super::events::{Cue, GameEvent};
use super::spawn::spawn_burst;
use super::state::{Session, Snowflake, Weather};
use crate::consts::*;

/// Advance the hazard scheduler
pub fn update_weather(state: &mut Session, dt: f32) {
    match state.weather.kind {
        Weather::None => {
            state.weather.cooldown = (state.weather.cooldown - dt).max(0.0);
            if state.weather.cooldown <= 0.0 {
                start_hazard(state);
            }
        }
        kind => {
            state.weather.timer = (state.weather.timer - dt).max(0.0);
            if kind == Weather::Dust {
                let tuning = &state.tuning.weather;
                state.weather.dust_opacity = (state.weather.dust_opacity
                    + dt * tuning.dust_opacity_rate)
                    .min(tuning.dust_max_opacity);
            }
            if state.weather.timer <= 0.0 {
                end_hazard(state, kind);
            }
        }
    }
}

fn start_hazard(state: &mut Session) {
    let tuning = state.tuning.weather.clone();
    if state.rng.random_bool(tuning.cold_chance) {
        state.weather.kind = Weather::Cold;
        state.weather.timer = tuning.cold_duration;
        let flakes: Vec<Snowflake> = (0..tuning.snowflake_count)
            .map(|_| Snowflake {
                pos: Vec2::new(
                    state.rng.random_range(0.0..WIDTH),
                    state.rng.random_range(0.0..HEIGHT),
                ),
                speed: state.rng.random_range(0.5..2.0),
                size: state.rng.random_range(1.5..4.0),
                drift: state.rng.random_range(0.0..std::f32::consts::TAU),
            })
            .collect();
        state.weather.snowflakes = flakes;
    } else {
        state.weather.kind = Weather::Dust;
        state.weather.timer = tuning.dust_duration;
        state.weather.dust_opacity = 0.0;
    }
    log::info!("Weather: {:?} for {:.0}s", state.weather.kind, state.weather.timer);
}

fn end_hazard(state: &mut Session, kind: Weather) {
    if kind == Weather::Dust {
        let drops = state.tuning.weather.dust_drops;
        sneeze(state, drops);
    }
    state.weather.kind = Weather::None;
    state.weather.dust_opacity = 0.0;
    state.weather.snowflakes.clear();
    state.weather.cooldown = match kind {
        Weather::Dust => state.tuning.weather.dust_cooldown,
        _ => state.tuning.weather.cold_cooldown,
    };
    log::info!("Weather cleared, next in {:.0}s", state.weather.cooldown);
}

/// The periodic sneeze, separate from weather
pub fn update_sneeze(state: &mut Session, dt: f32) {
    if !state.mode.allows_sneeze() {
        return;
    }
    state.sneeze_cooldown -= dt;
    if state.sneeze_cooldown <= 0.0 {
        let tuning = &state.tuning.sneeze;
        let (interval, jitter, drops) = (tuning.interval, tuning.jitter, tuning.drops);
        state.sneeze_cooldown = interval + state.rng.random_range(-jitter..=jitter);
        sneeze(state, drops);
    }
}

/// Shake the screen and blast out a burst of drops
fn sneeze(state: &mut Session, drops: u32) {
    log::debug!("Sneeze: {} drops", drops);
    state.screen_shake = 15.0;
    state.emit(GameEvent::Cue(Cue::Sneeze));
    spawn_burst(state, drops);
}

/// Cosmetic snowfall drift; never touches gameplay
pub fn drift_snow(state: &mut Session, dt: f32) {
    if state.weather.kind != Weather::Cold {
        return;
    }
    let time = state.elapsed;
    for flake in state.weather.snowflakes.iter_mut() {
        flake.pos.y += flake.speed * FRAME_SCALE * dt;
        flake.pos.x += (time + flake.drift).sin() * 0.3;
        if flake.pos.y > HEIGHT {
            flake.pos.y = -5.0;
            flake.pos.x = state.rng.random_range(0.0..WIDTH);
        }
    }
}
