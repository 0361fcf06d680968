//! Collectible power-ups and their installed effects

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::events::{Cue, GameEvent};
use super::hit::wipe_drop;
use super::state::{ActiveEffect, EffectTimer, PowerUp, PowerUpKind, Session};
use crate::consts::*;
use crate::tuning::Tuning;

/// Randomized delay until the next collectible
pub fn next_spawn_interval(rng: &mut Pcg32, tuning: &Tuning) -> f32 {
    rng.random_range(tuning.power_ups.spawn_min..tuning.power_ups.spawn_max)
}

/// Drop a collectible from the top unless one is already on screen
pub fn spawn_power_up(state: &mut Session) {
    if !state.power_ups.is_empty() {
        return;
    }
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let x = state
        .rng
        .random_range(POWER_UP_SPAWN_INSET..WIDTH - POWER_UP_SPAWN_INSET);
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        kind,
        pos: Vec2::new(x, POWER_UP_ENTRY_Y),
        vy: state.tuning.power_ups.fall_speed,
        radius: state.tuning.power_ups.radius,
    });
    log::debug!("Spawned {:?} power-up {}", kind, id);
}

/// Spawn timer plus fall and expiry of uncollected pickups
pub fn tick_power_ups(state: &mut Session, dt: f32) {
    state.power_up_timer -= dt;
    if state.power_up_timer <= 0.0 {
        spawn_power_up(state);
        state.power_up_timer = next_spawn_interval(&mut state.rng, &state.tuning);
    }

    for power_up in state.power_ups.iter_mut() {
        power_up.pos.y += power_up.vy * FRAME_SCALE * dt;
    }
    // Missed pickups carry no penalty
    state
        .power_ups
        .retain(|p| p.pos.y <= HEIGHT + POWER_UP_EXIT_MARGIN);
}

/// Replace any effect of the same kind
pub fn install_effect(state: &mut Session, kind: PowerUpKind, timer: EffectTimer) {
    state.effects.retain(|e| e.kind != kind);
    state.effects.push(ActiveEffect { kind, timer });
}

pub fn has_effect(state: &Session, kind: PowerUpKind) -> bool {
    state.effects.iter().any(|e| e.kind == kind)
}

/// Consume the shield if one is installed
pub fn take_shield(state: &mut Session) -> bool {
    let before = state.effects.len();
    state.effects.retain(|e| e.kind != PowerUpKind::Shield);
    state.effects.len() != before
}

/// Apply a collected pickup
pub fn collect(state: &mut Session, kind: PowerUpKind) {
    state.emit(GameEvent::Cue(Cue::PowerUp));
    match kind {
        PowerUpKind::ExtraHeart => {
            if state.lives < state.tuning.play.max_lives {
                state.lives += 1;
            }
            state.emit(GameEvent::LivesChanged { lives: state.lives });
        }
        PowerUpKind::Shield => install_effect(state, kind, EffectTimer::SingleUse),
        PowerUpKind::Tissue => {
            let duration = state.tuning.power_ups.tissue_duration;
            install_effect(state, kind, EffectTimer::Timed(duration));
        }
        PowerUpKind::Freeze => {
            let duration = state.tuning.power_ups.freeze_duration;
            install_effect(state, kind, EffectTimer::Timed(duration));
            state.emit(GameEvent::Cue(Cue::Freeze));
        }
    }
}

/// Count down timed effects and drop the expired ones
pub fn tick_effects(state: &mut Session, dt: f32) {
    for effect in state.effects.iter_mut() {
        if let EffectTimer::Timed(remaining) = &mut effect.timer {
            *remaining = (*remaining - dt).max(0.0);
        }
    }
    state
        .effects
        .retain(|e| !matches!(e.timer, EffectTimer::Timed(t) if t <= 0.0));
}

/// Tissue: force-wipe the oldest drop every tick while active
pub fn tick_auto_clear(state: &mut Session) {
    if !has_effect(state, PowerUpKind::Tissue) || state.drops.is_empty() {
        return;
    }
    let drop = &mut state.drops[0];
    drop.taps_received = drop.taps_required;
    let id = drop.id;
    wipe_drop(state, id);
}

/// Product of every active slow-down
pub fn speed_factor(state: &Session) -> f32 {
    let mut factor = 1.0;
    if state.combo.slow_motion_timer > 0.0 {
        factor *= state.tuning.combo.slow_motion_factor;
    }
    if has_effect(state, PowerUpKind::Freeze) {
        factor *= state.tuning.power_ups.freeze_factor;
    }
    factor
}
