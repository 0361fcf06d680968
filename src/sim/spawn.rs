//! Drop spawning
//!
//! Normal play keeps a single drop on screen. Boss volleys and sneeze bursts
//! call `spawn_drop` directly and bypass that rule.

use rand::Rng;

use super::difficulty::tier_for_score;
use super::events::{Cue, GameEvent};
use super::mission::MissionCondition;
use super::state::{Drop, DropKind, Session, Side};

/// Pick a kind: 50% baseline when others are unlocked, else uniform among the rest
pub fn pick_drop_kind(state: &mut Session) -> DropKind {
    if let Some(kind) = state.mission.as_ref().and_then(|m| m.condition.forced_kind()) {
        return kind;
    }
    let others: Vec<DropKind> = state
        .unlocked
        .iter()
        .copied()
        .filter(|k| *k != DropKind::Normal)
        .collect();
    if others.is_empty() || state.rng.random_bool(0.5) {
        return DropKind::Normal;
    }
    others[state.rng.random_range(0..others.len())]
}

/// Left or right nostril, honoring a mission side restriction
pub fn pick_side(state: &mut Session) -> Side {
    match state.mission.as_ref().map(|m| &m.condition) {
        Some(MissionCondition::LeftOnly) => Side::Left,
        Some(MissionCondition::RightOnly) => Side::Right,
        _ => random_side(state),
    }
}

/// Coin flip between the two nostrils
pub fn random_side(state: &mut Session) -> Side {
    if state.rng.random_bool(0.5) {
        Side::Left
    } else {
        Side::Right
    }
}

/// Fall speed for a new drop of `kind`
pub fn drop_speed(state: &Session, kind: DropKind) -> f32 {
    let tuning = &state.tuning;
    let tier = tier_for_score(tuning, state.score);
    let mut speed = tier.base_speed * tuning.drops.get(kind).speed_mult * state.speed_multiplier;
    if state.boss.is_active() {
        speed *= tuning.boss.speed_mult;
    }
    speed.min(tuning.play.max_drop_speed)
}

/// Release one drop. Side and kind are chosen unless forced.
pub fn spawn_drop(state: &mut Session, side: Option<Side>, kind: Option<DropKind>) -> u32 {
    let side = match side {
        Some(side) => side,
        None => pick_side(state),
    };
    let kind = match kind {
        Some(kind) => kind,
        None => pick_drop_kind(state),
    };

    let params = *state.tuning.drops.get(kind);
    let tier = tier_for_score(&state.tuning, state.score);
    let speed = drop_speed(state, kind);
    let id = state.next_entity_id();

    state.drops.push(Drop {
        id,
        kind,
        side,
        pos: side.spawn_pos(),
        speed,
        radius: state.tuning.play.drop_radius,
        taps_required: params.base_taps + tier.extra_taps,
        taps_received: 0,
        points: params.points,
        hearts: params.hearts,
    });
    log::debug!("Spawned {:?} drop {} on {:?} at speed {:.2}", kind, id, side, speed);
    state.emit(GameEvent::Cue(Cue::Spawn));
    id
}

/// One drop per nostril plus one from the center, kinds chosen independently
pub fn spawn_boss_volley(state: &mut Session) {
    for side in [Side::Left, Side::Right, Side::Center] {
        spawn_drop(state, Some(side), None);
    }
    state.boss.drops_spawned += 3;
}

/// Extra drops on random nostrils, ignoring the one-at-a-time rule
pub fn spawn_burst(state: &mut Session, count: u32) {
    for _ in 0..count {
        let side = random_side(state);
        spawn_drop(state, Some(side), None);
    }
}

/// Normal spawn timer, run while the field is empty and no boss is on
pub fn tick_spawn_timer(state: &mut Session, dt: f32) {
    if !state.drops.is_empty() || state.boss.is_active() {
        return;
    }
    if matches!(state.boss.phase, super::state::BossPhase::Relief { .. }) {
        return;
    }

    let delay = state.tuning.play.spawn_delay;
    let timer = state.spawn_timer.get_or_insert(delay);
    *timer -= dt;
    if *timer <= 0.0 {
        state.spawn_timer = None;
        spawn_drop(state, None, None);
    }
}
