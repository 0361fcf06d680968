//! Combo streaks and multipliers

use super::events::{Cue, GameEvent};
use super::state::Session;

/// Extend the streak after a wipe and adopt a higher tier if one is reached.
///
/// Returns true when the multiplier changed.
pub fn register_wipe(state: &mut Session) -> bool {
    state.combo.streak += 1;
    let streak = state.combo.streak;

    let Some(tier) = state
        .tuning
        .combo
        .tiers
        .iter()
        .rev()
        .find(|tier| streak >= tier.streak)
        .cloned()
    else {
        return false;
    };
    if tier.multiplier <= state.combo.multiplier {
        return false;
    }

    let top = state.tuning.is_top_combo_tier(&tier);
    state.combo.multiplier = tier.multiplier;
    state.combo.label = tier.label.clone();
    state.combo.display_timer = state.tuning.combo.display_duration;
    state.stats.peak_multiplier = state.stats.peak_multiplier.max(tier.multiplier);
    if top {
        state.combo.slow_motion_timer = state.tuning.combo.slow_motion_duration;
        state.emit(GameEvent::Cue(Cue::SuperWipe));
    } else {
        state.emit(GameEvent::Cue(Cue::Combo));
    }
    log::debug!("Combo x{} at streak {}", tier.multiplier, streak);
    state.emit(GameEvent::ComboChanged {
        multiplier: tier.multiplier,
        label: tier.label,
    });
    true
}

/// A drop reached the plate: streak and multiplier start over
pub fn reset(state: &mut Session) {
    state.combo.streak = 0;
    state.combo.multiplier = 1;
    state.combo.label.clear();
    state.combo.display_timer = 0.0;
    state.emit(GameEvent::ComboChanged {
        multiplier: 1,
        label: String::new(),
    });
}

/// Count down the label and slow-motion timers
pub fn tick_timers(state: &mut Session, dt: f32) {
    state.combo.display_timer = (state.combo.display_timer - dt).max(0.0);
    state.combo.slow_motion_timer = (state.combo.slow_motion_timer - dt).max(0.0);
}
