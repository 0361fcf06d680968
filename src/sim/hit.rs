//! Tap resolution
//!
//! Maps a tap in canvas space to a collectible or a drop. Safe to call any
//! number of times between ticks.

use glam::Vec2;

use super::combo;
use super::events::{Cue, GameEvent};
use super::powerup;
use super::state::{Outcome, PowerUpKind, Session};
use super::tick::end_game;
use crate::tuning::ComboScoring;
use crate::within_radius;

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapResult {
    /// Session is over, nothing happened
    Ignored,
    Collected(PowerUpKind),
    /// Landed on a drop that still needs more taps
    Hit { id: u32 },
    /// Final tap on a drop
    Cleared { id: u32 },
    /// Hit nothing
    Miss,
}

/// Resolve one tap. Collectibles take priority over drops; at most one
/// target is affected.
pub fn handle_tap(state: &mut Session, pos: Vec2) -> TapResult {
    if state.is_over() {
        return TapResult::Ignored;
    }
    let factor = state.tuning.play.tap_radius_factor;

    if let Some(idx) = state
        .power_ups
        .iter()
        .position(|p| within_radius(pos, p.pos, p.radius * factor))
    {
        let power_up = state.power_ups.remove(idx);
        log::debug!("Collected {:?} power-up {}", power_up.kind, power_up.id);
        state.burst_particles(power_up.pos, 0xfbbf24, 8);
        powerup::collect(state, power_up.kind);
        return TapResult::Collected(power_up.kind);
    }

    let hit = state
        .drops
        .iter()
        .position(|d| within_radius(pos, d.pos, d.radius * factor));
    let Some(idx) = hit else {
        if !state.drops.is_empty() {
            state.emit(GameEvent::Cue(Cue::WrongSide));
        }
        return TapResult::Miss;
    };

    let shrink = state.tuning.play.tap_shrink;
    let drop = &mut state.drops[idx];
    drop.taps_received += 1;
    drop.radius *= shrink;
    let (id, satisfied, color) = (drop.id, drop.is_satisfied(), drop.kind.color());
    state.emit(GameEvent::Cue(Cue::Wipe));
    state.burst_particles(pos, color, 3);

    if satisfied {
        wipe_drop(state, id);
        TapResult::Cleared { id }
    } else {
        TapResult::Hit { id }
    }
}

/// Remove a satisfied drop and apply scoring, combo, xp and mission credit
pub(crate) fn wipe_drop(state: &mut Session, id: u32) {
    let Some(idx) = state.drops.iter().position(|d| d.id == id) else {
        return;
    };
    let drop = state.drops.remove(idx);
    debug_assert_eq!(drop.taps_received, drop.taps_required);
    state.emit(GameEvent::Cue(Cue::Cleared));
    state.burst_particles(drop.pos, drop.kind.color(), 10);

    let points = match state.tuning.combo.scoring {
        ComboScoring::BeforeEscalation => {
            let points = drop.points * state.combo.multiplier as u64;
            combo::register_wipe(state);
            points
        }
        ComboScoring::AfterEscalation => {
            combo::register_wipe(state);
            drop.points * state.combo.multiplier as u64
        }
    };
    state.score += points;
    state.emit(GameEvent::ScoreChanged { score: state.score });
    state.stats.drops_wiped += 1;

    // The survival ramp may already sit above the cap
    let play = &state.tuning.play;
    if state.speed_multiplier < play.wipe_speed_cap {
        state.speed_multiplier =
            (state.speed_multiplier + play.wipe_speed_gain).min(play.wipe_speed_cap);
    }

    let level_up = state
        .progress
        .add_xp(state.combo.multiplier, &state.tuning);
    if let Some(level_up) = level_up {
        state.unlocked = state.progress.unlocked_kinds(&state.tuning);
        log::info!("Level up to {}", level_up.level);
        state.emit(GameEvent::Cue(Cue::LevelUp));
        state.emit(GameEvent::LevelUp {
            level: level_up.level,
            unlock: level_up.unlock,
        });
    }

    let completed = state
        .mission
        .as_mut()
        .is_some_and(|mission| mission.on_wipe(&drop));
    if completed {
        complete_mission(state);
        return;
    }

    // Only boss volleys hold normal spawning back; an installed shield does not
    if !state.boss.is_active() && state.drops.is_empty() {
        state.spawn_timer = Some(state.tuning.play.spawn_delay);
    }
}

/// Record the finished mission and end the run as a win
pub(crate) fn complete_mission(state: &mut Session) {
    let Some(id) = state.mission.as_ref().map(|m| m.id.clone()) else {
        return;
    };
    log::info!("Mission {} complete", id);
    state.progress.record_mission(&id);
    state.emit(GameEvent::MissionCompleted { id });
    end_game(state, Outcome::MissionComplete);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::PlayerProgress;
    use crate::sim::mission::Mission;
    use crate::sim::spawn::spawn_drop;
    use crate::sim::state::{DropKind, GameMode, PowerUp, Side};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn session() -> Session {
        Session::new(GameMode::Classic, PlayerProgress::new(), None, Tuning::default(), 5)
    }

    fn scores(events: &[GameEvent]) -> Vec<u64> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ScoreChanged { score } => Some(*score),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_required_taps_clear_drop() {
        let mut state = session();
        let id = spawn_drop(&mut state, Some(Side::Left), Some(DropKind::Normal));
        let pos = state.drops[0].pos;
        state.drain_events();

        assert_eq!(handle_tap(&mut state, pos), TapResult::Hit { id });
        assert_eq!(handle_tap(&mut state, pos), TapResult::Hit { id });
        assert!(state.drops[0].radius < 25.0);
        assert_eq!(handle_tap(&mut state, pos), TapResult::Cleared { id });
        assert!(state.drops.is_empty());
        assert_eq!(state.score, 1);
        assert_eq!(scores(&state.drain_events()), vec![1]);
        assert_eq!(state.spawn_timer, Some(0.3));
    }

    #[test]
    fn test_collectible_has_priority() {
        let mut state = session();
        spawn_drop(&mut state, Some(Side::Left), Some(DropKind::Normal));
        let pos = state.drops[0].pos;
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            kind: PowerUpKind::Shield,
            pos,
            vy: 0.8,
            radius: 18.0,
        });

        assert_eq!(handle_tap(&mut state, pos), TapResult::Collected(PowerUpKind::Shield));
        assert!(state.power_ups.is_empty());
        assert_eq!(state.drops[0].taps_received, 0);
        assert!(powerup::has_effect(&state, PowerUpKind::Shield));
    }

    #[test]
    fn test_one_drop_per_tap() {
        let mut state = session();
        spawn_drop(&mut state, Some(Side::Left), Some(DropKind::Normal));
        spawn_drop(&mut state, Some(Side::Left), Some(DropKind::Normal));
        let pos = state.drops[0].pos;
        handle_tap(&mut state, pos);
        assert_eq!(state.drops[0].taps_received, 1);
        assert_eq!(state.drops[1].taps_received, 0);
    }

    #[test]
    fn test_miss_tap_cue() {
        let mut state = session();
        assert_eq!(handle_tap(&mut state, Vec2::new(0.0, 0.0)), TapResult::Miss);
        assert!(state.drain_events().is_empty());

        spawn_drop(&mut state, Some(Side::Left), Some(DropKind::Normal));
        state.drain_events();
        assert_eq!(handle_tap(&mut state, Vec2::new(0.0, 0.0)), TapResult::Miss);
        assert_eq!(state.drain_events(), vec![GameEvent::Cue(Cue::WrongSide)]);
    }

    #[test]
    fn test_scoring_orders_differ_at_tier_edge() {
        let run = |scoring: ComboScoring| {
            let mut tuning = Tuning::default();
            tuning.combo.scoring = scoring;
            let mut state = Session::new(GameMode::Classic, PlayerProgress::new(), None, tuning, 5);
            for _ in 0..3 {
                let id = spawn_drop(&mut state, Some(Side::Left), Some(DropKind::Normal));
                let pos = state.drops.iter().find(|d| d.id == id).unwrap().pos;
                for _ in 0..3 {
                    handle_tap(&mut state, pos);
                }
            }
            state.score
        };
        // Third wipe reaches x2: it scores 1 before escalation, 2 after
        assert_eq!(run(ComboScoring::BeforeEscalation), 3);
        assert_eq!(run(ComboScoring::AfterEscalation), 4);
    }

    #[test]
    fn test_mission_completes_on_exact_tap() {
        let mut progress = PlayerProgress::new();
        progress.level = 10;
        let mut mission = Mission::from_catalog("sticky_only").unwrap();
        mission.target = 2.0;
        let mut state = Session::new(GameMode::Challenge, progress, Some(mission), Tuning::default(), 9);

        for round in 0..2 {
            let id = spawn_drop(&mut state, None, None);
            let pos = state.drops[0].pos;
            assert_eq!(state.drops[0].kind, DropKind::Sticky);
            handle_tap(&mut state, pos);
            handle_tap(&mut state, pos);
            assert!(!state.mission.as_ref().unwrap().completed);
            assert_eq!(handle_tap(&mut state, pos), TapResult::Cleared { id });
            assert_eq!(state.mission.as_ref().unwrap().completed, round == 1);
        }
        assert!(state.is_over());
        assert!(state.progress.missions_completed.contains(&"sticky_only".to_string()));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::MissionCompleted { id: "sticky_only".into() }));
        assert!(matches!(events.last(), Some(GameEvent::GameOver { outcome: Outcome::MissionComplete, .. })));
        assert_eq!(handle_tap(&mut state, Vec2::ZERO), TapResult::Ignored);
    }

    #[test]
    fn test_shield_does_not_hold_back_next_spawn() {
        let mut state = session();
        powerup::collect(&mut state, PowerUpKind::Shield);
        state.spawn_timer = None;
        let id = spawn_drop(&mut state, Some(Side::Left), Some(DropKind::Normal));
        let pos = state.drops[0].pos;
        for _ in 0..3 {
            handle_tap(&mut state, pos);
        }
        assert!(state.drops.iter().all(|d| d.id != id));
        assert_eq!(state.spawn_timer, Some(0.3));
        assert!(powerup::has_effect(&state, PowerUpKind::Shield));
    }

    #[test]
    fn test_wipes_grant_xp_and_level() {
        let mut state = session();
        // Level 2 costs 20 xp
        state.progress.xp = 19;
        let id = spawn_drop(&mut state, Some(Side::Right), Some(DropKind::Normal));
        let pos = state.drops[0].pos;
        for _ in 0..3 {
            handle_tap(&mut state, pos);
        }
        assert_eq!(state.level(), 2);
        assert!(state.drain_events().contains(&GameEvent::LevelUp { level: 2, unlock: None }));
        assert!(state.drops.iter().all(|d| d.id != id));
    }

    proptest! {
        #[test]
        fn prop_taps_never_exceed_required(taps in 1usize..12) {
            let mut state = session();
            let id = spawn_drop(&mut state, Some(Side::Left), Some(DropKind::Normal));
            let pos = state.drops[0].pos;
            for _ in 0..taps {
                handle_tap(&mut state, pos);
                if let Some(drop) = state.drops.iter().find(|d| d.id == id) {
                    prop_assert!(drop.taps_received < drop.taps_required);
                }
            }
            prop_assert_eq!(state.drops.is_empty(), taps >= 3);
        }
    }
}
