//! Challenge missions: an alternate win condition replacing free play

use serde::{Deserialize, Serialize};

use super::state::{Drop, DropKind, Side};

/// What a mission counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MissionCondition {
    /// Consecutive wipes; any miss resets progress
    NoMiss,
    /// Wipes of left-nostril drops, and only left drops spawn
    LeftOnly,
    /// Wipes of right-nostril drops, and only right drops spawn
    RightOnly,
    /// Wipes of one kind, and only that kind spawns
    KindOnly(DropKind),
    /// Seconds spent with a boss volley active
    BossSurvive,
}

impl MissionCondition {
    /// Kind restriction imposed on spawns, if any
    pub fn forced_kind(&self) -> Option<DropKind> {
        match self {
            MissionCondition::KindOnly(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub name: String,
    pub condition: MissionCondition,
    pub target: f32,
    pub progress: f32,
    pub completed: bool,
}

impl Mission {
    pub fn new(id: &str, name: &str, condition: MissionCondition, target: f32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            condition,
            target,
            progress: 0.0,
            completed: false,
        }
    }

    /// Built-in missions offered on the challenge screen
    pub fn catalog() -> Vec<Mission> {
        vec![
            Mission::new("no_miss_20", "Don't miss 20", MissionCondition::NoMiss, 20.0),
            Mission::new("left_only", "Left Nostril", MissionCondition::LeftOnly, 15.0),
            Mission::new(
                "sticky_only",
                "Sticky Only",
                MissionCondition::KindOnly(DropKind::Sticky),
                10.0,
            ),
            Mission::new("boss_survive", "Boss Survivor", MissionCondition::BossSurvive, 30.0),
        ]
    }

    pub fn from_catalog(id: &str) -> Option<Mission> {
        Self::catalog().into_iter().find(|m| m.id == id)
    }

    /// Credit a wiped drop. Returns true on the wipe that completes the mission.
    pub fn on_wipe(&mut self, drop: &Drop) -> bool {
        let counts = match &self.condition {
            MissionCondition::NoMiss => true,
            MissionCondition::LeftOnly => drop.side == Side::Left,
            MissionCondition::RightOnly => drop.side == Side::Right,
            MissionCondition::KindOnly(kind) => drop.kind == *kind,
            MissionCondition::BossSurvive => false,
        };
        if counts {
            self.advance(1.0)
        } else {
            false
        }
    }

    /// A drop reached the plate
    pub fn on_miss(&mut self) {
        if self.condition == MissionCondition::NoMiss && !self.completed {
            self.progress = 0.0;
        }
    }

    /// Accrue survival time while a boss volley is active
    pub fn on_boss_time(&mut self, dt: f32) -> bool {
        if self.condition == MissionCondition::BossSurvive {
            self.advance(dt)
        } else {
            false
        }
    }

    fn advance(&mut self, amount: f32) -> bool {
        if self.completed {
            return false;
        }
        self.progress = (self.progress + amount).min(self.target);
        if self.progress >= self.target {
            self.completed = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn drop(kind: DropKind, side: Side) -> Drop {
        Drop {
            id: 1,
            kind,
            side,
            pos: Vec2::ZERO,
            speed: 1.0,
            radius: 25.0,
            taps_required: 3,
            taps_received: 3,
            points: 1,
            hearts: 1,
        }
    }

    #[test]
    fn test_completes_on_exact_wipe() {
        let mut mission = Mission::new("t", "t", MissionCondition::NoMiss, 3.0);
        assert!(!mission.on_wipe(&drop(DropKind::Normal, Side::Left)));
        assert!(!mission.on_wipe(&drop(DropKind::Normal, Side::Right)));
        assert!(!mission.completed);
        assert!(mission.on_wipe(&drop(DropKind::Normal, Side::Left)));
        assert!(mission.completed);
        // Reported once
        assert!(!mission.on_wipe(&drop(DropKind::Normal, Side::Left)));
    }

    #[test]
    fn test_no_miss_resets() {
        let mut mission = Mission::from_catalog("no_miss_20").unwrap();
        mission.on_wipe(&drop(DropKind::Normal, Side::Left));
        mission.on_wipe(&drop(DropKind::Normal, Side::Left));
        mission.on_miss();
        assert_eq!(mission.progress, 0.0);
    }

    #[test]
    fn test_side_and_kind_filters() {
        let mut left = Mission::from_catalog("left_only").unwrap();
        left.on_wipe(&drop(DropKind::Normal, Side::Right));
        left.on_wipe(&drop(DropKind::Normal, Side::Left));
        assert_eq!(left.progress, 1.0);

        let mut sticky = Mission::from_catalog("sticky_only").unwrap();
        sticky.on_wipe(&drop(DropKind::Normal, Side::Left));
        sticky.on_wipe(&drop(DropKind::Sticky, Side::Left));
        assert_eq!(sticky.progress, 1.0);
        left.on_miss();
        assert_eq!(left.progress, 1.0);
    }

    #[test]
    fn test_boss_survive_accrues_time_only() {
        let mut mission = Mission::from_catalog("boss_survive").unwrap();
        assert!(!mission.on_wipe(&drop(DropKind::Normal, Side::Left)));
        assert_eq!(mission.progress, 0.0);
        for _ in 0..590 {
            assert!(!mission.on_boss_time(0.05));
        }
        let mut done = false;
        for _ in 0..20 {
            done |= mission.on_boss_time(0.05);
        }
        assert!(done);
        assert!(mission.completed);
    }
}
