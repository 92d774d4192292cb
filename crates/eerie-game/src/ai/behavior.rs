//! Goal contract for mob AI.
//!
//! Each mob carries a list of goals. Every tick the AI system builds a
//! [`BehaviorContext`] snapshot, lets the goals compete for their [`Slot`],
//! and folds whatever the winners ask for into one [`BehaviorOutput`].

use bevy_ecs::prelude::Entity;

use crate::components::AiTarget;

use super::navigation;

/// The slot a goal competes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Target selection. One holder at a time.
    Target,
    /// Body movement. One holder at a time.
    Movement,
    /// Head and gaze. Any number may run together.
    Passive,
}

/// Another living entity as the mob sees it this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub entity: Entity,
    pub runtime_id: u64,
    pub position: (f32, f32, f32),
}

impl Sighting {
    pub fn as_target(&self) -> AiTarget {
        AiTarget {
            entity: self.entity,
            runtime_id: self.runtime_id,
        }
    }
}

/// Who last hurt the mob, and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HurtMemory {
    pub attacker: AiTarget,
    pub tick: u64,
}

/// Read-only view of one mob for the current tick.
#[derive(Debug, Clone)]
pub struct BehaviorContext {
    pub position: (f32, f32, f32),
    /// Blocks per tick.
    pub speed: f32,
    pub on_ground: bool,
    pub tick: u64,
    pub follow_range: f32,
    pub hurt_by: Option<HurtMemory>,
    pub target: Option<Sighting>,
    /// Owners never show up here.
    pub nearest_player: Option<Sighting>,
}

impl BehaviorContext {
    pub fn distance_to(&self, other: &Sighting) -> f32 {
        navigation::distance_xz(self.position.0, self.position.2, other.position.0, other.position.2)
    }

    pub fn within_follow_range(&self, other: &Sighting) -> bool {
        self.distance_to(other) <= self.follow_range
    }

    /// Yaw that faces `(x, z)` from here.
    pub fn yaw_to(&self, x: f32, z: f32) -> f32 {
        navigation::yaw_toward(self.position.0, self.position.2, x, z)
    }
}

/// What a goal wants done this tick.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BehaviorOutput {
    pub move_to: Option<(f32, f32, f32)>,
    /// Body and head yaw, degrees.
    pub face: Option<f32>,
    pub attack: bool,
    pub set_target: Option<AiTarget>,
    pub clear_target: bool,
}

impl BehaviorOutput {
    pub fn walk(ctx: &BehaviorContext, (x, y, z): (f32, f32, f32)) -> Self {
        Self {
            move_to: Some((x, y, z)),
            face: Some(ctx.yaw_to(x, z)),
            ..Self::default()
        }
    }

    pub fn target(target: AiTarget) -> Self {
        Self {
            set_target: Some(target),
            ..Self::default()
        }
    }

    /// Fold `other` on top of `self`. Later requests win; setting and
    /// clearing the target cancel each other.
    pub fn merge(&mut self, other: BehaviorOutput) {
        self.move_to = other.move_to.or(self.move_to);
        self.face = other.face.or(self.face);
        self.attack |= other.attack;
        if other.set_target.is_some() {
            self.set_target = other.set_target;
            self.clear_target = false;
        }
        if other.clear_target {
            self.set_target = None;
            self.clear_target = true;
        }
    }
}

/// One goal in a mob's list. Lower priority values win their slot.
pub trait Behavior: Send + Sync + std::fmt::Debug {
    fn slot(&self) -> Slot;

    fn priority(&self) -> u32;

    fn can_start(&self, ctx: &BehaviorContext) -> bool;

    fn should_continue(&self, ctx: &BehaviorContext) -> bool {
        self.can_start(ctx)
    }

    fn start(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        self.tick(ctx)
    }

    fn tick(&mut self, ctx: &BehaviorContext) -> BehaviorOutput;

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(n: u32) -> AiTarget {
        AiTarget {
            entity: Entity::from_raw(n),
            runtime_id: n as u64,
        }
    }

    #[test]
    fn clear_cancels_earlier_set() {
        let mut out = BehaviorOutput::target(target(1));
        out.merge(BehaviorOutput {
            clear_target: true,
            ..Default::default()
        });
        assert_eq!(out.set_target, None);
        assert!(out.clear_target);

        out.merge(BehaviorOutput::target(target(2)));
        assert_eq!(out.set_target, Some(target(2)));
        assert!(!out.clear_target);
    }

    #[test]
    fn merge_keeps_earlier_fields() {
        let mut out = BehaviorOutput {
            face: Some(90.0),
            attack: true,
            ..Default::default()
        };
        out.merge(BehaviorOutput::default());
        assert_eq!(out.face, Some(90.0));
        assert!(out.attack);
    }
}
