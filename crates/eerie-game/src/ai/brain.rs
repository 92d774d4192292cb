//! Per-mob goal list and the goals currently holding each slot.

use bevy_ecs::prelude::*;

use super::behavior::{Behavior, BehaviorContext, BehaviorOutput, Slot};

#[derive(Component, Debug)]
pub struct BehaviorList {
    behaviors: Vec<Box<dyn Behavior>>,
    target_holder: Option<usize>,
    movement_holder: Option<usize>,
    passives: Vec<usize>,
}

impl BehaviorList {
    pub fn new(behaviors: Vec<Box<dyn Behavior>>) -> Self {
        Self {
            behaviors,
            target_holder: None,
            movement_holder: None,
            passives: Vec::new(),
        }
    }

    /// Index of the goal holding an exclusive slot.
    pub fn holder(&self, slot: Slot) -> Option<usize> {
        match slot {
            Slot::Target => self.target_holder,
            Slot::Movement => self.movement_holder,
            Slot::Passive => None,
        }
    }

    fn holder_mut(&mut self, slot: Slot) -> &mut Option<usize> {
        match slot {
            Slot::Target => &mut self.target_holder,
            _ => &mut self.movement_holder,
        }
    }

    /// Winner for an exclusive slot: the holder stays unless it wants to
    /// stop or a goal with a lower priority value can start.
    fn contender(&self, slot: Slot, ctx: &BehaviorContext) -> Option<usize> {
        let kept = self
            .holder(slot)
            .filter(|&i| self.behaviors[i].should_continue(ctx));
        let bar = kept.map_or(u32::MAX, |i| self.behaviors[i].priority());

        self.behaviors
            .iter()
            .enumerate()
            .filter(|&(i, b)| Some(i) != kept && b.slot() == slot && b.priority() < bar)
            .filter(|(_, b)| b.can_start(ctx))
            .min_by_key(|(_, b)| b.priority())
            .map(|(i, _)| i)
            .or(kept)
    }

    fn run_exclusive(&mut self, slot: Slot, ctx: &BehaviorContext, out: &mut BehaviorOutput) {
        let previous = self.holder(slot);
        let next = self.contender(slot, ctx);

        if next == previous {
            if let Some(i) = next {
                out.merge(self.behaviors[i].tick(ctx));
            }
            return;
        }
        if let Some(i) = previous {
            self.behaviors[i].stop();
        }
        match next {
            Some(i) => out.merge(self.behaviors[i].start(ctx)),
            // Losing the selector means losing the target.
            None if slot == Slot::Target => out.clear_target = true,
            None => {}
        }
        *self.holder_mut(slot) = next;
    }

    fn run_passives(&mut self, ctx: &BehaviorContext, out: &mut BehaviorOutput) {
        let running: Vec<usize> = self
            .behaviors
            .iter()
            .enumerate()
            .filter(|(_, b)| b.slot() == Slot::Passive)
            .filter(|(i, b)| {
                if self.passives.contains(i) {
                    b.should_continue(ctx)
                } else {
                    b.can_start(ctx)
                }
            })
            .map(|(i, _)| i)
            .collect();

        for &i in self.passives.iter().filter(|&&i| !running.contains(&i)) {
            self.behaviors[i].stop();
        }
        for &i in &running {
            let wanted = if self.passives.contains(&i) {
                self.behaviors[i].tick(ctx)
            } else {
                self.behaviors[i].start(ctx)
            };
            // Movement owns the body; gaze only fills in when idle.
            if out.face.is_none() {
                out.merge(wanted);
            }
        }
        self.passives = running;
    }

    /// Run one AI step. Targets picked this tick reach movement goals on the
    /// next one, since `ctx` is a snapshot.
    pub fn evaluate(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        let mut out = BehaviorOutput::default();
        self.run_exclusive(Slot::Target, ctx, &mut out);
        self.run_exclusive(Slot::Movement, ctx, &mut out);
        self.run_passives(ctx, &mut out);
        out
    }
}
