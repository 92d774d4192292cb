//! Stock goals shared by every mob archetype.

use rand::rngs::StdRng;
use rand::Rng;

use super::behavior::{Behavior, BehaviorContext, BehaviorOutput, Slot};
use super::navigation;

/// Wander to a random nearby point, then idle for a few seconds.
#[derive(Debug)]
pub struct RandomStroll {
    priority: u32,
    goal: Option<(f32, f32)>,
    idle_until: u64,
    rng: StdRng,
}

impl RandomStroll {
    pub fn new(priority: u32, rng: StdRng) -> Self {
        Self {
            priority,
            goal: None,
            idle_until: 0,
            rng,
        }
    }
}

impl Behavior for RandomStroll {
    fn slot(&self) -> Slot {
        Slot::Movement
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn can_start(&self, ctx: &BehaviorContext) -> bool {
        self.goal.is_none() && ctx.on_ground && ctx.tick >= self.idle_until
    }

    fn should_continue(&self, _ctx: &BehaviorContext) -> bool {
        self.goal.is_some()
    }

    fn start(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        let (x, y, z) = ctx.position;
        let (gx, gz) = (
            x + self.rng.gen_range(-10.0..10.0),
            z + self.rng.gen_range(-10.0..10.0),
        );
        self.goal = Some((gx, gz));
        BehaviorOutput::walk(ctx, (gx, y, gz))
    }

    fn tick(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        let Some((gx, gz)) = self.goal else {
            return BehaviorOutput::default();
        };
        let (x, y, z) = ctx.position;
        if navigation::distance_xz(x, z, gx, gz) < 0.5 {
            self.goal = None;
            self.idle_until = ctx.tick + self.rng.gen_range(40..120);
            return BehaviorOutput::default();
        }
        BehaviorOutput::walk(ctx, (gx, y, gz))
    }

    fn stop(&mut self) {
        self.goal = None;
    }
}

// ---------------------------------------------------------------------------

/// Turn toward the nearest player within `range`.
#[derive(Debug)]
pub struct LookAtPlayer {
    range: f32,
}

impl LookAtPlayer {
    pub fn new(range: f32) -> Self {
        Self { range }
    }
}

impl Behavior for LookAtPlayer {
    fn slot(&self) -> Slot {
        Slot::Passive
    }

    fn priority(&self) -> u32 {
        8
    }

    fn can_start(&self, ctx: &BehaviorContext) -> bool {
        ctx.nearest_player
            .is_some_and(|p| ctx.distance_to(&p) <= self.range)
    }

    fn tick(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        let face = ctx.nearest_player.map(|p| ctx.yaw_to(p.position.0, p.position.2));
        BehaviorOutput {
            face,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------

/// Chase the current target and swing when it is within `reach`.
#[derive(Debug)]
pub struct MeleeAttack {
    cooldown: u64,
    reach: f32,
    last_swing: Option<u64>,
}

impl MeleeAttack {
    pub fn new(cooldown: u64, reach: f32) -> Self {
        Self {
            cooldown,
            reach,
            last_swing: None,
        }
    }

    fn ready(&self, tick: u64) -> bool {
        self.last_swing
            .is_none_or(|last| tick.saturating_sub(last) >= self.cooldown)
    }
}

impl Behavior for MeleeAttack {
    fn slot(&self) -> Slot {
        Slot::Movement
    }

    fn priority(&self) -> u32 {
        2
    }

    fn can_start(&self, ctx: &BehaviorContext) -> bool {
        ctx.target.is_some()
    }

    fn tick(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        let Some(target) = ctx.target else {
            return BehaviorOutput::default();
        };
        let mut out = BehaviorOutput::walk(ctx, target.position);
        let close = navigation::distance_sq(ctx.position, target.position) < self.reach * self.reach;
        if close && self.ready(ctx.tick) {
            out.attack = true;
            self.last_swing = Some(ctx.tick);
        }
        out
    }
}

// ---------------------------------------------------------------------------

/// Pick the nearest non-owner player inside follow range; hold it until it
/// leaves that range.
#[derive(Debug, Default)]
pub struct NearestAttackableTarget;

impl NearestAttackableTarget {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for NearestAttackableTarget {
    fn slot(&self) -> Slot {
        Slot::Target
    }

    fn priority(&self) -> u32 {
        2
    }

    fn can_start(&self, ctx: &BehaviorContext) -> bool {
        ctx.target.is_none() && ctx.nearest_player.is_some_and(|p| ctx.within_follow_range(&p))
    }

    fn should_continue(&self, ctx: &BehaviorContext) -> bool {
        ctx.target.is_some_and(|t| ctx.within_follow_range(&t))
    }

    fn start(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        ctx.nearest_player
            .map(|p| BehaviorOutput::target(p.as_target()))
            .unwrap_or_default()
    }

    fn tick(&mut self, _ctx: &BehaviorContext) -> BehaviorOutput {
        BehaviorOutput::default()
    }
}

// ---------------------------------------------------------------------------

/// Turn on whatever hurt the mob in the last few seconds.
#[derive(Debug)]
pub struct HurtByTarget {
    memory: u64,
}

impl Default for HurtByTarget {
    fn default() -> Self {
        Self { memory: 60 }
    }
}

impl HurtByTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for HurtByTarget {
    fn slot(&self) -> Slot {
        Slot::Target
    }

    fn priority(&self) -> u32 {
        1
    }

    fn can_start(&self, ctx: &BehaviorContext) -> bool {
        ctx.hurt_by.is_some_and(|h| {
            ctx.tick.saturating_sub(h.tick) < self.memory
                && ctx.target.is_none_or(|t| t.entity != h.attacker.entity)
        })
    }

    fn should_continue(&self, ctx: &BehaviorContext) -> bool {
        ctx.target.is_some_and(|t| ctx.within_follow_range(&t))
    }

    fn start(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        ctx.hurt_by
            .map(|h| BehaviorOutput::target(h.attacker))
            .unwrap_or_default()
    }

    fn tick(&mut self, _ctx: &BehaviorContext) -> BehaviorOutput {
        BehaviorOutput::default()
    }
}
