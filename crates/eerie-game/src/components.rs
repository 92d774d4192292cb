//! ECS components shared by players and mobs.

use bevy_ecs::prelude::*;
use uuid::Uuid;

use crate::hooks::Archetype;

/// Network identity for an entity.
#[derive(Component, Debug, Clone)]
pub struct EntityId {
    pub unique_id: i64,
    pub runtime_id: u64,
}

/// Position in the world (feet).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Rotation angles in degrees.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
}

/// Velocity in blocks per tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Velocity {
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Steering input produced by AI this tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveInput {
    pub forward: f32,
    pub strafe: f32,
    pub vertical: f32,
}

impl MoveInput {
    pub fn is_zero(&self) -> bool {
        self.forward == 0.0 && self.strafe == 0.0 && self.vertical == 0.0
    }
}

/// Health points. `max` mirrors the max-health attribute.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Whether the entity is standing on the ground.
#[derive(Component, Debug, Clone, Copy)]
pub struct OnGround(pub bool);

/// Blocks fallen since last touching the ground.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FallDistance(pub f32);

/// Axis-aligned bounding box dimensions.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
}

/// Namespaced type identifier, e.g. `"eerie:pumpkin_slime"`.
#[derive(Component, Debug, Clone)]
pub struct MobType(pub String);

/// Which hook set drives this mob.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeTag(pub Archetype);

/// Experience dropped on death.
#[derive(Component, Debug, Clone, Copy)]
pub struct Experience(pub u32);

/// Tick when this entity last took damage (invulnerability frames).
#[derive(Component, Debug, Clone, Copy)]
pub struct LastDamageTick(pub Option<u64>);

/// The living entity that last hurt this one.
#[derive(Component, Debug, Clone, Copy)]
pub struct LastHurtBy {
    pub entity: Entity,
    pub runtime_id: u64,
    pub tick: u64,
}

/// Remaining burn time in ticks.
#[derive(Component, Debug, Clone, Copy)]
pub struct OnFire {
    pub ticks: u32,
}

/// Marker: fire and lava never damage this entity.
#[derive(Component, Debug)]
pub struct FireImmune;

/// Marker: the entity ignores physics, knockback and entity pushing.
#[derive(Component, Debug)]
pub struct Anchored;

/// Marker: this entity is a mob (non-player).
#[derive(Component, Debug)]
pub struct Mob;

/// Marker: this entity is a player.
#[derive(Component, Debug)]
pub struct Player;

/// Marker: this entity is dead or removed (pending cleanup).
#[derive(Component, Debug)]
pub struct Dead;

/// Persistent identity of a player.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerProfile {
    pub uuid: Uuid,
}

/// The stack in a player's main hand.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct HeldItem {
    pub name: String,
    pub count: u32,
}

impl HeldItem {
    pub fn empty() -> Self {
        Self {
            name: "minecraft:air".into(),
            count: 0,
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.count > 0 && self.name == name
    }

    /// Remove one item from the stack.
    pub fn shrink(&mut self) {
        self.count = self.count.saturating_sub(1);
        if self.count == 0 {
            *self = Self::empty();
        }
    }
}

/// The entity this mob is currently targeting.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AiTarget {
    pub entity: Entity,
    pub runtime_id: u64,
}

/// Status effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Weakness,
}

/// Active status effects with remaining ticks.
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveEffects(pub Vec<(EffectKind, u32)>);

impl ActiveEffects {
    /// Add or refresh an effect. A longer remaining duration is kept.
    pub fn add(&mut self, kind: EffectKind, ticks: u32) {
        match self.0.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, remaining)) => *remaining = (*remaining).max(ticks),
            None => self.0.push((kind, ticks)),
        }
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.0.iter().any(|(k, t)| *k == kind && *t > 0)
    }

    /// Count every effect down one tick, dropping expired ones.
    pub fn tick(&mut self) {
        for (_, remaining) in &mut self.0 {
            *remaining = remaining.saturating_sub(1);
        }
        self.0.retain(|(_, t)| *t > 0);
    }
}
