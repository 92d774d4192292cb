//! Per-archetype callbacks invoked by the world tick and event methods.
//!
//! Every mob carries an [`ArchetypeTag`]; systems look up the matching static
//! hook set and call into it. Default methods give vanilla behavior, so an
//! archetype only overrides what it changes.

use bevy_ecs::prelude::*;
use eerie_nbt::NbtCompound;
use uuid::Uuid;

use crate::combat::{self, DamageSource};
use crate::components::ArchetypeTag;
use crate::config::{MobTuning, ModConfig};
use crate::entities::nether_knight::NETHER_KNIGHT_HOOKS;
use crate::entities::pumpkin_slime::PUMPKIN_SLIME_HOOKS;

/// Outcome of a player interacting with a mob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionResult {
    /// Nothing happened; the client may fall back to other handling.
    Pass,
    /// The interaction was handled.
    Consumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Ambient,
    Hurt,
    Death,
    Land,
}

pub trait ArchetypeHooks: Send + Sync {
    /// Insert archetype state. Runs for fresh spawns and for loaded records.
    fn on_construct(&self, _world: &mut World, _entity: Entity) {}

    /// First spawn only; loaded records skip this.
    fn on_initial_spawn(&self, _world: &mut World, _entity: Entity) {}

    /// Once per tick, after AI has run.
    fn on_tick(&self, _world: &mut World, _entity: Entity) {}

    /// Damage intake. Returns whether the hit was applied.
    fn attack_from(&self, world: &mut World, entity: Entity, source: &DamageSource, amount: f32) -> bool {
        combat::hurt(world, entity, source, amount)
    }

    /// Damage dealt by this mob's melee hit.
    fn melee_damage(&self, world: &World, entity: Entity) -> f32 {
        combat::melee_damage(world, entity)
    }

    fn on_interact(&self, _world: &mut World, _entity: Entity, _player: Entity) -> InteractionResult {
        InteractionResult::Pass
    }

    fn write_nbt(&self, _world: &World, _entity: Entity, _nbt: &mut NbtCompound) {}

    fn read_nbt(&self, _world: &mut World, _entity: Entity, _nbt: &NbtCompound) {}

    fn takes_fall_damage(&self) -> bool {
        true
    }

    /// Natural spawning skips the darkness requirement.
    fn ignores_light(&self) -> bool {
        false
    }

    fn can_damage_player(&self, _world: &World, _entity: Entity) -> bool {
        true
    }

    /// Owning player, if tamed. Owners are never targeted and owned mobs
    /// never despawn.
    fn owner(&self, _world: &World, _entity: Entity) -> Option<Uuid> {
        None
    }

    fn sound(&self, _world: &World, _entity: Entity, _kind: SoundKind) -> Option<&'static str> {
        None
    }

    fn loot_table(&self) -> Option<&'static str> {
        None
    }
}

pub struct VanillaHooks;

impl ArchetypeHooks for VanillaHooks {}

pub static VANILLA_HOOKS: VanillaHooks = VanillaHooks;

/// Which hook set a mob type uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    Vanilla,
    PumpkinSlime,
    NetherKnight,
}

impl Archetype {
    pub fn hooks(self) -> &'static dyn ArchetypeHooks {
        match self {
            Archetype::Vanilla => &VANILLA_HOOKS,
            Archetype::PumpkinSlime => &PUMPKIN_SLIME_HOOKS,
            Archetype::NetherKnight => &NETHER_KNIGHT_HOOKS,
        }
    }

    /// Configurable tunables, for archetypes that have them.
    pub fn tuning(self, config: &ModConfig) -> Option<&MobTuning> {
        match self {
            Archetype::Vanilla => None,
            Archetype::PumpkinSlime => Some(&config.pumpkin_slime.mob),
            Archetype::NetherKnight => Some(&config.nether_knight.mob),
        }
    }
}

/// Hook set for an entity; vanilla when it carries no tag.
pub fn hooks_of(world: &World, entity: Entity) -> &'static dyn ArchetypeHooks {
    world
        .get::<ArchetypeTag>(entity)
        .map_or(Archetype::Vanilla, |tag| tag.0)
        .hooks()
}
