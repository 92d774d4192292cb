//! Pumpkin slime: a hostile slime that rests as a carved pumpkin block until
//! something comes within reach.

use bevy_ecs::prelude::*;
use eerie_nbt::{CompoundExt, NbtCompound};
use eerie_world::{BlockPos, BlockState, BlockView, Facing, MIN_Y};
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::attributes::{AttributeKind, AttributeMap};
use crate::components::*;
use crate::config::ModConfig;
use crate::game_world::{
    mark_removed, push_event, Difficulty, GameEvent, MobRng, ParticleKind, Terrain, WorldClock,
};
use crate::hooks::{ArchetypeHooks, InteractionResult, SoundKind};

/// Follow range while mobile.
pub const FOLLOW_RANGE_MOBILE: f64 = 16.0;

/// Follow range while posing as a block: a player's reach.
pub const FOLLOW_RANGE_DECOY: f64 = 4.5;

pub const TAMING_ITEM: &str = "minecraft:pumpkin_pie";

pub const LOOT_TABLE: &str = "eerie:entities/pumpkin_slime";

/// Particles shown per taming attempt.
pub const TAME_PARTICLES: u32 = 7;

/// Block placed when a slime solidifies, by variant.
pub const VARIANT_BLOCKS: [&str; 6] = [
    "eerie:carved_pumpkin_angry",
    "eerie:carved_pumpkin_creepy",
    "eerie:carved_pumpkin_happy",
    "eerie:carved_pumpkin_shocked",
    "eerie:carved_pumpkin_sneaky",
    "eerie:carved_pumpkin_spooky",
];

pub const VARIANT_COUNT: i32 = VARIANT_BLOCKS.len() as i32;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct PumpkinSlime {
    /// Posing as a block.
    pub is_decoy: bool,
    /// Carved face, `0..VARIANT_COUNT`.
    pub variant: i32,
    /// Yaw held while a decoy, always a multiple of 90.
    pub locked_yaw: f32,
    pub owner: Option<Uuid>,
    pub sitting: bool,
    /// Per-entity taming switch; the tuning flag must allow it too.
    pub allow_taming: bool,
}

impl Default for PumpkinSlime {
    fn default() -> Self {
        Self {
            is_decoy: false,
            variant: 0,
            locked_yaw: 0.0,
            owner: None,
            sitting: false,
            allow_taming: true,
        }
    }
}

impl PumpkinSlime {
    pub fn variant_block(&self) -> &'static str {
        VARIANT_BLOCKS[self.variant.clamp(0, VARIANT_COUNT - 1) as usize]
    }
}

/// Nearest multiple of 90 degrees, in `0..360`.
pub fn snap_yaw(yaw: f32) -> f32 {
    ((yaw / 90.0).round() * 90.0).rem_euclid(360.0)
}

fn set_follow_range(world: &mut World, entity: Entity, range: f64) {
    if let Some(mut attrs) = world.get_mut::<AttributeMap>(entity) {
        if let Some(slot) = attrs.get_mut(AttributeKind::FollowRange) {
            slot.set_base(range);
        }
    }
}

fn form_changed(world: &mut World, entity: Entity, decoy: bool) {
    if let Some(runtime_id) = world.get::<EntityId>(entity).map(|e| e.runtime_id) {
        push_event(world, GameEvent::MobFormChanged { runtime_id, decoy });
    }
}

/// Freeze in place: facing locked, no motion, no steering.
pub fn hold_still(world: &mut World, entity: Entity) {
    let Some(yaw) = world.get::<PumpkinSlime>(entity).map(|s| s.locked_yaw) else {
        return;
    };
    if let Some(mut rot) = world.get_mut::<Rotation>(entity) {
        *rot = Rotation {
            pitch: 0.0,
            yaw,
            head_yaw: yaw,
        };
    }
    if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
        *vel = Velocity::default();
    }
    if let Some(mut input) = world.get_mut::<MoveInput>(entity) {
        *input = MoveInput::default();
    }
}

/// Settle onto the block grid and start posing as a block.
fn enter_decoy(world: &mut World, entity: Entity) {
    let (Some(pos), Some(yaw)) = (
        world.get::<Position>(entity).copied(),
        world.get::<Rotation>(entity).map(|r| r.yaw),
    ) else {
        return;
    };
    let (x, z) = (pos.x.floor() + 0.5, pos.z.floor() + 0.5);

    let terrain = &world.resource::<Terrain>().0;
    let mut rest = BlockPos::containing(x, pos.y, z);
    while terrain.is_air(rest) && rest.y > MIN_Y {
        rest = rest.down(1);
    }
    let settled = Position {
        x,
        y: (rest.y + 1) as f32,
        z,
    };
    let locked_yaw = snap_yaw(yaw);

    let mut slime = world.entity_mut(entity);
    slime.insert((settled, FallDistance::default(), Anchored));
    slime.remove::<AiTarget>();
    if let Some(mut state) = slime.get_mut::<PumpkinSlime>() {
        state.is_decoy = true;
        state.locked_yaw = locked_yaw;
    }
    set_follow_range(world, entity, FOLLOW_RANGE_DECOY);

    if let Some(runtime_id) = world.get::<EntityId>(entity).map(|e| e.runtime_id) {
        push_event(
            world,
            GameEvent::MobMoved {
                runtime_id,
                position: (settled.x, settled.y, settled.z),
                pitch: 0.0,
                yaw: locked_yaw,
                head_yaw: locked_yaw,
                on_ground: true,
            },
        );
    }
    form_changed(world, entity, true);
    debug!(?entity, x, y = settled.y, z, yaw = locked_yaw, "pumpkin slime became a decoy");
}

/// Pose as a block. Entry side effects run once; the hold runs every call.
/// Unowned slimes are removed afterwards on peaceful.
pub fn become_decoy(world: &mut World, entity: Entity) {
    let Some(state) = world.get::<PumpkinSlime>(entity).cloned() else {
        return;
    };
    if !state.is_decoy {
        enter_decoy(world, entity);
    }
    hold_still(world, entity);

    if *world.resource::<Difficulty>() == Difficulty::Peaceful && state.owner.is_none() {
        mark_removed(world, entity);
    }
}

/// Drop the block pose and widen detection range.
pub fn become_mobile(world: &mut World, entity: Entity) {
    let Some(mut state) = world.get_mut::<PumpkinSlime>(entity) else {
        return;
    };
    if !state.is_decoy {
        return;
    }
    state.is_decoy = false;
    world.entity_mut(entity).remove::<Anchored>();
    set_follow_range(world, entity, FOLLOW_RANGE_MOBILE);
    form_changed(world, entity, false);
    debug!(?entity, "pumpkin slime woke up");
}

/// Daylight burns the slime away, sometimes leaving its pumpkin behind.
fn burn_in_sunlight(world: &mut World, entity: Entity) {
    let tuning = &world.resource::<ModConfig>().pumpkin_slime;
    if !tuning.die_in_sunlight || !world.resource::<WorldClock>().is_daytime() {
        return;
    }
    let solidify_chance = tuning.solidify_chance;
    let (Some(pos), Some(state)) = (
        world.get::<Position>(entity).copied(),
        world.get::<PumpkinSlime>(entity).cloned(),
    ) else {
        return;
    };

    if world.resource_mut::<MobRng>().chance(solidify_chance) {
        let block_pos = BlockPos::containing(pos.x, pos.y, pos.z);
        let block = BlockState::solid(state.variant_block()).with_facing(Facing::from_yaw(state.locked_yaw));
        let name = block.name.clone();
        world.resource_mut::<Terrain>().0.set_block(block_pos, block);
        push_event(world, GameEvent::BlockChanged { pos: block_pos, block: name });
    }

    push_event(
        world,
        GameEvent::Particles {
            kind: ParticleKind::Poof,
            position: (pos.x, pos.y, pos.z),
            count: 20,
        },
    );
    mark_removed(world, entity);
}

fn tame_cue(world: &mut World, entity: Entity, succeeded: bool) {
    let Some(pos) = world.get::<Position>(entity).copied() else {
        return;
    };
    push_event(
        world,
        GameEvent::Particles {
            kind: if succeeded { ParticleKind::Heart } else { ParticleKind::Smoke },
            position: (pos.x, pos.y + 0.5, pos.z),
            count: TAME_PARTICLES,
        },
    );
}

pub struct PumpkinSlimeHooks;

pub static PUMPKIN_SLIME_HOOKS: PumpkinSlimeHooks = PumpkinSlimeHooks;

impl ArchetypeHooks for PumpkinSlimeHooks {
    fn on_construct(&self, world: &mut World, entity: Entity) {
        world.entity_mut(entity).insert(PumpkinSlime::default());
    }

    fn on_initial_spawn(&self, world: &mut World, entity: Entity) {
        let variant = world.resource_mut::<MobRng>().0.gen_range(0..VARIANT_COUNT);
        if let Some(mut state) = world.get_mut::<PumpkinSlime>(entity) {
            state.variant = variant;
        }
    }

    fn on_tick(&self, world: &mut World, entity: Entity) {
        let Some(state) = world.get::<PumpkinSlime>(entity).cloned() else {
            return;
        };
        let has_target = world.get::<AiTarget>(entity).is_some();

        if (!has_target && state.owner.is_none()) || state.sitting {
            if state.sitting {
                world.entity_mut(entity).remove::<AiTarget>();
            }
            become_decoy(world, entity);
        } else if state.is_decoy && has_target {
            become_mobile(world, entity);
        }

        if world.get::<Dead>(entity).is_none() {
            burn_in_sunlight(world, entity);
        }
    }

    fn melee_damage(&self, world: &World, entity: Entity) -> f32 {
        crate::combat::melee_damage(world, entity).trunc()
    }

    fn on_interact(&self, world: &mut World, entity: Entity, player: Entity) -> InteractionResult {
        let (Some(state), Some(player_uuid)) = (
            world.get::<PumpkinSlime>(entity).cloned(),
            world.get::<PlayerProfile>(player).map(|p| p.uuid),
        ) else {
            return InteractionResult::Pass;
        };

        if state.owner == Some(player_uuid) {
            let sitting = !state.sitting;
            if let Some(mut s) = world.get_mut::<PumpkinSlime>(entity) {
                s.sitting = sitting;
            }
            if !sitting {
                become_mobile(world, entity);
            }
            debug!(?entity, sitting, "owner toggled sitting");
            return InteractionResult::Consumed;
        }

        let tame_chance = {
            let tuning = &world.resource::<ModConfig>().pumpkin_slime;
            if !(state.allow_taming && tuning.allow_taming) {
                return InteractionResult::Pass;
            }
            tuning.tame_chance
        };
        let Some(mut held) = world.get_mut::<HeldItem>(player) else {
            return InteractionResult::Pass;
        };
        if !held.is(TAMING_ITEM) {
            return InteractionResult::Pass;
        }
        held.shrink();

        let tamed = world.resource_mut::<MobRng>().chance(tame_chance);
        if tamed {
            if let Some(mut s) = world.get_mut::<PumpkinSlime>(entity) {
                s.owner = Some(player_uuid);
            }
            debug!(?entity, owner = %player_uuid, "pumpkin slime tamed");
        }
        tame_cue(world, entity, tamed);
        InteractionResult::Consumed
    }

    fn write_nbt(&self, world: &World, entity: Entity, nbt: &mut NbtCompound) {
        let Some(state) = world.get::<PumpkinSlime>(entity) else {
            return;
        };
        nbt.put_bool("IsBlockForm", state.is_decoy);
        nbt.put_int("Type", state.variant);
        nbt.put_float("LookRotation", state.locked_yaw);
        nbt.put_bool("AllowTaming", state.allow_taming);
        if let Some(owner) = state.owner {
            nbt.put_uuid("Owner", owner);
            nbt.put_bool("Sitting", state.sitting);
        }
    }

    fn read_nbt(&self, world: &mut World, entity: Entity, nbt: &NbtCompound) {
        let variant = nbt.get_int("Type");
        let owner = nbt.get_uuid("Owner");
        let state = PumpkinSlime {
            is_decoy: nbt.get_bool("IsBlockForm"),
            variant: if (0..VARIANT_COUNT).contains(&variant) { variant } else { 0 },
            locked_yaw: nbt.get_float("LookRotation"),
            owner,
            sitting: owner.is_some() && nbt.get_bool("Sitting"),
            allow_taming: nbt.get_bool("AllowTaming"),
        };
        let decoy = state.is_decoy;
        world.entity_mut(entity).insert(state);
        if decoy {
            world.entity_mut(entity).insert(Anchored);
            set_follow_range(world, entity, FOLLOW_RANGE_DECOY);
        }
    }

    fn can_damage_player(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<PumpkinSlime>(entity)
            .is_some_and(|s| !s.is_decoy && s.owner.is_none())
    }

    fn owner(&self, world: &World, entity: Entity) -> Option<Uuid> {
        world.get::<PumpkinSlime>(entity).and_then(|s| s.owner)
    }

    fn sound(&self, world: &World, entity: Entity, kind: SoundKind) -> Option<&'static str> {
        let decoy = world.get::<PumpkinSlime>(entity).is_some_and(|s| s.is_decoy);
        match kind {
            SoundKind::Ambient => None,
            SoundKind::Land if decoy => None,
            SoundKind::Land => Some("entity.slime.squish"),
            SoundKind::Hurt => Some("entity.slime.hurt"),
            SoundKind::Death => Some("entity.slime.death"),
        }
    }

    fn loot_table(&self) -> Option<&'static str> {
        Some(LOOT_TABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_world::GameWorld;

    fn slime(gw: &mut GameWorld, x: f32, y: f32, z: f32) -> Entity {
        let (_, rid) = gw.spawn_mob("eerie:pumpkin_slime", x, y, z).unwrap();
        gw.mob_entity(rid).unwrap()
    }

    #[test]
    fn yaw_snaps_to_quarters() {
        assert_eq!(snap_yaw(44.0), 0.0);
        assert_eq!(snap_yaw(46.0), 90.0);
        assert_eq!(snap_yaw(-91.0), 270.0);
        assert_eq!(snap_yaw(359.0), 0.0);
        assert_eq!(snap_yaw(181.0), 180.0);
    }

    #[test]
    fn decoy_entry_snaps_and_settles() {
        let mut gw = GameWorld::with_seed(1, 2);
        let e = slime(&mut gw, 3.2, 9.7, -1.8);
        gw.world.get_mut::<Rotation>(e).unwrap().yaw = 100.0;

        become_decoy(&mut gw.world, e);

        let pos = *gw.world.get::<Position>(e).unwrap();
        assert_eq!((pos.x, pos.y, pos.z), (3.5, 4.0, -1.5));
        let state = gw.world.get::<PumpkinSlime>(e).unwrap();
        assert!(state.is_decoy);
        assert_eq!(state.locked_yaw, 90.0);
        assert!(gw.world.get::<Anchored>(e).is_some());
        assert_eq!(
            gw.world.get::<AttributeMap>(e).unwrap().value(AttributeKind::FollowRange),
            FOLLOW_RANGE_DECOY
        );
    }

    #[test]
    fn decoy_entry_runs_once() {
        let mut gw = GameWorld::with_seed(1, 2);
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        become_decoy(&mut gw.world, e);
        gw.drain_events();

        gw.world.get_mut::<Velocity>(e).unwrap().x = 0.4;
        become_decoy(&mut gw.world, e);

        assert!(gw.world.get::<Velocity>(e).unwrap().is_zero());
        assert!(!gw
            .drain_events()
            .iter()
            .any(|ev| matches!(ev, GameEvent::MobFormChanged { .. })));
    }

    #[test]
    fn descent_stops_at_world_floor() {
        let mut gw = GameWorld::with_seed(1, 2);
        for y in MIN_Y..=3 {
            gw.terrain_mut().set_block(BlockPos::new(0, y, 0), BlockState::air());
        }
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        become_decoy(&mut gw.world, e);
        assert_eq!(gw.world.get::<Position>(e).unwrap().y, (MIN_Y + 1) as f32);
    }

    #[test]
    fn wakes_up_with_target() {
        let mut gw = GameWorld::with_seed(1, 2);
        let player = gw.spawn_player(9, 9, (0.5, 4.0, 3.0), Uuid::from_u128(9));
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        become_decoy(&mut gw.world, e);

        gw.world.entity_mut(e).insert(AiTarget {
            entity: player,
            runtime_id: 9,
        });
        PUMPKIN_SLIME_HOOKS.on_tick(&mut gw.world, e);

        assert!(!gw.world.get::<PumpkinSlime>(e).unwrap().is_decoy);
        assert!(gw.world.get::<Anchored>(e).is_none());
        assert_eq!(
            gw.world.get::<AttributeMap>(e).unwrap().value(AttributeKind::FollowRange),
            FOLLOW_RANGE_MOBILE
        );
    }

    #[test]
    fn owned_slime_stays_mobile_without_target() {
        let mut gw = GameWorld::with_seed(1, 2);
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        gw.world.get_mut::<PumpkinSlime>(e).unwrap().owner = Some(Uuid::from_u128(1));
        PUMPKIN_SLIME_HOOKS.on_tick(&mut gw.world, e);
        assert!(!gw.world.get::<PumpkinSlime>(e).unwrap().is_decoy);
    }

    #[test]
    fn peaceful_removes_unowned_after_setup() {
        let mut gw = GameWorld::with_seed(1, 2);
        gw.set_difficulty(Difficulty::Peaceful);
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        PUMPKIN_SLIME_HOOKS.on_tick(&mut gw.world, e);
        assert!(gw.world.get::<PumpkinSlime>(e).unwrap().is_decoy);
        assert!(gw.world.get::<Dead>(e).is_some());
    }

    #[test]
    fn peaceful_keeps_owned() {
        let mut gw = GameWorld::with_seed(1, 2);
        gw.set_difficulty(Difficulty::Peaceful);
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        {
            let mut state = gw.world.get_mut::<PumpkinSlime>(e).unwrap();
            state.owner = Some(Uuid::from_u128(1));
            state.sitting = true;
        }
        PUMPKIN_SLIME_HOOKS.on_tick(&mut gw.world, e);
        assert!(gw.world.get::<PumpkinSlime>(e).unwrap().is_decoy);
        assert!(gw.world.get::<Dead>(e).is_none());
    }

    #[test]
    fn sunlight_without_solidify() {
        let mut gw = GameWorld::with_seed(1, 2);
        gw.set_time(1_000);
        gw.config_mut().pumpkin_slime.solidify_chance = 0.0;
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        gw.drain_events();
        PUMPKIN_SLIME_HOOKS.on_tick(&mut gw.world, e);

        assert!(gw.world.get::<Dead>(e).is_some());
        assert!(!gw
            .drain_events()
            .iter()
            .any(|ev| matches!(ev, GameEvent::BlockChanged { .. })));
        assert!(gw.terrain().is_air(BlockPos::new(0, 4, 0)));
    }

    #[test]
    fn sunlight_disabled_keeps_slime() {
        let mut gw = GameWorld::with_seed(1, 2);
        gw.set_time(1_000);
        gw.config_mut().pumpkin_slime.die_in_sunlight = false;
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        PUMPKIN_SLIME_HOOKS.on_tick(&mut gw.world, e);
        assert!(gw.world.get::<Dead>(e).is_none());
    }

    #[test]
    fn owner_toggles_sitting() {
        let mut gw = GameWorld::with_seed(1, 2);
        let owner = Uuid::from_u128(3);
        let player = gw.spawn_player(3, 3, (2.0, 4.0, 0.5), owner);
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        gw.world.get_mut::<PumpkinSlime>(e).unwrap().owner = Some(owner);

        assert_eq!(
            PUMPKIN_SLIME_HOOKS.on_interact(&mut gw.world, e, player),
            InteractionResult::Consumed
        );
        assert!(gw.world.get::<PumpkinSlime>(e).unwrap().sitting);
        PUMPKIN_SLIME_HOOKS.on_tick(&mut gw.world, e);
        assert!(gw.world.get::<PumpkinSlime>(e).unwrap().is_decoy);

        PUMPKIN_SLIME_HOOKS.on_interact(&mut gw.world, e, player);
        let state = gw.world.get::<PumpkinSlime>(e).unwrap();
        assert!(!state.sitting);
        assert!(!state.is_decoy);
    }

    #[test]
    fn empty_hand_passes() {
        let mut gw = GameWorld::with_seed(1, 2);
        let player = gw.spawn_player(3, 3, (2.0, 4.0, 0.5), Uuid::from_u128(3));
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        assert_eq!(
            PUMPKIN_SLIME_HOOKS.on_interact(&mut gw.world, e, player),
            InteractionResult::Pass
        );
    }

    #[test]
    fn taming_disabled_by_config() {
        let mut gw = GameWorld::with_seed(1, 2);
        gw.config_mut().pumpkin_slime.allow_taming = false;
        let player = gw.spawn_player(3, 3, (2.0, 4.0, 0.5), Uuid::from_u128(3));
        gw.set_held_item(
            3,
            HeldItem {
                name: TAMING_ITEM.into(),
                count: 1,
            },
        );
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        assert_eq!(
            PUMPKIN_SLIME_HOOKS.on_interact(&mut gw.world, e, player),
            InteractionResult::Pass
        );
        assert_eq!(gw.held_item(3).unwrap().count, 1);
    }

    #[test]
    fn certain_taming_sets_owner() {
        let mut gw = GameWorld::with_seed(1, 2);
        gw.config_mut().pumpkin_slime.tame_chance = 1.0;
        let uuid = Uuid::from_u128(3);
        let player = gw.spawn_player(3, 3, (2.0, 4.0, 0.5), uuid);
        gw.set_held_item(
            3,
            HeldItem {
                name: TAMING_ITEM.into(),
                count: 2,
            },
        );
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        gw.drain_events();

        PUMPKIN_SLIME_HOOKS.on_interact(&mut gw.world, e, player);

        assert_eq!(gw.world.get::<PumpkinSlime>(e).unwrap().owner, Some(uuid));
        assert_eq!(gw.held_item(3).unwrap().count, 1);
        assert!(gw.drain_events().iter().any(|ev| matches!(
            ev,
            GameEvent::Particles { kind: ParticleKind::Heart, count: TAME_PARTICLES, .. }
        )));
    }

    #[test]
    fn decoy_cannot_hurt_players() {
        let mut gw = GameWorld::with_seed(1, 2);
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        assert!(PUMPKIN_SLIME_HOOKS.can_damage_player(&gw.world, e));
        become_decoy(&mut gw.world, e);
        assert!(!PUMPKIN_SLIME_HOOKS.can_damage_player(&gw.world, e));
        assert!(PUMPKIN_SLIME_HOOKS.sound(&gw.world, e, SoundKind::Land).is_none());
        assert!(PUMPKIN_SLIME_HOOKS.sound(&gw.world, e, SoundKind::Hurt).is_some());
    }

    #[test]
    fn melee_damage_is_whole() {
        let mut gw = GameWorld::with_seed(1, 2);
        gw.config_mut().pumpkin_slime.mob.attack = 3.7;
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        assert_eq!(PUMPKIN_SLIME_HOOKS.melee_damage(&gw.world, e), 3.0);
    }

    #[test]
    fn nbt_roundtrip_and_fallbacks() {
        let mut gw = GameWorld::with_seed(1, 2);
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        {
            let mut state = gw.world.get_mut::<PumpkinSlime>(e).unwrap();
            state.variant = 4;
            state.owner = Some(Uuid::from_u128(77));
            state.sitting = true;
            state.locked_yaw = 270.0;
        }
        let mut nbt = NbtCompound::new();
        PUMPKIN_SLIME_HOOKS.write_nbt(&gw.world, e, &mut nbt);
        assert!(nbt.has_uuid("Owner"));

        let copy = slime(&mut gw, 2.5, 4.0, 0.5);
        PUMPKIN_SLIME_HOOKS.read_nbt(&mut gw.world, copy, &nbt);
        assert_eq!(gw.world.get::<PumpkinSlime>(copy), gw.world.get::<PumpkinSlime>(e));

        nbt.put_int("Type", 9);
        nbt.remove("OwnerMost");
        PUMPKIN_SLIME_HOOKS.read_nbt(&mut gw.world, copy, &nbt);
        let state = gw.world.get::<PumpkinSlime>(copy).unwrap();
        assert_eq!(state.variant, 0);
        assert_eq!(state.owner, None);
        assert!(!state.sitting);
    }

    #[test]
    fn unowned_record_has_no_owner_keys() {
        let mut gw = GameWorld::with_seed(1, 2);
        let e = slime(&mut gw, 0.5, 4.0, 0.5);
        let mut nbt = NbtCompound::new();
        PUMPKIN_SLIME_HOOKS.write_nbt(&gw.world, e, &mut nbt);
        assert!(!nbt.contains_key("OwnerMost"));
        assert!(!nbt.contains_key("Sitting"));
        assert!(nbt.get_bool("AllowTaming"));
    }
}
