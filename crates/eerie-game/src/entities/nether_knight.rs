//! Nether knight: an armored fire-immune brute that shrugs off ranged and
//! magic damage and calls in buffed reinforcements when hurt.

use bevy_ecs::prelude::*;
use eerie_nbt::{CompoundExt, NbtCompound};
use eerie_world::{BlockPos, BlockView};
use rand::Rng;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::attributes::{AttributeKind, AttributeMap, AttributeModifier, ModifierOp};
use crate::combat::{self, DamageKind, DamageSource};
use crate::components::*;
use crate::config::ModConfig;
use crate::game_world::{push_event, spawn_mob_entity, GameEvent, MobRng, SpawnError, Terrain};
use crate::hooks::{ArchetypeHooks, SoundKind};

/// Four-letter words engraved on a knight's armor.
pub const RUNE_WORDS: [[char; 4]; 5] = [
    ['D', 'A', 'R', 'K'],
    ['F', 'I', 'R', 'E'],
    ['G', 'E', 'G', 'Y'],
    ['S', 'A', 'L', 'T'],
    ['C', 'U', 'L', 'T'],
];

/// Placeholder for a rune index outside the word.
pub const MISSING_RUNE: char = 'X';

pub const MAX_REINFORCEMENT_ATTEMPTS: usize = 25;

/// How long an attacker burns when the knight sets them alight.
pub const BURN_SECONDS: u32 = 1;

/// Weakness applied each tick the knight is in water.
pub const WEAKNESS_TICKS: u32 = 25;

pub const LOOT_TABLE: &str = "eerie:entities/nether_knight";

pub const BUFF_ARMOR_ID: Uuid = Uuid::from_u128(0xcb1a4e88_69d3_4ba4_a6de_ea98bc63114f);
pub const BUFF_HEALTH_ID: Uuid = Uuid::from_u128(0xdf154adf_523a_4523_bf02_08115e8a666f);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetherKnight {
    /// Index into [`RUNE_WORDS`].
    pub rune_word: usize,
}

impl NetherKnight {
    /// The `index`-th letter of this knight's word, or `'X'` outside `0..4`.
    pub fn rune(&self, index: i32) -> char {
        let word = RUNE_WORDS.get(self.rune_word).unwrap_or(&RUNE_WORDS[0]);
        usize::try_from(index)
            .ok()
            .and_then(|i| word.get(i))
            .copied()
            .unwrap_or(MISSING_RUNE)
    }

    pub fn word(&self) -> String {
        (0..4).map(|i| self.rune(i)).collect()
    }
}

/// Magic, projectile and explosion hits the armor can ward off.
pub fn is_warded(source: &DamageSource) -> bool {
    !source.unblockable
        && matches!(
            source.kind,
            DamageKind::Magic | DamageKind::Projectile | DamageKind::Explosion
        )
}

/// Damage left after the armor's ward, before regular mitigation.
pub fn ward_damage(source: &DamageSource, amount: f32) -> f32 {
    if is_warded(source) {
        amount / 2.0
    } else {
        amount
    }
}

/// Endless stream of candidate `(dx, dz)` offsets. Each axis is a magnitude
/// in `range` times a sign in `{-1, 0, 1}`.
pub fn reinforcement_offsets<R: Rng>(rng: &mut R, (a, b): (i32, i32)) -> impl Iterator<Item = (i32, i32)> + '_ {
    let (low, high) = (a.min(b), a.max(b));
    std::iter::repeat_with(move || {
        let dx = rng.gen_range(low..=high) * rng.gen_range(-1..=1);
        let dz = rng.gen_range(low..=high) * rng.gen_range(-1..=1);
        (dx, dz)
    })
}

/// First candidate (bounded by [`MAX_REINFORCEMENT_ATTEMPTS`]) whose block one
/// below the knight's level is solid on top with two free blocks above.
pub fn find_reinforcement_ground(
    view: &impl BlockView,
    origin: BlockPos,
    offsets: impl IntoIterator<Item = (i32, i32)>,
) -> Option<BlockPos> {
    offsets
        .into_iter()
        .take(MAX_REINFORCEMENT_ATTEMPTS)
        .map(|(dx, dz)| origin.offset(dx, -1, dz))
        .find(|&ground| {
            view.block(ground).is_top_solid() && view.is_air(ground.up(1)) && view.is_air(ground.up(2))
        })
}

fn buff(id: Uuid, name: &str, amount: f64) -> AttributeModifier {
    AttributeModifier {
        id,
        name: name.into(),
        amount,
        op: ModifierOp::Add,
    }
}

/// Spawn one buffed reinforcement standing on `ground` and aim it at `target`.
pub fn spawn_reinforcement(
    world: &mut World,
    ground: BlockPos,
    y: f32,
    target: AiTarget,
) -> Result<Entity, SpawnError> {
    let tuning = world.resource::<ModConfig>().nether_knight.clone();
    if tuning.reinforcements.is_empty() {
        return Err(SpawnError::NoReinforcements);
    }
    let pick = world
        .resource_mut::<MobRng>()
        .0
        .gen_range(0..tuning.reinforcements.len());
    let mob_id = &tuning.reinforcements[pick];

    let entity = spawn_mob_entity(world, mob_id, (ground.x as f32 + 0.5, y, ground.z as f32 + 0.5))?;
    world.entity_mut(entity).insert(target);

    let max_health = {
        let mut attrs = world
            .get_mut::<AttributeMap>(entity)
            .ok_or(SpawnError::MissingAttribute(AttributeKind::Armor))?;
        attrs
            .register(AttributeKind::Armor)
            .ok_or(SpawnError::MissingAttribute(AttributeKind::Armor))?
            .apply_modifier(buff(BUFF_ARMOR_ID, "knight_buff_armor", tuning.bonus_armor));
        attrs
            .register(AttributeKind::MaxHealth)
            .ok_or(SpawnError::MissingAttribute(AttributeKind::MaxHealth))?
            .apply_modifier(buff(BUFF_HEALTH_ID, "knight_buff_health", tuning.bonus_health));
        attrs.value(AttributeKind::MaxHealth) as f32
    };

    world.entity_mut(entity).insert(Health {
        current: max_health,
        max: max_health,
    });
    if let Some(runtime_id) = world.get::<EntityId>(entity).map(|e| e.runtime_id) {
        push_event(
            world,
            GameEvent::MobAttributesChanged {
                runtime_id,
                health: max_health,
                max_health,
            },
        );
    }
    Ok(entity)
}

/// Look for ground around the knight and summon a reinforcement there.
fn summon_reinforcement(world: &mut World, knight: Entity, target: AiTarget) {
    let Some(pos) = world.get::<Position>(knight).copied() else {
        return;
    };
    let range = world.resource::<ModConfig>().nether_knight.spawn_range;
    let origin = BlockPos::containing(pos.x, pos.y, pos.z);

    let ground = world.resource_scope(|world: &mut World, mut rng: Mut<MobRng>| {
        let terrain = &world.resource::<Terrain>().0;
        find_reinforcement_ground(terrain, origin, reinforcement_offsets(&mut rng.0, range))
    });
    let Some(ground) = ground else {
        debug!(?knight, "no room for reinforcements");
        return;
    };

    match spawn_reinforcement(world, ground, pos.y, target) {
        Ok(entity) => debug!(?knight, ?entity, ?ground, "reinforcement summoned"),
        Err(err) => warn!(%err, ?knight, "failed to summon reinforcement"),
    }
}

/// Living entity the reinforcements should go after.
fn reinforcement_target(world: &World, knight: Entity, source: &DamageSource) -> Option<AiTarget> {
    if let Some(target) = world.get::<AiTarget>(knight) {
        return Some(*target);
    }
    let attacker = source.attacker.filter(|&a| a != knight)?;
    if world.get::<Health>(attacker).is_none() || world.get::<Dead>(attacker).is_some() {
        return None;
    }
    let runtime_id = world.get::<EntityId>(attacker)?.runtime_id;
    Some(AiTarget {
        entity: attacker,
        runtime_id,
    })
}

fn in_water(world: &World, entity: Entity) -> bool {
    let (Some(pos), Some(bb)) = (world.get::<Position>(entity), world.get::<BoundingBox>(entity)) else {
        return false;
    };
    let terrain = &world.resource::<Terrain>().0;
    let feet = BlockPos::containing(pos.x, pos.y, pos.z);
    let head = BlockPos::containing(pos.x, pos.y + bb.height * 0.85, pos.z);
    [feet, head].into_iter().any(|p| terrain.block(p).is_liquid() && terrain.block(p).name == "minecraft:water")
}

pub struct NetherKnightHooks;

pub static NETHER_KNIGHT_HOOKS: NetherKnightHooks = NetherKnightHooks;

impl ArchetypeHooks for NetherKnightHooks {
    fn on_construct(&self, world: &mut World, entity: Entity) {
        world.entity_mut(entity).insert(NetherKnight::default());
    }

    fn on_initial_spawn(&self, world: &mut World, entity: Entity) {
        let rune_word = world.resource_mut::<MobRng>().0.gen_range(0..RUNE_WORDS.len());
        world.entity_mut(entity).insert(NetherKnight { rune_word });
    }

    fn on_tick(&self, world: &mut World, entity: Entity) {
        if !in_water(world, entity) {
            return;
        }
        if let Some(mut effects) = world.get_mut::<ActiveEffects>(entity) {
            effects.add(EffectKind::Weakness, WEAKNESS_TICKS);
        }
    }

    fn attack_from(&self, world: &mut World, entity: Entity, source: &DamageSource, amount: f32) -> bool {
        let amount = ward_damage(source, amount);
        let (burn_chance, reinforcement_chance) = {
            let tuning = &world.resource::<ModConfig>().nether_knight;
            (tuning.burn_chance, tuning.reinforcement_chance)
        };

        if let Some(immediate) = source.immediate.filter(|&e| e != entity) {
            if world.resource_mut::<MobRng>().chance(burn_chance) {
                combat::set_fire(world, immediate, BURN_SECONDS);
            }
        }

        if !combat::hurt(world, entity, source, amount) {
            return false;
        }

        if let Some(target) = reinforcement_target(world, entity, source) {
            if world.resource_mut::<MobRng>().chance(reinforcement_chance) {
                summon_reinforcement(world, entity, target);
            }
        }
        true
    }

    fn write_nbt(&self, world: &World, entity: Entity, nbt: &mut NbtCompound) {
        if let Some(knight) = world.get::<NetherKnight>(entity) {
            nbt.put_int("RuneWord", knight.rune_word as i32);
        }
    }

    fn read_nbt(&self, world: &mut World, entity: Entity, nbt: &NbtCompound) {
        let rune_word = usize::try_from(nbt.get_int("RuneWord"))
            .ok()
            .filter(|&i| i < RUNE_WORDS.len())
            .unwrap_or(0);
        world.entity_mut(entity).insert(NetherKnight { rune_word });
    }

    fn takes_fall_damage(&self) -> bool {
        false
    }

    fn ignores_light(&self) -> bool {
        true
    }

    fn sound(&self, _world: &World, _entity: Entity, kind: SoundKind) -> Option<&'static str> {
        match kind {
            SoundKind::Ambient => Some("entity.blaze.ambient"),
            SoundKind::Hurt => Some("entity.blaze.hurt"),
            SoundKind::Death => Some("entity.blaze.death"),
            SoundKind::Land => None,
        }
    }

    fn loot_table(&self) -> Option<&'static str> {
        Some(LOOT_TABLE)
    }
}
