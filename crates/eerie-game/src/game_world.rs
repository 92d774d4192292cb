//! The mob world: resources, entity construction, the tick pipeline and the
//! event queue the host drains after each tick.

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use eerie_nbt::NbtRoot;
use eerie_world::{BiomeRegistry, BlockPos, BlockStore, BlockView};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uuid::Uuid;

use crate::ai::brain::BehaviorList;
use crate::ai::mob_behaviors;
use crate::ai::spawning::{self, SpawnConfig};
use crate::ai::system::system_ai_tick;
use crate::attributes::{AttributeKind, AttributeMap};
use crate::combat::{self, DamageSource};
use crate::components::*;
use crate::config::{ModConfig, RawModConfig};
use crate::hooks::{hooks_of, InteractionResult, SoundKind};
use crate::mob_registry::MobRegistry;
use crate::persistence;
use crate::spawn_table::SpawnTables;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[derive(Resource, Default)]
pub struct EventQueue(pub Vec<GameEvent>);

/// Ticks run since the world was created.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

/// Hands out unique ids; a mob's runtime id is its unique id reinterpreted.
#[derive(Resource)]
pub struct UniqueIds {
    next: i64,
}

impl UniqueIds {
    pub fn starting_at(next: i64) -> Self {
        Self { next }
    }

    pub fn claim(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn peek(&self) -> i64 {
        self.next
    }
}

/// runtime_id -> mob entity.
#[derive(Resource, Default)]
pub struct MobIndex(pub HashMap<u64, Entity>);

/// Time of day in ticks.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldClock {
    pub time: u64,
    /// Whether time advances each tick.
    pub daylight_cycle: bool,
}

impl WorldClock {
    pub const DAY_LENGTH: u64 = 24_000;

    pub fn time_of_day(&self) -> u64 {
        self.time % Self::DAY_LENGTH
    }

    pub fn is_daytime(&self) -> bool {
        self.time_of_day() < 12_000
    }

    /// How much the sky light is dimmed (0 by day, 11 at night).
    pub fn sky_darkening(&self) -> u8 {
        if self.is_daytime() {
            0
        } else {
            11
        }
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self {
            time: 18_000,
            daylight_cycle: true,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Peaceful,
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "peaceful" => Some(Difficulty::Peaceful),
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Seeded randomness for every gameplay roll.
#[derive(Resource)]
pub struct MobRng(pub StdRng);

impl MobRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// `true` with probability `chance` (0..=1).
    pub fn chance(&mut self, chance: f64) -> bool {
        self.0.gen::<f64>() < chance
    }
}

/// Block storage the mobs live in.
#[derive(Resource)]
pub struct Terrain(pub BlockStore);

#[derive(Resource, Default)]
pub struct Biomes(pub BiomeRegistry);

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Read-only view of one live mob.
#[derive(Debug, Clone)]
pub struct MobSnapshot {
    pub unique_id: i64,
    pub runtime_id: u64,
    pub mob_type: String,
    pub position: (f32, f32, f32),
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    pub health: f32,
    pub max_health: f32,
    pub bb_width: f32,
    pub bb_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Heart,
    Smoke,
    Poof,
}

/// Everything observable a tick produced, in order.
#[derive(Debug, Clone)]
pub enum GameEvent {
    MobSpawned {
        runtime_id: u64,
        unique_id: i64,
        mob_type: String,
        position: (f32, f32, f32),
        health: f32,
        max_health: f32,
        bb_width: f32,
        bb_height: f32,
    },
    MobMoved {
        runtime_id: u64,
        position: (f32, f32, f32),
        pitch: f32,
        yaw: f32,
        head_yaw: f32,
        on_ground: bool,
    },
    MobHurt {
        runtime_id: u64,
        new_health: f32,
        tick: u64,
    },
    /// A mob died; the network layer drops experience and rolls the loot table.
    MobDied {
        runtime_id: u64,
        unique_id: i64,
        experience: u32,
        loot_table: Option<&'static str>,
    },
    /// An entity was removed without dying (despawn, sunlight, peaceful).
    EntityRemoved { unique_id: i64 },
    MobAttackPlayer {
        mob_runtime_id: u64,
        target_runtime_id: u64,
        damage: f32,
        knockback: (f32, f32, f32),
    },
    /// Replicated form flag of a shape-shifting mob.
    MobFormChanged { runtime_id: u64, decoy: bool },
    MobAttributesChanged {
        runtime_id: u64,
        health: f32,
        max_health: f32,
    },
    BlockChanged { pos: BlockPos, block: String },
    Particles {
        kind: ParticleKind,
        position: (f32, f32, f32),
        count: u32,
    },
    EntityIgnited { runtime_id: u64, ticks: u32 },
    MobSound { runtime_id: u64, sound: &'static str },
}

pub fn push_event(world: &mut World, event: GameEvent) {
    world.resource_mut::<EventQueue>().0.push(event);
}

// ---------------------------------------------------------------------------
// Entity construction
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("unknown mob type `{0}`")]
    UnknownType(String),
    #[error("no reinforcement types configured")]
    NoReinforcements,
    #[error("attribute {0:?} unavailable on spawned mob")]
    MissingAttribute(AttributeKind),
    #[error("entity record has no identifier")]
    MissingIdentifier,
}

const MOB_ATTRIBUTES: [AttributeKind; 5] = [
    AttributeKind::MaxHealth,
    AttributeKind::MovementSpeed,
    AttributeKind::AttackDamage,
    AttributeKind::FollowRange,
    AttributeKind::Armor,
];

/// Build a mob entity with its attributes bound from configuration. Runs the
/// archetype's `on_construct` but not `on_initial_spawn`.
pub fn spawn_mob_entity(
    world: &mut World,
    type_id: &str,
    (x, y, z): (f32, f32, f32),
) -> Result<Entity, SpawnError> {
    let def = world
        .resource::<MobRegistry>()
        .get(type_id)
        .cloned()
        .ok_or_else(|| SpawnError::UnknownType(type_id.to_string()))?;
    let unique_id = world.resource_mut::<UniqueIds>().claim();
    let runtime_id = unique_id as u64;

    let mut attrs = AttributeMap::with_slots(&MOB_ATTRIBUTES);
    for (kind, value) in [
        (AttributeKind::MaxHealth, def.max_health),
        (AttributeKind::MovementSpeed, def.movement_speed),
        (AttributeKind::AttackDamage, def.attack_damage),
        (AttributeKind::FollowRange, def.follow_range),
        (AttributeKind::Armor, def.armor),
    ] {
        if let Some(slot) = attrs.get_mut(kind) {
            slot.set_base(f64::from(value));
        }
    }
    let experience = match def.archetype.tuning(world.resource::<ModConfig>()) {
        Some(tuning) => {
            tuning.apply(&mut attrs);
            tuning.base_experience
        }
        None => 5,
    };
    let max_health = attrs.value(AttributeKind::MaxHealth) as f32;

    let goals = BehaviorList::new(mob_behaviors::create_behaviors(
        def.archetype,
        &def.type_id,
        &mut world.resource_mut::<MobRng>().0,
    ));
    let mut entity = world.spawn((
        (
            EntityId {
                unique_id,
                runtime_id,
            },
            Position { x, y, z },
            Rotation {
                pitch: 0.0,
                yaw: 0.0,
                head_yaw: 0.0,
            },
            Velocity::default(),
            MoveInput::default(),
            Health {
                current: max_health,
                max: max_health,
            },
            OnGround(false),
            FallDistance::default(),
        ),
        (
            BoundingBox {
                width: def.bb_width,
                height: def.bb_height,
            },
            Mob,
            MobType(def.type_id.clone()),
            ArchetypeTag(def.archetype),
            attrs,
            Experience(experience),
            LastDamageTick(None),
            ActiveEffects::default(),
            goals,
        ),
    ));
    if def.fire_immune {
        entity.insert(FireImmune);
    }
    let entity = entity.id();

    world.resource_mut::<MobIndex>().0.insert(runtime_id, entity);
    def.archetype.hooks().on_construct(world, entity);

    push_event(
        world,
        GameEvent::MobSpawned {
            runtime_id,
            unique_id,
            mob_type: def.type_id,
            position: (x, y, z),
            health: max_health,
            max_health,
            bb_width: def.bb_width,
            bb_height: def.bb_height,
        },
    );
    Ok(entity)
}

/// Mark a mob for removal without a death. No-op if already gone.
pub fn mark_removed(world: &mut World, entity: Entity) {
    if world.get::<Dead>(entity).is_some() {
        return;
    }
    let Some(unique_id) = world.get::<EntityId>(entity).map(|e| e.unique_id) else {
        return;
    };
    world.entity_mut(entity).insert(Dead);
    push_event(world, GameEvent::EntityRemoved { unique_id });
}

/// Re-read max health from the attribute map, capping current health.
pub fn sync_max_health(world: &mut World, entity: Entity) {
    let Some(max) = world
        .get::<AttributeMap>(entity)
        .map(|a| a.value(AttributeKind::MaxHealth) as f32)
    else {
        return;
    };
    let Some(mut health) = world.get_mut::<Health>(entity) else {
        return;
    };
    health.max = max;
    health.current = health.current.min(max);
    let current = health.current;
    if let Some(runtime_id) = world.get::<EntityId>(entity).map(|e| e.runtime_id) {
        push_event(
            world,
            GameEvent::MobAttributesChanged {
                runtime_id,
                health: current,
                max_health: max,
            },
        );
    }
}

// ---------------------------------------------------------------------------
// GameWorld
// ---------------------------------------------------------------------------

/// The ECS game world.
pub struct GameWorld {
    pub world: World,
    pub spawn_config: SpawnConfig,
}

impl GameWorld {
    /// Ids are handed out from `first_id` upward.
    pub fn new(first_id: i64) -> Self {
        Self::with_seed(first_id, rand::random())
    }

    /// Same as [`GameWorld::new`] but every roll is reproducible.
    pub fn with_seed(first_id: i64, seed: u64) -> Self {
        let mut world = World::new();
        world.insert_resource(EventQueue::default());
        world.insert_resource(TickCounter::default());
        world.insert_resource(UniqueIds::starting_at(first_id));
        world.insert_resource(MobIndex::default());
        world.insert_resource(WorldClock::default());
        world.insert_resource(Difficulty::default());
        world.insert_resource(MobRng::seeded(seed));
        world.insert_resource(Terrain(BlockStore::flat(3, "minecraft:plains")));
        world.insert_resource(Biomes::default());
        world.insert_resource(ModConfig::default());
        world.insert_resource(MobRegistry::new());
        world.insert_resource(SpawnTables::default());

        let mut gw = Self {
            world,
            spawn_config: SpawnConfig::default(),
        };
        gw.register_spawns();
        gw
    }

    /// Rebuild every biome spawn table from the current configuration.
    /// Returns the number of (mob, biome) entries registered.
    pub fn register_spawns(&mut self) -> usize {
        let world = &mut self.world;
        world.resource_scope(|world: &mut World, mut tables: Mut<SpawnTables>| {
            tables.clear();
            let registry = world.resource::<MobRegistry>();
            let config = world.resource::<ModConfig>();
            let biomes = &world.resource::<Biomes>().0;
            registry
                .all()
                .iter()
                .filter_map(|def| Some((def, def.archetype.tuning(config)?)))
                .map(|(def, tuning)| tables.insert_spawns(&def.type_id, def.category, tuning, biomes))
                .sum()
        })
    }

    /// Re-sync tunables from a new raw config and rebuild spawn tables.
    /// Existing mobs keep their attributes; new spawns use the new values.
    pub fn reload_config(&mut self, raw: &RawModConfig) {
        self.world.resource_mut::<ModConfig>().reload(raw);
        self.register_spawns();
    }

    pub fn config(&self) -> &ModConfig {
        self.world.resource::<ModConfig>()
    }

    pub fn config_mut(&mut self) -> Mut<'_, ModConfig> {
        self.world.resource_mut::<ModConfig>()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        *self.world.resource_mut::<Difficulty>() = difficulty;
    }

    pub fn set_time(&mut self, time: u64) {
        self.world.resource_mut::<WorldClock>().time = time;
    }

    pub fn clock(&self) -> WorldClock {
        *self.world.resource::<WorldClock>()
    }

    pub fn terrain(&self) -> &BlockStore {
        &self.world.resource::<Terrain>().0
    }

    pub fn terrain_mut(&mut self) -> &mut BlockStore {
        &mut self.world.resource_mut::<Terrain>().into_inner().0
    }

    /// Run one game tick: AI, archetype callbacks, physics, fire, movement
    /// collection, dead cleanup, spawning.
    pub fn tick(&mut self) {
        self.world.resource_mut::<TickCounter>().0 += 1;
        {
            let mut clock = self.world.resource_mut::<WorldClock>();
            if clock.daylight_cycle {
                clock.time += 1;
            }
        }
        system_ai_tick(&mut self.world);
        system_archetype_tick(&mut self.world);
        system_status_effects(&mut self.world);
        system_mob_physics(&mut self.world);
        system_entity_push(&mut self.world);
        combat::system_burning(&mut self.world);
        system_ambient_sounds(&mut self.world);
        system_collect_mob_moves(&mut self.world);
        system_cleanup_dead(&mut self.world);
        spawning::system_natural_spawn(&mut self.world, &self.spawn_config);
        spawning::system_despawn_far_mobs(&mut self.world, &self.spawn_config);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.world.resource_mut::<EventQueue>().0)
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<TickCounter>().0
    }

    /// Spawn a mob as a fresh first spawn. Returns `(unique_id, runtime_id)`
    /// or `None` if the type is unknown.
    pub fn spawn_mob(&mut self, type_id: &str, x: f32, y: f32, z: f32) -> Option<(i64, u64)> {
        let entity = match spawn_mob_entity(&mut self.world, type_id, (x, y, z)) {
            Ok(entity) => entity,
            Err(err) => {
                debug!(%err, "spawn_mob failed");
                return None;
            }
        };
        hooks_of(&self.world, entity).on_initial_spawn(&mut self.world, entity);
        let eid = self.world.get::<EntityId>(entity)?;
        Some((eid.unique_id, eid.runtime_id))
    }

    /// Hit a mob. Returns whether the damage was applied.
    pub fn attack_mob(&mut self, runtime_id: u64, source: DamageSource, amount: f32) -> bool {
        match self.mob_entity(runtime_id) {
            Some(entity) => combat::attack_entity(&mut self.world, entity, source, amount),
            None => false,
        }
    }

    /// Apply knockback velocity to a mob. Anchored mobs ignore it.
    pub fn apply_knockback(&mut self, runtime_id: u64, vx: f32, vy: f32, vz: f32) {
        let Some(entity) = self.mob_entity(runtime_id) else {
            return;
        };
        if self.world.get::<Anchored>(entity).is_some() {
            return;
        }
        if let Some(mut vel) = self.world.get_mut::<Velocity>(entity) {
            vel.x = vx;
            vel.y = vy;
            vel.z = vz;
        }
    }

    /// A player right-clicks a mob with whatever they are holding.
    pub fn interact(&mut self, mob_runtime_id: u64, player_unique_id: i64) -> InteractionResult {
        let (Some(mob), Some(player)) = (
            self.mob_entity(mob_runtime_id),
            self.player_entity(player_unique_id),
        ) else {
            return InteractionResult::Pass;
        };
        if self.world.get::<Dead>(mob).is_some() {
            return InteractionResult::Pass;
        }
        hooks_of(&self.world, mob).on_interact(&mut self.world, mob, player)
    }

    /// Check if a runtime_id belongs to a live mob.
    pub fn is_mob(&self, runtime_id: u64) -> bool {
        self.mob_entity(runtime_id).is_some()
    }

    pub fn mob_position(&self, runtime_id: u64) -> Option<(f32, f32, f32)> {
        let pos = self.world.get::<Position>(self.mob_entity(runtime_id)?)?;
        Some((pos.x, pos.y, pos.z))
    }

    /// Despawn without death. `false` if no such mob exists.
    pub fn remove_mob(&mut self, runtime_id: u64) -> bool {
        let Some(entity) = self.mob_entity(runtime_id) else {
            return false;
        };
        let unique_id = self
            .world
            .get::<EntityId>(entity)
            .map(|e| e.unique_id)
            .unwrap_or(0);
        push_event(&mut self.world, GameEvent::EntityRemoved { unique_id });
        self.world.resource_mut::<MobIndex>().0.remove(&runtime_id);
        self.world.despawn(entity);
        true
    }

    /// Every live mob, in no particular order.
    pub fn all_mobs(&mut self) -> Vec<MobSnapshot> {
        let mut query = self.world.query_filtered::<(
            &EntityId,
            &Position,
            &Rotation,
            &Health,
            &MobType,
            &BoundingBox,
        ), (With<Mob>, Without<Dead>)>();
        query
            .iter(&self.world)
            .map(|(eid, pos, rot, health, mob_type, bb)| MobSnapshot {
                unique_id: eid.unique_id,
                runtime_id: eid.runtime_id,
                mob_type: mob_type.0.clone(),
                position: (pos.x, pos.y, pos.z),
                pitch: rot.pitch,
                yaw: rot.yaw,
                head_yaw: rot.head_yaw,
                health: health.current,
                max_health: health.max,
                bb_width: bb.width,
                bb_height: bb.height,
            })
            .collect()
    }

    /// Register a player the mobs can see, target and be tamed by.
    pub fn spawn_player(
        &mut self,
        unique_id: i64,
        runtime_id: u64,
        position: (f32, f32, f32),
        uuid: Uuid,
    ) -> Entity {
        self.world
            .spawn((
                EntityId {
                    unique_id,
                    runtime_id,
                },
                Position {
                    x: position.0,
                    y: position.1,
                    z: position.2,
                },
                Health {
                    current: 20.0,
                    max: 20.0,
                },
                AttributeMap::with_slots(&[AttributeKind::MaxHealth]).locked(),
                Player,
                PlayerProfile { uuid },
                HeldItem::empty(),
            ))
            .id()
    }

    /// Move a registered player.
    pub fn update_player_position(&mut self, unique_id: i64, x: f32, y: f32, z: f32) {
        let Some(entity) = self.player_entity(unique_id) else {
            return;
        };
        if let Some(mut pos) = self.world.get_mut::<Position>(entity) {
            pos.x = x;
            pos.y = y;
            pos.z = z;
        }
    }

    pub fn set_held_item(&mut self, unique_id: i64, item: HeldItem) {
        if let Some(entity) = self.player_entity(unique_id) {
            self.world.entity_mut(entity).insert(item);
        }
    }

    pub fn held_item(&self, unique_id: i64) -> Option<HeldItem> {
        self.world.get::<HeldItem>(self.player_entity(unique_id)?).cloned()
    }

    /// Forget a player; mobs targeting them drop the target next tick.
    pub fn despawn_player(&mut self, unique_id: i64) {
        if let Some(entity) = self.player_entity(unique_id) {
            self.world.despawn(entity);
        }
    }

    /// Find a live mob entity by runtime_id.
    pub fn mob_entity(&self, runtime_id: u64) -> Option<Entity> {
        let entity = *self.world.resource::<MobIndex>().0.get(&runtime_id)?;
        self.world.get::<Mob>(entity)?;
        Some(entity)
    }

    pub fn player_entity(&self, unique_id: i64) -> Option<Entity> {
        self.world
            .iter_entities()
            .find(|e| e.contains::<Player>() && e.get::<EntityId>().is_some_and(|id| id.unique_id == unique_id))
            .map(|e| e.id())
    }

    /// Serialize every live mob into a `Mobs` list.
    pub fn save_mobs(&mut self) -> NbtRoot {
        persistence::save_all(&mut self.world)
    }

    /// Restore mobs from a saved root. Returns how many were loaded.
    pub fn load_mobs(&mut self, root: &NbtRoot) -> usize {
        persistence::load_all(&mut self.world, root)
    }
}

// ---------------------------------------------------------------------------
// Systems (manual, called by GameWorld::tick)
// ---------------------------------------------------------------------------

fn live_mobs(world: &mut World) -> Vec<Entity> {
    world
        .query_filtered::<Entity, (With<Mob>, Without<Dead>)>()
        .iter(world)
        .collect()
}

/// Invoke each live mob's per-tick archetype callback.
fn system_archetype_tick(world: &mut World) {
    for entity in live_mobs(world) {
        // An earlier callback this tick may have removed it.
        if world.get::<Dead>(entity).is_some() {
            continue;
        }
        hooks_of(world, entity).on_tick(world, entity);
    }
}

fn system_status_effects(world: &mut World) {
    let mut query = world.query_filtered::<&mut ActiveEffects, Without<Dead>>();
    for mut effects in query.iter_mut(world) {
        if !effects.0.is_empty() {
            effects.tick();
        }
    }
}

/// Gravity, drag and ground collision against the terrain. Anchored mobs are
/// skipped entirely.
fn system_mob_physics(world: &mut World) {
    const GRAVITY: f32 = 0.08;
    const SAFE_FALL: f32 = 3.0;

    let landings: Vec<(Entity, f32)> = world.resource_scope(|world: &mut World, terrain: Mut<Terrain>| {
        let mut landings = Vec::new();
        let mut query = world.query_filtered::<(
            Entity,
            &mut Position,
            &mut Velocity,
            &mut OnGround,
            &mut FallDistance,
        ), (With<Mob>, Without<Dead>, Without<Anchored>)>();

        for (entity, mut pos, mut vel, mut on_ground, mut fall) in query.iter_mut(world) {
            vel.y -= GRAVITY;
            vel.y *= 0.98; // air drag

            let prev_y = pos.y;
            pos.x += vel.x;
            pos.y += vel.y;
            pos.z += vel.z;

            vel.x *= 0.91;
            vel.z *= 0.91;

            let feet = BlockPos::containing(pos.x, pos.y, pos.z);
            let block = terrain.0.block(feet);
            if block.is_top_solid() {
                pos.y = (feet.y + 1) as f32;
                vel.y = 0.0;
                on_ground.0 = true;
                if fall.0 > SAFE_FALL {
                    landings.push((entity, fall.0));
                }
                fall.0 = 0.0;
            } else {
                on_ground.0 = false;
                if block.is_liquid() {
                    fall.0 = 0.0;
                } else if pos.y < prev_y {
                    fall.0 += prev_y - pos.y;
                }
            }
        }
        landings
    });

    for (entity, distance) in landings {
        let hooks = hooks_of(world, entity);
        if let (Some(sound), Some(runtime_id)) = (
            hooks.sound(world, entity, SoundKind::Land),
            world.get::<EntityId>(entity).map(|e| e.runtime_id),
        ) {
            push_event(world, GameEvent::MobSound { runtime_id, sound });
        }
        if hooks.takes_fall_damage() {
            let damage = (distance - SAFE_FALL).ceil();
            combat::attack_entity(world, entity, DamageSource::fall(), damage);
        }
    }
}

/// Push overlapping mobs apart. Anchored mobs neither push nor get pushed.
fn system_entity_push(world: &mut World) {
    const PUSH: f32 = 0.05;

    let bodies: Vec<(Entity, Position, BoundingBox)> = world
        .query_filtered::<(Entity, &Position, &BoundingBox), (With<Mob>, Without<Dead>, Without<Anchored>)>()
        .iter(world)
        .map(|(e, p, b)| (e, *p, *b))
        .collect();

    let mut pushes: Vec<(Entity, f32, f32)> = Vec::new();
    for (i, (a, pa, ba)) in bodies.iter().enumerate() {
        for (b, pb, bb) in &bodies[i + 1..] {
            let reach = (ba.width + bb.width) / 2.0;
            let (dx, dz) = (pb.x - pa.x, pb.z - pa.z);
            let dist = (dx * dx + dz * dz).sqrt();
            if dist >= reach || (pb.y - pa.y).abs() >= ba.height.max(bb.height) {
                continue;
            }
            let (nx, nz) = if dist < 0.01 { (1.0, 0.0) } else { (dx / dist, dz / dist) };
            pushes.push((*a, -nx * PUSH, -nz * PUSH));
            pushes.push((*b, nx * PUSH, nz * PUSH));
        }
    }

    for (entity, px, pz) in pushes {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.x += px;
            vel.z += pz;
        }
    }
}

/// Roughly one ambient sound per mob every few seconds.
fn system_ambient_sounds(world: &mut World) {
    const ONE_IN: u32 = 120;

    for entity in live_mobs(world) {
        let Some(sound) = hooks_of(world, entity).sound(world, entity, SoundKind::Ambient) else {
            continue;
        };
        if world.resource_mut::<MobRng>().0.gen_range(0..ONE_IN) != 0 {
            continue;
        }
        if let Some(runtime_id) = world.get::<EntityId>(entity).map(|e| e.runtime_id) {
            push_event(world, GameEvent::MobSound { runtime_id, sound });
        }
    }
}

/// One `MobMoved` per mob that still has velocity.
fn system_collect_mob_moves(world: &mut World) {
    let mut query = world
        .query_filtered::<(&EntityId, &Position, &Rotation, &Velocity, &OnGround), (With<Mob>, Without<Dead>)>();

    let moves: Vec<GameEvent> = query
        .iter(world)
        .filter(|(_, _, _, vel, _)| vel.x.abs() > 0.001 || vel.y.abs() > 0.001 || vel.z.abs() > 0.001)
        .map(|(eid, pos, rot, _, on_ground)| GameEvent::MobMoved {
            runtime_id: eid.runtime_id,
            position: (pos.x, pos.y, pos.z),
            pitch: rot.pitch,
            yaw: rot.yaw,
            head_yaw: rot.head_yaw,
            on_ground: on_ground.0,
        })
        .collect();

    world.resource_mut::<EventQueue>().0.extend(moves);
}

/// Despawn mobs killed earlier in this tick.
fn system_cleanup_dead(world: &mut World) {
    let dead: Vec<(Entity, Option<u64>)> = world
        .query_filtered::<(Entity, Option<&EntityId>), With<Dead>>()
        .iter(world)
        .map(|(e, eid)| (e, eid.map(|id| id.runtime_id)))
        .collect();
    for (entity, runtime_id) in dead {
        if let Some(rid) = runtime_id {
            world.resource_mut::<MobIndex>().0.remove(&rid);
        }
        world.despawn(entity);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
