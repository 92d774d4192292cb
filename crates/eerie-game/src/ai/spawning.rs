//! Natural spawning around players, biome tables and light rules included,
//! plus despawning of wild mobs nobody is near.

use bevy_ecs::prelude::*;
use eerie_world::{BlockPos, BlockView, MIN_Y};
use rand::Rng;
use tracing::{debug, warn};

use crate::components::*;
use crate::config::ModConfig;
use crate::game_world::{push_event, spawn_mob_entity, Difficulty, GameEvent, MobIndex, MobRng, Terrain, TickCounter, WorldClock};
use crate::hooks::hooks_of;
use crate::mob_registry::{MobCategory, MobRegistry};
use crate::spawn_table::SpawnTables;

/// Highest light level hostile mobs spawn in.
pub const MAX_HOSTILE_SPAWN_LIGHT: u8 = 7;

/// Per-chunk cap for mobs without a configured one.
const DEFAULT_MAX_IN_CHUNK: u32 = 4;

/// How far a pack scatters around its leader, per axis.
const PACK_SPREAD: i32 = 2;

/// World-wide spawning knobs. Distances are horizontal, in blocks.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    pub hostile_cap: u32,
    pub passive_cap: u32,
    /// Spawn ring around a player: never closer than `min_distance`.
    pub min_distance: f32,
    pub max_distance: f32,
    pub spawn_interval: u64,
    pub despawn_interval: u64,
    /// Wild mobs farther than this from every player are removed.
    pub despawn_distance: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            hostile_cap: 20,
            passive_cap: 10,
            min_distance: 24.0,
            max_distance: 128.0,
            spawn_interval: 100,
            despawn_interval: 200,
            despawn_distance: 128.0,
        }
    }
}

/// Topmost spot at or below `start_y` where a mob can stand: a top-solid
/// block with two air blocks above it. Returns the solid block.
pub fn find_spawn_ground(view: &impl BlockView, x: i32, z: i32, start_y: i32) -> Option<BlockPos> {
    let floor = (start_y - 64).max(MIN_Y);
    (floor..=start_y).rev().map(|y| BlockPos::new(x, y, z)).find(|&pos| {
        view.block(pos).is_top_solid() && view.is_air(pos.up(1)) && view.is_air(pos.up(2))
    })
}

/// A spawn decided during planning, executed once the world is free.
struct PlannedSpawn {
    mob: String,
    position: (f32, f32, f32),
}

/// Periodically spawn mobs near players from the biome spawn tables.
pub fn system_natural_spawn(world: &mut World, config: &SpawnConfig) {
    let tick = world.resource::<TickCounter>().0;
    if !tick.is_multiple_of(config.spawn_interval) || tick == 0 {
        return;
    }

    let player_positions: Vec<(f32, f32, f32)> = world
        .query_filtered::<&Position, (With<Player>, Without<Dead>)>()
        .iter(world)
        .map(|p| (p.x, p.y, p.z))
        .collect();
    if player_positions.is_empty() {
        return;
    }

    let (hostile_count, passive_count) = count_mobs_by_category(world);
    let peaceful = *world.resource::<Difficulty>() == Difficulty::Peaceful;

    let mut categories = Vec::new();
    if hostile_count < config.hostile_cap && !peaceful {
        categories.push(MobCategory::Hostile);
    }
    if passive_count < config.passive_cap {
        categories.push(MobCategory::Passive);
    }

    let mut chunk_counts = mobs_per_chunk(world);
    let planned: Vec<PlannedSpawn> = world.resource_scope(|world: &mut World, mut rng: Mut<MobRng>| {
        let mut planned = Vec::new();
        for category in categories {
            let player = player_positions[rng.0.gen_range(0..player_positions.len())];
            planned.extend(plan_pack(world, &mut rng, &mut chunk_counts, category, player, config));
        }
        planned
    });

    for spawn in planned {
        match spawn_mob_entity(world, &spawn.mob, spawn.position) {
            Ok(entity) => hooks_of(world, entity).on_initial_spawn(world, entity),
            Err(err) => warn!(%err, mob = %spawn.mob, "natural spawn failed"),
        }
    }
}

/// Choose a column around `player`, roll the biome table and lay out a pack.
fn plan_pack(
    world: &World,
    rng: &mut MobRng,
    chunk_counts: &mut Vec<((i32, i32), String, u32)>,
    category: MobCategory,
    player: (f32, f32, f32),
    config: &SpawnConfig,
) -> Vec<PlannedSpawn> {
    let terrain = &world.resource::<Terrain>().0;
    let (x, z) = random_spawn_position(&mut rng.0, player.0, player.2, config.min_distance, config.max_distance);
    let (bx, bz) = (x.floor() as i32, z.floor() as i32);
    let Some(leader) = find_spawn_ground(terrain, bx, bz, player.1 as i32 + 16) else {
        return Vec::new();
    };

    let biome = terrain.biome(bx, bz);
    let Some(entry) = world.resource::<SpawnTables>().pick(biome, category, &mut rng.0).cloned() else {
        return Vec::new();
    };
    let Some(def) = world.resource::<MobRegistry>().get(&entry.mob) else {
        return Vec::new();
    };
    let needs_darkness = category == MobCategory::Hostile && !def.archetype.hooks().ignores_light();
    let max_in_chunk = def
        .archetype
        .tuning(world.resource::<ModConfig>())
        .map_or(DEFAULT_MAX_IN_CHUNK, |t| t.max_in_chunk);
    let darkening = world.resource::<WorldClock>().sky_darkening();

    let pack = rng.0.gen_range(entry.min_pack..=entry.max_pack);
    let mut planned = Vec::new();
    for _ in 0..pack {
        let column = leader.offset(
            rng.0.gen_range(-PACK_SPREAD..=PACK_SPREAD),
            0,
            rng.0.gen_range(-PACK_SPREAD..=PACK_SPREAD),
        );
        let Some(ground) = find_spawn_ground(terrain, column.x, column.z, leader.y + 4) else {
            continue;
        };
        if needs_darkness && terrain.light(ground.up(1), darkening) > MAX_HOSTILE_SPAWN_LIGHT {
            continue;
        }

        let chunk = ground.chunk();
        let idx = match chunk_counts.iter().position(|(c, m, _)| *c == chunk && *m == entry.mob) {
            Some(idx) => idx,
            None => {
                chunk_counts.push((chunk, entry.mob.clone(), 0));
                chunk_counts.len() - 1
            }
        };
        let count = &mut chunk_counts[idx].2;
        if *count >= max_in_chunk {
            debug!(mob = %entry.mob, ?chunk, "chunk cap reached");
            break;
        }
        *count += 1;

        planned.push(PlannedSpawn {
            mob: entry.mob.clone(),
            position: ground.up(1).bottom_center(),
        });
    }
    planned
}

/// Remove wild mobs that no player is near. Owned mobs always stay.
pub fn system_despawn_far_mobs(world: &mut World, config: &SpawnConfig) {
    let tick = world.resource::<TickCounter>().0;
    if tick == 0 || tick % config.despawn_interval != 0 {
        return;
    }

    let players: Vec<(f32, f32)> = world
        .query_filtered::<&Position, (With<Player>, Without<Dead>)>()
        .iter(world)
        .map(|p| (p.x, p.z))
        .collect();
    if players.is_empty() {
        return;
    }

    let limit = config.despawn_distance * config.despawn_distance;
    let alone = |x: f32, z: f32| {
        players
            .iter()
            .all(|&(px, pz)| (x - px).powi(2) + (z - pz).powi(2) > limit)
    };
    let mut query = world.query_filtered::<(Entity, &EntityId, &Position), (With<Mob>, Without<Dead>)>();
    let w = &*world;
    let far: Vec<(Entity, i64, u64)> = query
        .iter(w)
        .filter(|(_, _, pos)| alone(pos.x, pos.z))
        .filter(|(entity, _, _)| hooks_of(w, *entity).owner(w, *entity).is_none())
        .map(|(entity, id, _)| (entity, id.unique_id, id.runtime_id))
        .collect();

    for (entity, unique_id, runtime_id) in far {
        world.resource_mut::<MobIndex>().0.remove(&runtime_id);
        push_event(world, GameEvent::EntityRemoved { unique_id });
        world.despawn(entity);
    }
}

/// Live (hostile, passive) totals.
fn count_mobs_by_category(world: &mut World) -> (u32, u32) {
    let mut query = world.query_filtered::<&MobType, (With<Mob>, Without<Dead>)>();
    let registry = world.resource::<MobRegistry>();
    let mut hostile = 0u32;
    let mut passive = 0u32;
    for mob_type in query.iter(world) {
        match registry.get(&mob_type.0).map(|d| d.category) {
            Some(MobCategory::Hostile) => hostile += 1,
            Some(MobCategory::Passive) => passive += 1,
            None => {}
        }
    }
    (hostile, passive)
}

/// Live mob counts keyed by (chunk, type).
fn mobs_per_chunk(world: &mut World) -> Vec<((i32, i32), String, u32)> {
    let mut counts: Vec<((i32, i32), String, u32)> = Vec::new();
    let mut query = world.query_filtered::<(&Position, &MobType), (With<Mob>, Without<Dead>)>();
    for (pos, mob_type) in query.iter(world) {
        let chunk = BlockPos::containing(pos.x, pos.y, pos.z).chunk();
        match counts.iter_mut().find(|(c, m, _)| *c == chunk && *m == mob_type.0) {
            Some((_, _, n)) => *n += 1,
            None => counts.push((chunk, mob_type.0.clone(), 1)),
        }
    }
    counts
}

/// Random point on the spawn ring around a player.
fn random_spawn_position(rng: &mut impl Rng, player_x: f32, player_z: f32, min_dist: f32, max_dist: f32) -> (f32, f32) {
    let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let dist: f32 = if max_dist > min_dist {
        rng.gen_range(min_dist..max_dist)
    } else {
        min_dist
    };
    (player_x + angle.cos() * dist, player_z + angle.sin() * dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_world::GameWorld;
    use eerie_world::{BlockState, BlockStore};
    use uuid::Uuid;

    fn dark_forest_world() -> GameWorld {
        let mut gw = GameWorld::with_seed(1, 11);
        gw.terrain_mut().fill_biome((-64, -64), (64, 64), "minecraft:dark_forest");
        gw.spawn_player(50, 50, (0.5, 4.0, 0.5), Uuid::from_u128(50));
        gw.drain_events();
        gw
    }

    fn close_range() -> SpawnConfig {
        SpawnConfig {
            spawn_interval: 1,
            min_distance: 8.0,
            max_distance: 24.0,
            ..Default::default()
        }
    }

    fn spawned_types(gw: &mut GameWorld) -> Vec<String> {
        gw.all_mobs().into_iter().map(|m| m.mob_type).collect()
    }

    #[test]
    fn ground_needs_headroom() {
        let mut store = BlockStore::flat(3, "minecraft:plains");
        assert_eq!(find_spawn_ground(&store, 0, 0, 20), Some(BlockPos::new(0, 3, 0)));
        store.set_block(BlockPos::new(0, 5, 0), BlockState::solid("minecraft:stone"));
        assert_eq!(find_spawn_ground(&store, 0, 0, 20), Some(BlockPos::new(0, 5, 0)));
        store.set_block(BlockPos::new(0, 7, 0), BlockState::solid("minecraft:stone"));
        // 5 has only one air block above now
        assert_eq!(find_spawn_ground(&store, 0, 0, 20), Some(BlockPos::new(0, 7, 0)));
        store.set_block(BlockPos::new(0, 8, 0), BlockState::water());
        // 7 is capped by water, 5 and 3 each have a single air block.
        assert_eq!(find_spawn_ground(&store, 0, 0, 20), None);
        store.set_block(BlockPos::new(0, 5, 0), BlockState::air());
        assert_eq!(find_spawn_ground(&store, 0, 0, 20), Some(BlockPos::new(0, 3, 0)));
    }

    #[test]
    fn night_spawns_from_biome_table() {
        let mut gw = dark_forest_world();
        let config = close_range();
        for _ in 0..20 {
            gw.world.resource_mut::<TickCounter>().0 += 1;
            system_natural_spawn(&mut gw.world, &config);
        }
        let types = spawned_types(&mut gw);
        assert!(!types.is_empty());
        assert!(types.iter().all(|t| t == "eerie:pumpkin_slime"), "{types:?}");
    }

    #[test]
    fn daylight_blocks_hostile_spawns() {
        let mut gw = dark_forest_world();
        gw.set_time(6_000);
        let config = close_range();
        for _ in 0..20 {
            gw.world.resource_mut::<TickCounter>().0 += 1;
            system_natural_spawn(&mut gw.world, &config);
        }
        assert!(spawned_types(&mut gw).is_empty());
    }

    #[test]
    fn nether_knights_ignore_light() {
        let mut gw = GameWorld::with_seed(1, 5);
        gw.terrain_mut().fill_biome((-64, -64), (64, 64), "minecraft:nether_wastes");
        gw.spawn_player(50, 50, (0.5, 4.0, 0.5), Uuid::from_u128(50));
        gw.set_time(6_000);
        let config = close_range();
        for _ in 0..20 {
            gw.world.resource_mut::<TickCounter>().0 += 1;
            system_natural_spawn(&mut gw.world, &config);
        }
        let types = spawned_types(&mut gw);
        assert!(types.iter().any(|t| t == "eerie:nether_knight"), "{types:?}");
    }

    #[test]
    fn respects_chunk_cap() {
        let mut gw = dark_forest_world();
        gw.config_mut().pumpkin_slime.mob.max_in_chunk = 1;
        let config = SpawnConfig {
            hostile_cap: 100,
            ..close_range()
        };
        for _ in 0..60 {
            gw.world.resource_mut::<TickCounter>().0 += 1;
            system_natural_spawn(&mut gw.world, &config);
        }
        let mut chunks: Vec<(i32, i32)> = gw
            .all_mobs()
            .iter()
            .map(|m| BlockPos::containing(m.position.0, m.position.1, m.position.2).chunk())
            .collect();
        let total = chunks.len();
        chunks.sort_unstable();
        chunks.dedup();
        assert_eq!(chunks.len(), total);
    }

    #[test]
    fn peaceful_skips_hostiles() {
        let mut gw = dark_forest_world();
        gw.set_difficulty(Difficulty::Peaceful);
        let config = close_range();
        for _ in 0..20 {
            gw.world.resource_mut::<TickCounter>().0 += 1;
            system_natural_spawn(&mut gw.world, &config);
        }
        assert!(spawned_types(&mut gw).is_empty());
    }

    #[test]
    fn no_spawn_without_players() {
        let mut gw = GameWorld::with_seed(1, 11);
        gw.terrain_mut().fill_biome((-64, -64), (64, 64), "minecraft:dark_forest");
        gw.world.resource_mut::<TickCounter>().0 = 10;
        system_natural_spawn(&mut gw.world, &close_range());
        assert!(gw.all_mobs().is_empty());
    }

    #[test]
    fn despawn_far_mobs() {
        let mut gw = GameWorld::with_seed(1, 11);
        gw.spawn_player(50, 50, (0.0, 4.0, 0.0), Uuid::from_u128(50));
        gw.spawn_mob("minecraft:cow", 500.0, 4.0, 500.0).unwrap();
        gw.spawn_mob("minecraft:cow", 10.0, 4.0, 10.0).unwrap();
        gw.drain_events();

        let config = SpawnConfig {
            despawn_interval: 1,
            ..Default::default()
        };
        gw.world.resource_mut::<TickCounter>().0 = 1;
        system_despawn_far_mobs(&mut gw.world, &config);

        assert_eq!(gw.all_mobs().len(), 1);
        assert!(gw
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::EntityRemoved { .. })));
    }
}
