//! Entity records: one NBT compound per mob, collected under a `Mobs` list.

use bevy_ecs::prelude::*;
use eerie_nbt::{CompoundExt, NbtCompound, NbtRoot, NbtTag};
use tracing::{debug, warn};

use crate::attributes::{AttributeKind, AttributeMap, AttributeModifier, ModifierOp};
use crate::components::*;
use crate::game_world::{spawn_mob_entity, sync_max_health, SpawnError};
use crate::hooks::hooks_of;

pub const MOBS_KEY: &str = "Mobs";
pub const ATTRIBUTES_KEY: &str = "Attributes";

fn float_list(values: &[f32]) -> NbtTag {
    NbtTag::List(values.iter().copied().map(NbtTag::Float).collect())
}

fn read_floats<const N: usize>(nbt: &NbtCompound, key: &str) -> Option<[f32; N]> {
    let list = nbt.get(key)?.as_list()?;
    if list.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, tag) in out.iter_mut().zip(list) {
        *slot = tag.as_float()?;
    }
    Some(out)
}

/// Only modifiers are saved; base values come back from the mob's tuning.
fn write_modifiers(attrs: &AttributeMap) -> NbtTag {
    let slots = attrs
        .iter()
        .filter(|(_, inst)| !inst.modifiers().is_empty())
        .map(|(kind, inst)| {
            let modifiers = inst
                .modifiers()
                .iter()
                .map(|m| {
                    let mut nbt = NbtCompound::new();
                    nbt.put_str("Name", &m.name);
                    nbt.put_uuid("UUID", m.id);
                    nbt.put_double("Amount", m.amount);
                    nbt.put_int("Operation", m.op.id());
                    NbtTag::Compound(nbt)
                })
                .collect();
            let mut slot = NbtCompound::new();
            slot.put_str("Name", kind.key());
            slot.insert("Modifiers".into(), NbtTag::List(modifiers));
            NbtTag::Compound(slot)
        })
        .collect();
    NbtTag::List(slots)
}

fn read_modifier(nbt: &NbtCompound) -> Option<AttributeModifier> {
    Some(AttributeModifier {
        id: nbt.get_uuid("UUID")?,
        name: nbt.get_str("Name").to_string(),
        amount: nbt.get_double("Amount"),
        op: ModifierOp::from_id(nbt.get_int("Operation"))?,
    })
}

fn read_modifiers(world: &mut World, entity: Entity, nbt: &NbtCompound) {
    let Some(slots) = nbt.get(ATTRIBUTES_KEY).and_then(NbtTag::as_list) else {
        return;
    };
    let Some(mut attrs) = world.get_mut::<AttributeMap>(entity) else {
        return;
    };
    for slot in slots.iter().filter_map(NbtTag::as_compound) {
        let Some(kind) = AttributeKind::from_key(slot.get_str("Name")) else {
            debug!(name = slot.get_str("Name"), "unknown saved attribute");
            continue;
        };
        let Some(inst) = attrs.register(kind) else {
            continue;
        };
        let modifiers = slot.get("Modifiers").and_then(NbtTag::as_list).unwrap_or_default();
        for modifier in modifiers.iter().filter_map(NbtTag::as_compound).filter_map(read_modifier) {
            inst.apply_modifier(modifier);
        }
    }
}

/// Serialize one mob: common keys, then whatever its archetype adds.
pub fn save_entity(world: &World, entity: Entity) -> Option<NbtCompound> {
    let mob_type = world.get::<MobType>(entity)?;
    let pos = world.get::<Position>(entity)?;

    let mut nbt = NbtCompound::new();
    nbt.put_str("identifier", &mob_type.0);
    nbt.insert("Pos".into(), float_list(&[pos.x, pos.y, pos.z]));
    if let Some(rot) = world.get::<Rotation>(entity) {
        nbt.insert("Rotation".into(), float_list(&[rot.yaw, rot.pitch]));
    }
    if let Some(health) = world.get::<Health>(entity) {
        nbt.put_float("Health", health.current);
    }
    if let Some(attrs) = world.get::<AttributeMap>(entity) {
        nbt.insert(ATTRIBUTES_KEY.into(), write_modifiers(attrs));
    }
    hooks_of(world, entity).write_nbt(world, entity, &mut nbt);
    Some(nbt)
}

/// Rebuild a mob from its record. `on_initial_spawn` is not run.
pub fn load_entity(world: &mut World, nbt: &NbtCompound) -> Result<Entity, SpawnError> {
    let type_id = nbt.get_str("identifier");
    if type_id.is_empty() {
        return Err(SpawnError::MissingIdentifier);
    }
    let [x, y, z] = read_floats::<3>(nbt, "Pos").unwrap_or_default();
    let entity = spawn_mob_entity(world, type_id, (x, y, z))?;

    if let Some([yaw, pitch]) = read_floats::<2>(nbt, "Rotation") {
        if let Some(mut rot) = world.get_mut::<Rotation>(entity) {
            rot.yaw = yaw;
            rot.head_yaw = yaw;
            rot.pitch = pitch;
        }
    }
    read_modifiers(world, entity, nbt);
    sync_max_health(world, entity);
    // An absent or non-positive health keeps the freshly spawned value.
    let saved_health = nbt.get_float("Health");
    if saved_health > 0.0 {
        if let Some(mut health) = world.get_mut::<Health>(entity) {
            health.current = saved_health.min(health.max);
        }
    }

    hooks_of(world, entity).read_nbt(world, entity, nbt);
    Ok(entity)
}

/// Every live mob under a nameless root.
pub fn save_all(world: &mut World) -> NbtRoot {
    let mobs: Vec<Entity> = world
        .query_filtered::<Entity, (With<Mob>, Without<Dead>)>()
        .iter(world)
        .collect();
    let records: Vec<NbtTag> = mobs
        .into_iter()
        .filter_map(|entity| save_entity(world, entity))
        .map(NbtTag::Compound)
        .collect();
    debug!(count = records.len(), "saved mobs");

    let mut compound = NbtCompound::new();
    compound.insert(MOBS_KEY.into(), NbtTag::List(records));
    NbtRoot::new("", compound)
}

/// Restore every record in `root`. Bad records are skipped with a warning.
pub fn load_all(world: &mut World, root: &NbtRoot) -> usize {
    let Some(records) = root.compound.get(MOBS_KEY).and_then(NbtTag::as_list) else {
        return 0;
    };
    let mut loaded = 0;
    for record in records {
        let Some(nbt) = record.as_compound() else {
            warn!("skipping non-compound mob record");
            continue;
        };
        match load_entity(world, nbt) {
            Ok(_) => loaded += 1,
            Err(err) => warn!(%err, "skipping mob record"),
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::nether_knight::NetherKnight;
    use crate::game_world::GameWorld;

    #[test]
    fn common_keys_roundtrip() {
        let mut gw = GameWorld::with_seed(1, 9);
        let (_, rid) = gw.spawn_mob("minecraft:zombie", 3.5, 4.0, -2.5).unwrap();
        let e = gw.mob_entity(rid).unwrap();
        gw.world.get_mut::<Rotation>(e).unwrap().yaw = 135.0;
        gw.world.get_mut::<Health>(e).unwrap().current = 7.0;

        let root = gw.save_mobs();
        let mut restored = GameWorld::with_seed(1000, 9);
        assert_eq!(restored.load_mobs(&root), 1);

        let snap = &restored.all_mobs()[0];
        assert_eq!(snap.mob_type, "minecraft:zombie");
        assert_eq!(snap.position, (3.5, 4.0, -2.5));
        assert_eq!(snap.yaw, 135.0);
        assert_eq!(snap.health, 7.0);
    }

    #[test]
    fn reinforcement_buffs_survive_reload() {
        use crate::entities::nether_knight::spawn_reinforcement;
        use eerie_world::BlockPos;

        let mut gw = GameWorld::with_seed(1, 9);
        gw.config_mut().nether_knight.reinforcements = vec!["minecraft:zombie".into()];
        gw.config_mut().nether_knight.bonus_armor = 4.0;
        gw.config_mut().nether_knight.bonus_health = 10.0;
        let player = gw.spawn_player(50, 50, (0.0, 4.0, 0.0), uuid::Uuid::from_u128(50));
        let target = AiTarget {
            entity: player,
            runtime_id: 50,
        };
        let zombie = spawn_reinforcement(&mut gw.world, BlockPos::new(2, 3, 2), 4.0, target).unwrap();
        let attrs = gw.world.get::<AttributeMap>(zombie).unwrap();
        let before = (
            gw.world.get::<Health>(zombie).unwrap().current,
            attrs.value(AttributeKind::Armor),
        );

        let root = gw.save_mobs();
        let mut restored = GameWorld::with_seed(1000, 9);
        assert_eq!(restored.load_mobs(&root), 1);
        let runtime_id = restored.all_mobs()[0].runtime_id;
        let e = restored.mob_entity(runtime_id).unwrap();
        let attrs = restored.world.get::<AttributeMap>(e).unwrap();
        let health = restored.world.get::<Health>(e).unwrap();
        assert_eq!((health.current, attrs.value(AttributeKind::Armor)), before);
        assert_eq!(health.max, 30.0);
        assert_eq!(attrs.get(AttributeKind::MaxHealth).unwrap().modifiers().len(), 1);
    }

    #[test]
    fn unknown_saved_attributes_are_ignored() {
        let mut slot = NbtCompound::new();
        slot.put_str("Name", "minecraft:luck");
        slot.insert("Modifiers".into(), NbtTag::List(vec![]));
        let mut record = NbtCompound::new();
        record.put_str("identifier", "minecraft:cow");
        record.insert(ATTRIBUTES_KEY.into(), NbtTag::List(vec![NbtTag::Compound(slot)]));

        let mut gw = GameWorld::with_seed(1, 9);
        let e = load_entity(&mut gw.world, &record).unwrap();
        assert_eq!(gw.world.get::<Health>(e).unwrap().max, 10.0);
    }

    #[test]
    fn dead_mobs_are_not_saved() {
        let mut gw = GameWorld::with_seed(1, 9);
        let (_, rid) = gw.spawn_mob("minecraft:cow", 0.0, 4.0, 0.0).unwrap();
        gw.spawn_mob("minecraft:cow", 2.0, 4.0, 0.0).unwrap();
        let e = gw.mob_entity(rid).unwrap();
        gw.world.entity_mut(e).insert(Dead);

        let root = gw.save_mobs();
        let list = root.compound.get(MOBS_KEY).and_then(NbtTag::as_list).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn bad_records_are_skipped() {
        let mut good = NbtCompound::new();
        good.put_str("identifier", "eerie:nether_knight");
        good.put_int("RuneWord", 2);
        let mut unknown = NbtCompound::new();
        unknown.put_str("identifier", "minecraft:ender_dragon");
        let nameless = NbtCompound::new();

        let mut compound = NbtCompound::new();
        compound.insert(
            MOBS_KEY.into(),
            NbtTag::List(vec![
                NbtTag::Compound(good),
                NbtTag::Compound(unknown),
                NbtTag::Compound(nameless),
                NbtTag::Int(3),
            ]),
        );

        let mut gw = GameWorld::with_seed(1, 9);
        assert_eq!(gw.load_mobs(&NbtRoot::new("", compound)), 1);
        let mobs = gw.all_mobs();
        let e = gw.mob_entity(mobs[0].runtime_id).unwrap();
        assert_eq!(gw.world.get::<NetherKnight>(e).unwrap().word(), "GEGY");
        // Missing Pos falls back to the origin.
        assert_eq!(mobs[0].position, (0.0, 0.0, 0.0));
    }

    #[test]
    fn missing_list_loads_nothing() {
        let mut gw = GameWorld::with_seed(1, 9);
        assert_eq!(gw.load_mobs(&NbtRoot::new("", NbtCompound::new())), 0);
    }
}
