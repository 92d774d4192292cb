//! Per-biome natural spawn tables.

use std::collections::{BTreeSet, HashMap};

use bevy_ecs::prelude::*;
use eerie_world::{BiomeCategory, BiomeRegistry};
use rand::Rng;
use tracing::{debug, info};

use crate::config::{BiomeSelector, MobTuning};
use crate::mob_registry::MobCategory;

/// One weighted entry in a biome's spawn list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnEntry {
    pub mob: String,
    pub weight: u32,
    pub min_pack: u32,
    pub max_pack: u32,
}

/// Spawn lists keyed by biome id, then by mob category.
#[derive(Resource, Debug, Default)]
pub struct SpawnTables {
    tables: HashMap<String, HashMap<MobCategory, Vec<SpawnEntry>>>,
}

/// Resolve selectors into the set of concrete biome ids they name.
/// Unknown biome ids and tags are dropped.
pub fn resolve_biomes(selectors: &[BiomeSelector], registry: &BiomeRegistry) -> BTreeSet<String> {
    let mut resolved = BTreeSet::new();
    for selector in selectors {
        match selector {
            BiomeSelector::Biome(id) => match registry.get(id) {
                Some(def) => {
                    resolved.insert(def.id.clone());
                }
                None => debug!(biome = %id, "unknown biome id, dropped"),
            },
            BiomeSelector::Category(tag) => match BiomeCategory::from_name(tag) {
                Some(category) => {
                    resolved.extend(registry.in_category(category).map(|b| b.id.clone()));
                }
                None => debug!(tag = %tag, "unknown biome category, dropped"),
            },
        }
    }
    resolved
}

impl SpawnTables {
    /// Register `mob_id` in every biome its tuning selects. Does nothing when
    /// the spawn weight is zero or no selectors are configured. Returns the
    /// number of biomes the mob was added to.
    pub fn insert_spawns(
        &mut self,
        mob_id: &str,
        category: MobCategory,
        tuning: &MobTuning,
        registry: &BiomeRegistry,
    ) -> usize {
        if tuning.spawn_weight == 0 || tuning.biomes.is_empty() {
            return 0;
        }

        let biomes = resolve_biomes(&tuning.biomes, registry);
        for biome in &biomes {
            self.tables
                .entry(biome.clone())
                .or_default()
                .entry(category)
                .or_default()
                .push(SpawnEntry {
                    mob: mob_id.to_string(),
                    weight: tuning.spawn_weight,
                    min_pack: tuning.min_pack_size,
                    max_pack: tuning.max_pack_size,
                });
        }
        info!(mob = mob_id, biomes = biomes.len(), weight = tuning.spawn_weight, "registered natural spawns");
        biomes.len()
    }

    pub fn entries(&self, biome: &str, category: MobCategory) -> &[SpawnEntry] {
        self.tables
            .get(biome)
            .and_then(|t| t.get(&category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Weighted random pick from a biome's list.
    pub fn pick(&self, biome: &str, category: MobCategory, rng: &mut impl Rng) -> Option<&SpawnEntry> {
        let entries = self.entries(biome, category);
        let total: u32 = entries.iter().map(|e| e.weight).sum();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for entry in entries {
            if roll < entry.weight {
                return Some(entry);
            }
            roll -= entry.weight;
        }
        None
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tuning_with(biomes: &[&str], weight: u32) -> MobTuning {
        let mut tuning = ModConfig::default().pumpkin_slime.mob;
        tuning.biomes = biomes.iter().filter_map(|s| BiomeSelector::parse(s)).collect();
        tuning.spawn_weight = weight;
        tuning
    }

    #[test]
    fn overlapping_selectors_register_once() {
        let registry = BiomeRegistry::vanilla();
        let mut tables = SpawnTables::default();
        let tuning = tuning_with(&["minecraft:dark_forest", "type=SPOOKY", "type=FOREST"], 20);
        tables.insert_spawns("eerie:pumpkin_slime", MobCategory::Hostile, &tuning, &registry);

        let entries = tables.entries("minecraft:dark_forest", MobCategory::Hostile);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].weight, 20);
    }

    #[test]
    fn category_expands_to_members() {
        let registry = BiomeRegistry::vanilla();
        let mut tables = SpawnTables::default();
        let tuning = tuning_with(&["type=nether"], 5);
        let count = tables.insert_spawns("eerie:nether_knight", MobCategory::Hostile, &tuning, &registry);
        assert_eq!(count, 4);
        assert!(tables.entries("minecraft:plains", MobCategory::Hostile).is_empty());
    }

    #[test]
    fn unknown_selectors_dropped() {
        let registry = BiomeRegistry::vanilla();
        let resolved = resolve_biomes(
            &[
                BiomeSelector::Biome("minecraft:moon".into()),
                BiomeSelector::Category("VOLCANIC".into()),
                BiomeSelector::Biome("minecraft:swamp".into()),
            ],
            &registry,
        );
        assert_eq!(resolved.into_iter().collect::<Vec<_>>(), vec!["minecraft:swamp".to_string()]);
    }

    #[test]
    fn zero_weight_or_empty_list_skipped() {
        let registry = BiomeRegistry::vanilla();
        let mut tables = SpawnTables::default();
        assert_eq!(
            tables.insert_spawns("a", MobCategory::Hostile, &tuning_with(&["type=FOREST"], 0), &registry),
            0
        );
        assert_eq!(
            tables.insert_spawns("b", MobCategory::Hostile, &tuning_with(&[], 10), &registry),
            0
        );
        assert!(tables.entries("minecraft:forest", MobCategory::Hostile).is_empty());
    }

    #[test]
    fn weighted_pick_respects_weights() {
        let registry = BiomeRegistry::vanilla();
        let mut tables = SpawnTables::default();
        tables.insert_spawns("heavy", MobCategory::Hostile, &tuning_with(&["minecraft:swamp"], 99), &registry);
        tables.insert_spawns("light", MobCategory::Hostile, &tuning_with(&["minecraft:swamp"], 1), &registry);

        let mut rng = StdRng::seed_from_u64(7);
        let heavy = (0..1000)
            .filter(|_| {
                tables
                    .pick("minecraft:swamp", MobCategory::Hostile, &mut rng)
                    .map(|e| e.mob == "heavy")
                    .unwrap_or(false)
            })
            .count();
        assert!(heavy > 900, "heavy picked {heavy} times");
        assert!(tables.pick("minecraft:desert", MobCategory::Hostile, &mut rng).is_none());
    }
}
