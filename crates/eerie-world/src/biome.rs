//! Biome registry with category tags.
//!
//! Biomes are identified by namespaced strings (`"minecraft:plains"`). Each
//! biome carries a set of category tags that mob configuration can refer to
//! in bulk with `type=<CATEGORY>`.

use std::collections::HashMap;

/// Broad biome grouping used to resolve spawn eligibility in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiomeCategory {
    Hot,
    Cold,
    Sparse,
    Dense,
    Wet,
    Dry,
    Coniferous,
    Spooky,
    Dead,
    Lush,
    Nether,
    End,
    Mushroom,
    Magical,
    Ocean,
    River,
    Mesa,
    Forest,
    Plains,
    Mountain,
    Hills,
    Swamp,
    Sandy,
    Snowy,
    Wasteland,
    Beach,
}

impl BiomeCategory {
    const ALL: [BiomeCategory; 26] = [
        BiomeCategory::Hot,
        BiomeCategory::Cold,
        BiomeCategory::Sparse,
        BiomeCategory::Dense,
        BiomeCategory::Wet,
        BiomeCategory::Dry,
        BiomeCategory::Coniferous,
        BiomeCategory::Spooky,
        BiomeCategory::Dead,
        BiomeCategory::Lush,
        BiomeCategory::Nether,
        BiomeCategory::End,
        BiomeCategory::Mushroom,
        BiomeCategory::Magical,
        BiomeCategory::Ocean,
        BiomeCategory::River,
        BiomeCategory::Mesa,
        BiomeCategory::Forest,
        BiomeCategory::Plains,
        BiomeCategory::Mountain,
        BiomeCategory::Hills,
        BiomeCategory::Swamp,
        BiomeCategory::Sandy,
        BiomeCategory::Snowy,
        BiomeCategory::Wasteland,
        BiomeCategory::Beach,
    ];

    /// Upper-case tag name, e.g. `"FOREST"`.
    pub fn name(self) -> &'static str {
        match self {
            BiomeCategory::Hot => "HOT",
            BiomeCategory::Cold => "COLD",
            BiomeCategory::Sparse => "SPARSE",
            BiomeCategory::Dense => "DENSE",
            BiomeCategory::Wet => "WET",
            BiomeCategory::Dry => "DRY",
            BiomeCategory::Coniferous => "CONIFEROUS",
            BiomeCategory::Spooky => "SPOOKY",
            BiomeCategory::Dead => "DEAD",
            BiomeCategory::Lush => "LUSH",
            BiomeCategory::Nether => "NETHER",
            BiomeCategory::End => "END",
            BiomeCategory::Mushroom => "MUSHROOM",
            BiomeCategory::Magical => "MAGICAL",
            BiomeCategory::Ocean => "OCEAN",
            BiomeCategory::River => "RIVER",
            BiomeCategory::Mesa => "MESA",
            BiomeCategory::Forest => "FOREST",
            BiomeCategory::Plains => "PLAINS",
            BiomeCategory::Mountain => "MOUNTAIN",
            BiomeCategory::Hills => "HILLS",
            BiomeCategory::Swamp => "SWAMP",
            BiomeCategory::Sandy => "SANDY",
            BiomeCategory::Snowy => "SNOWY",
            BiomeCategory::Wasteland => "WASTELAND",
            BiomeCategory::Beach => "BEACH",
        }
    }

    /// Case-insensitive lookup by tag name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

/// Definition of a single biome.
#[derive(Debug, Clone)]
pub struct BiomeDef {
    pub id: String,
    pub categories: Vec<BiomeCategory>,
}

/// Registry of known biomes.
pub struct BiomeRegistry {
    biomes: Vec<BiomeDef>,
    by_id: HashMap<String, usize>,
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::vanilla()
    }
}

impl BiomeRegistry {
    pub fn empty() -> Self {
        Self {
            biomes: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Registry with the vanilla overworld and nether biomes.
    pub fn vanilla() -> Self {
        use BiomeCategory::*;

        let mut reg = Self::empty();
        let defs: &[(&str, &[BiomeCategory])] = &[
            ("minecraft:ocean", &[Ocean, Wet]),
            ("minecraft:river", &[River, Wet]),
            ("minecraft:beach", &[Beach]),
            ("minecraft:plains", &[Plains]),
            ("minecraft:sunflower_plains", &[Plains]),
            ("minecraft:desert", &[Hot, Dry, Sandy]),
            ("minecraft:forest", &[Forest]),
            ("minecraft:birch_forest", &[Forest]),
            ("minecraft:dark_forest", &[Spooky, Dense, Forest]),
            ("minecraft:taiga", &[Cold, Coniferous, Forest]),
            ("minecraft:snowy_plains", &[Cold, Snowy, Wasteland]),
            ("minecraft:swamp", &[Wet, Swamp]),
            ("minecraft:jungle", &[Hot, Wet, Dense, Lush]),
            ("minecraft:savanna", &[Hot, Sparse, Plains]),
            ("minecraft:badlands", &[Mesa, Sandy, Dry]),
            ("minecraft:windswept_hills", &[Mountain, Hills]),
            ("minecraft:mushroom_fields", &[Mushroom, Magical]),
            ("minecraft:nether_wastes", &[Nether, Hot, Dry]),
            ("minecraft:soul_sand_valley", &[Nether, Hot, Dry, Spooky]),
            ("minecraft:crimson_forest", &[Nether, Hot, Forest]),
            ("minecraft:basalt_deltas", &[Nether, Hot, Dry]),
            ("minecraft:the_end", &[End, Cold, Dry]),
        ];
        for (id, categories) in defs {
            reg.register(BiomeDef {
                id: (*id).to_string(),
                categories: categories.to_vec(),
            });
        }
        reg
    }

    /// Register a biome, replacing any existing biome with the same id.
    pub fn register(&mut self, def: BiomeDef) {
        match self.by_id.get(&def.id) {
            Some(&idx) => self.biomes[idx] = def,
            None => {
                self.by_id.insert(def.id.clone(), self.biomes.len());
                self.biomes.push(def);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&BiomeDef> {
        self.by_id.get(id).map(|&idx| &self.biomes[idx])
    }

    /// All biomes tagged with `category`.
    pub fn in_category(&self, category: BiomeCategory) -> impl Iterator<Item = &BiomeDef> {
        self.biomes
            .iter()
            .filter(move |b| b.categories.contains(&category))
    }

    pub fn all(&self) -> &[BiomeDef] {
        &self.biomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_case_insensitive() {
        assert_eq!(BiomeCategory::from_name("forest"), Some(BiomeCategory::Forest));
        assert_eq!(BiomeCategory::from_name("NETHER"), Some(BiomeCategory::Nether));
        assert_eq!(BiomeCategory::from_name("Spooky"), Some(BiomeCategory::Spooky));
        assert_eq!(BiomeCategory::from_name("volcanic"), None);
    }

    #[test]
    fn vanilla_lookup() {
        let reg = BiomeRegistry::vanilla();
        assert!(reg.get("minecraft:plains").is_some());
        assert!(reg.get("minecraft:moon").is_none());
    }

    #[test]
    fn category_members() {
        let reg = BiomeRegistry::vanilla();
        let nether: Vec<&str> = reg
            .in_category(BiomeCategory::Nether)
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(nether.len(), 4);
        assert!(nether.contains(&"minecraft:nether_wastes"));
    }

    #[test]
    fn register_replaces_same_id() {
        let mut reg = BiomeRegistry::empty();
        reg.register(BiomeDef {
            id: "eerie:hollow".into(),
            categories: vec![BiomeCategory::Spooky],
        });
        reg.register(BiomeDef {
            id: "eerie:hollow".into(),
            categories: vec![BiomeCategory::Spooky, BiomeCategory::Forest],
        });
        assert_eq!(reg.all().len(), 1);
        assert_eq!(reg.in_category(BiomeCategory::Forest).count(), 1);
    }
}
