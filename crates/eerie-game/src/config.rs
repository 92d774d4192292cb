//! Per-mob tunables: raw TOML values, range clamping, and attribute binding.
//!
//! Every mob archetype owns one [`MobTuning`]. Values are read from a raw,
//! all-optional TOML section and clamped into range by [`MobTuning::sync`];
//! fields absent from the file keep the archetype default.

use bevy_ecs::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::attributes::{AttributeKind, AttributeMap};

/// Errors while reading mob configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

pub const HEALTH_RANGE: (f64, f64) = (0.0, 1024.0);
pub const SPEED_RANGE: (f64, f64) = (0.0, 1024.0);
pub const ARMOR_RANGE: (f64, f64) = (0.0, 1024.0);
pub const ATTACK_RANGE: (f64, f64) = (0.0, 1034.0);
pub const CHANCE_RANGE: (f64, f64) = (0.0, 1.0);
pub const MAX_IN_CHUNK_RANGE: (i64, i64) = (0, 1024);
pub const PACK_SIZE_RANGE: (i64, i64) = (1, 128);
pub const SPAWN_WEIGHT_RANGE: (i64, i64) = (0, 1024);
pub const EXPERIENCE_RANGE: (i64, i64) = (0, (i32::MAX / 2) as i64);
pub const SPAWN_OFFSET_RANGE: (i64, i64) = (0, 32);

fn clamp_float(raw: Option<f64>, default: f64, (min, max): (f64, f64)) -> f64 {
    match raw {
        Some(v) if !v.is_nan() => v.clamp(min, max),
        _ => default.clamp(min, max),
    }
}

fn clamp_int(raw: Option<i64>, default: i64, (min, max): (i64, i64)) -> i64 {
    raw.unwrap_or(default).clamp(min, max)
}

// ---------------------------------------------------------------------------
// Biome selectors
// ---------------------------------------------------------------------------

/// One entry of a mob's biome list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiomeSelector {
    /// A concrete biome id such as `"minecraft:dark_forest"`.
    Biome(String),
    /// Every biome tagged with the category (upper-cased tag name).
    Category(String),
}

impl BiomeSelector {
    /// Parse `type=<CATEGORY>` or a plain biome id. Blank entries yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.strip_prefix("type=") {
            Some(tag) => Some(BiomeSelector::Category(tag.trim().to_ascii_uppercase())),
            None => Some(BiomeSelector::Biome(raw.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw TOML surface
// ---------------------------------------------------------------------------

/// Common fields of a `[mobs.<name>]` section. Everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMobTuning {
    pub health: Option<f64>,
    pub speed: Option<f64>,
    pub armor: Option<f64>,
    pub attack: Option<f64>,
    pub max_in_chunk: Option<i64>,
    pub min_pack_size: Option<i64>,
    pub max_pack_size: Option<i64>,
    pub spawn_weight: Option<i64>,
    pub base_experience: Option<i64>,
    pub biomes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPumpkinSlime {
    #[serde(flatten)]
    pub mob: RawMobTuning,
    pub die_in_sunlight: Option<bool>,
    pub solidify_chance: Option<f64>,
    pub allow_taming: Option<bool>,
    pub tame_chance: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawNetherKnight {
    #[serde(flatten)]
    pub mob: RawMobTuning,
    pub burn_chance: Option<f64>,
    pub reinforcement_chance: Option<f64>,
    pub spawn_range_min: Option<i64>,
    pub spawn_range_max: Option<i64>,
    pub reinforcements: Option<Vec<String>>,
    pub bonus_armor: Option<f64>,
    pub bonus_health: Option<f64>,
}

/// The `[mobs]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawModConfig {
    pub pumpkin_slime: RawPumpkinSlime,
    pub nether_knight: RawNetherKnight,
}

impl RawModConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

// ---------------------------------------------------------------------------
// Clamped tunables
// ---------------------------------------------------------------------------

/// Archetype defaults used for fields the config leaves unset.
#[derive(Debug, Clone)]
pub struct MobDefaults {
    pub health: f64,
    pub speed: f64,
    pub armor: f64,
    pub attack: f64,
    pub max_in_chunk: i64,
    pub min_pack_size: i64,
    pub max_pack_size: i64,
    pub spawn_weight: i64,
    pub base_experience: i64,
    pub biomes: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct MobTuning {
    pub name: &'static str,
    defaults: MobDefaults,
    pub health: f64,
    pub speed: f64,
    pub armor: f64,
    pub attack: f64,
    pub max_in_chunk: u32,
    pub min_pack_size: u32,
    pub max_pack_size: u32,
    pub spawn_weight: u32,
    pub base_experience: u32,
    pub biomes: Vec<BiomeSelector>,
}

impl MobTuning {
    pub fn new(name: &'static str, defaults: MobDefaults) -> Self {
        let mut tuning = Self {
            name,
            health: 0.0,
            speed: 0.0,
            armor: 0.0,
            attack: 0.0,
            max_in_chunk: 0,
            min_pack_size: 1,
            max_pack_size: 1,
            spawn_weight: 0,
            base_experience: 0,
            biomes: Vec::new(),
            defaults,
        };
        tuning.sync(&RawMobTuning::default());
        tuning
    }

    /// Re-read every field from `raw`, clamping into range. Unset fields fall
    /// back to the archetype default.
    pub fn sync(&mut self, raw: &RawMobTuning) {
        let d = &self.defaults;
        self.health = clamp_float(raw.health, d.health, HEALTH_RANGE);
        self.speed = clamp_float(raw.speed, d.speed, SPEED_RANGE);
        self.armor = clamp_float(raw.armor, d.armor, ARMOR_RANGE);
        self.attack = clamp_float(raw.attack, d.attack, ATTACK_RANGE);
        self.max_in_chunk = clamp_int(raw.max_in_chunk, d.max_in_chunk, MAX_IN_CHUNK_RANGE) as u32;
        self.min_pack_size = clamp_int(raw.min_pack_size, d.min_pack_size, PACK_SIZE_RANGE) as u32;
        self.max_pack_size = clamp_int(raw.max_pack_size, d.max_pack_size, PACK_SIZE_RANGE) as u32;
        self.spawn_weight = clamp_int(raw.spawn_weight, d.spawn_weight, SPAWN_WEIGHT_RANGE) as u32;
        self.base_experience =
            clamp_int(raw.base_experience, d.base_experience, EXPERIENCE_RANGE) as u32;

        if self.max_pack_size < self.min_pack_size {
            debug!(
                mob = self.name,
                min = self.min_pack_size,
                max = self.max_pack_size,
                "max pack size below min, raising"
            );
            self.max_pack_size = self.min_pack_size;
        }

        self.biomes = match &raw.biomes {
            Some(list) => list.iter().filter_map(|s| BiomeSelector::parse(s)).collect(),
            None => d.biomes.iter().filter_map(|s| BiomeSelector::parse(s)).collect(),
        };
    }

    /// Write health, speed, armor and attack onto an attribute map as base
    /// values. Slots that are missing get registered; slots the map refuses
    /// to create are skipped.
    pub fn apply(&self, attrs: &mut AttributeMap) {
        let bindings = [
            (AttributeKind::MaxHealth, self.health),
            (AttributeKind::MovementSpeed, self.speed),
            (AttributeKind::Armor, self.armor),
            (AttributeKind::AttackDamage, self.attack),
        ];
        for (kind, value) in bindings {
            match attrs.register(kind) {
                Some(slot) => slot.set_base(value),
                None => debug!(mob = self.name, ?kind, "attribute slot unavailable, skipped"),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Archetype tunables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PumpkinSlimeTuning {
    pub mob: MobTuning,
    pub die_in_sunlight: bool,
    pub solidify_chance: f64,
    pub allow_taming: bool,
    pub tame_chance: f64,
}

impl Default for PumpkinSlimeTuning {
    fn default() -> Self {
        let mut tuning = Self {
            mob: MobTuning::new(
                "pumpkin_slime",
                MobDefaults {
                    health: 16.0,
                    speed: 0.3,
                    armor: 0.0,
                    attack: 3.0,
                    max_in_chunk: 4,
                    min_pack_size: 1,
                    max_pack_size: 3,
                    spawn_weight: 60,
                    base_experience: 5,
                    biomes: &["type=SPOOKY", "type=FOREST"],
                },
            ),
            die_in_sunlight: false,
            solidify_chance: 0.0,
            allow_taming: false,
            tame_chance: 0.0,
        };
        tuning.sync(&RawPumpkinSlime::default());
        tuning
    }
}

impl PumpkinSlimeTuning {
    pub fn sync(&mut self, raw: &RawPumpkinSlime) {
        self.mob.sync(&raw.mob);
        self.die_in_sunlight = raw.die_in_sunlight.unwrap_or(true);
        self.solidify_chance = clamp_float(raw.solidify_chance, 0.5, CHANCE_RANGE);
        self.allow_taming = raw.allow_taming.unwrap_or(true);
        self.tame_chance = clamp_float(raw.tame_chance, 0.33, CHANCE_RANGE);
    }
}

#[derive(Debug, Clone)]
pub struct NetherKnightTuning {
    pub mob: MobTuning,
    pub burn_chance: f64,
    pub reinforcement_chance: f64,
    /// Inclusive per-axis offset magnitude for reinforcement placement.
    pub spawn_range: (i32, i32),
    pub reinforcements: Vec<String>,
    pub bonus_armor: f64,
    pub bonus_health: f64,
}

impl Default for NetherKnightTuning {
    fn default() -> Self {
        let mut tuning = Self {
            mob: MobTuning::new(
                "nether_knight",
                MobDefaults {
                    health: 40.0,
                    speed: 0.25,
                    armor: 8.0,
                    attack: 6.0,
                    max_in_chunk: 2,
                    min_pack_size: 1,
                    max_pack_size: 1,
                    spawn_weight: 10,
                    base_experience: 10,
                    biomes: &["type=NETHER"],
                },
            ),
            burn_chance: 0.0,
            reinforcement_chance: 0.0,
            spawn_range: (0, 0),
            reinforcements: Vec::new(),
            bonus_armor: 0.0,
            bonus_health: 0.0,
        };
        tuning.sync(&RawNetherKnight::default());
        tuning
    }
}

impl NetherKnightTuning {
    pub fn sync(&mut self, raw: &RawNetherKnight) {
        self.mob.sync(&raw.mob);
        self.burn_chance = clamp_float(raw.burn_chance, 0.3, CHANCE_RANGE);
        self.reinforcement_chance = clamp_float(raw.reinforcement_chance, 0.1, CHANCE_RANGE);

        let low = clamp_int(raw.spawn_range_min, 3, SPAWN_OFFSET_RANGE) as i32;
        let high = clamp_int(raw.spawn_range_max, 7, SPAWN_OFFSET_RANGE) as i32;
        self.spawn_range = (low.min(high), low.max(high));

        self.reinforcements = match &raw.reinforcements {
            Some(ids) => ids.iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
            None => vec![
                "minecraft:wither_skeleton".into(),
                "minecraft:blaze".into(),
            ],
        };
        self.bonus_armor = clamp_float(raw.bonus_armor, 4.0, ARMOR_RANGE);
        self.bonus_health = clamp_float(raw.bonus_health, 10.0, HEALTH_RANGE);
    }
}

/// Live tunables for every configurable archetype.
#[derive(Resource, Debug, Clone, Default)]
pub struct ModConfig {
    pub pumpkin_slime: PumpkinSlimeTuning,
    pub nether_knight: NetherKnightTuning,
}

impl ModConfig {
    pub fn from_raw(raw: &RawModConfig) -> Self {
        let mut config = Self::default();
        config.reload(raw);
        config
    }

    /// Re-sync every archetype from a freshly parsed config.
    pub fn reload(&mut self, raw: &RawModConfig) {
        self.pumpkin_slime.sync(&raw.pumpkin_slime);
        self.nether_knight.sync(&raw.nether_knight);
    }
}
