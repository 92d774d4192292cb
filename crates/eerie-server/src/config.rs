use std::path::Path;

use eerie_game::ai::spawning::SpawnConfig;
use eerie_game::{ConfigError, RawModConfig};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct EerieConfig {
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub spawning: SpawningSection,
    /// Per-mob tunables, clamped when bound to the game world.
    #[serde(default)]
    pub mobs: RawModConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    /// 0 = random.
    #[serde(default)]
    pub seed: u64,
    /// Starting time of day in ticks.
    #[serde(default = "default_time")]
    pub time: u64,
    #[serde(default = "default_save_file")]
    pub save_file: String,
    /// Auto-save interval in seconds. 0 = disabled. Default: 300 (5 minutes).
    #[serde(default = "default_auto_save_interval")]
    pub auto_save_interval: u64,
}

fn default_difficulty() -> String {
    "normal".into()
}

fn default_time() -> u64 {
    18_000
}

fn default_save_file() -> String {
    "mobs.dat".into()
}

fn default_auto_save_interval() -> u64 {
    300
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            seed: 0,
            time: default_time(),
            save_file: default_save_file(),
            auto_save_interval: default_auto_save_interval(),
        }
    }
}

/// Natural spawning knobs. Unset fields keep the engine defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SpawningSection {
    pub hostile_cap: Option<u32>,
    pub passive_cap: Option<u32>,
    pub spawn_interval: Option<u64>,
    pub despawn_interval: Option<u64>,
    pub despawn_distance: Option<f32>,
}

impl SpawningSection {
    pub fn to_spawn_config(&self) -> SpawnConfig {
        let d = SpawnConfig::default();
        SpawnConfig {
            hostile_cap: self.hostile_cap.unwrap_or(d.hostile_cap),
            passive_cap: self.passive_cap.unwrap_or(d.passive_cap),
            // Zero intervals would never fire.
            spawn_interval: self.spawn_interval.unwrap_or(d.spawn_interval).max(1),
            despawn_interval: self.despawn_interval.unwrap_or(d.despawn_interval).max(1),
            despawn_distance: self.despawn_distance.unwrap_or(d.despawn_distance),
            ..d
        }
    }
}

impl EerieConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
