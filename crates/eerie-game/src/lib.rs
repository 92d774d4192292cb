//! Game logic: ECS world, mob archetypes, AI, combat and persistence.

pub mod ai;
pub mod attributes;
pub mod combat;
pub mod components;
pub mod config;
pub mod entities;
pub mod game_world;
pub mod hooks;
pub mod mob_registry;
pub mod persistence;
pub mod spawn_table;

pub use config::{ConfigError, ModConfig, RawModConfig};
pub use game_world::{Difficulty, GameEvent, GameWorld, SpawnError};
