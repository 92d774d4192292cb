//! World state consumed by entity logic: blocks, light and biomes.

pub mod biome;
pub mod block;
pub mod pos;
pub mod store;

pub use biome::{BiomeCategory, BiomeDef, BiomeRegistry};
pub use block::{BlockKind, BlockState};
pub use pos::{BlockPos, Facing};
pub use store::{BlockStore, BlockView, MAX_Y, MIN_Y};
