//! Sparse block storage over a flat base terrain.
//!
//! Every column is stone up to `surface_y` with a grass top and air above,
//! unless a block has been explicitly placed. Placed blocks (including air)
//! override the base terrain.

use std::collections::HashMap;

use crate::block::BlockState;
use crate::pos::BlockPos;

/// Lowest block Y in the world.
pub const MIN_Y: i32 = -64;

/// Highest block Y in the world.
pub const MAX_Y: i32 = 319;

/// Maximum light level.
pub const MAX_LIGHT: u8 = 15;

/// Read access to blocks, light and biomes.
pub trait BlockView {
    fn block(&self, pos: BlockPos) -> BlockState;

    /// Light level at `pos` with the sky dimmed by `sky_darkening` (0 at noon, 11 at night).
    fn light(&self, pos: BlockPos, sky_darkening: u8) -> u8;

    fn biome(&self, x: i32, z: i32) -> &str;

    fn is_air(&self, pos: BlockPos) -> bool {
        self.block(pos).is_air()
    }
}

pub struct BlockStore {
    placed: HashMap<BlockPos, BlockState>,
    surface_y: i32,
    biomes: HashMap<(i32, i32), String>,
    default_biome: String,
}

impl BlockStore {
    /// Flat terrain whose top solid layer is at `surface_y`.
    pub fn flat(surface_y: i32, default_biome: impl Into<String>) -> Self {
        Self {
            placed: HashMap::new(),
            surface_y,
            biomes: HashMap::new(),
            default_biome: default_biome.into(),
        }
    }

    /// Y of the top solid layer of the base terrain.
    pub fn surface_y(&self) -> i32 {
        self.surface_y
    }

    pub fn set_block(&mut self, pos: BlockPos, state: BlockState) {
        self.placed.insert(pos, state);
    }

    /// Assign a biome to a single column.
    pub fn set_biome(&mut self, x: i32, z: i32, biome: impl Into<String>) {
        self.biomes.insert((x, z), biome.into());
    }

    /// Assign a biome to every column in the inclusive rectangle.
    pub fn fill_biome(&mut self, from: (i32, i32), to: (i32, i32), biome: &str) {
        for x in from.0.min(to.0)..=from.0.max(to.0) {
            for z in from.1.min(to.1)..=from.1.max(to.1) {
                self.set_biome(x, z, biome);
            }
        }
    }

    fn base_block(&self, pos: BlockPos) -> BlockState {
        if pos.y < MIN_Y || pos.y > self.surface_y {
            BlockState::air()
        } else if pos.y == MIN_Y {
            BlockState::solid("minecraft:bedrock")
        } else if pos.y == self.surface_y {
            BlockState::solid("minecraft:grass_block")
        } else {
            BlockState::solid("minecraft:stone")
        }
    }

    /// Highest Y in the column with an opaque block, if any.
    fn opaque_height(&self, x: i32, z: i32) -> i32 {
        let placed_top = self
            .placed
            .iter()
            .filter(|(p, s)| p.x == x && p.z == z && s.is_opaque())
            .map(|(p, _)| p.y)
            .max();
        let base_top = (MIN_Y..=self.surface_y)
            .rev()
            .find(|&y| self.block(BlockPos::new(x, y, z)).is_opaque())
            .unwrap_or(MIN_Y - 1);
        placed_top.map_or(base_top, |p| p.max(base_top))
    }
}

impl BlockView for BlockStore {
    fn block(&self, pos: BlockPos) -> BlockState {
        match self.placed.get(&pos) {
            Some(state) => state.clone(),
            None => self.base_block(pos),
        }
    }

    fn light(&self, pos: BlockPos, sky_darkening: u8) -> u8 {
        let sky = if pos.y > self.opaque_height(pos.x, pos.z) {
            MAX_LIGHT.saturating_sub(sky_darkening)
        } else {
            0
        };
        sky.max(self.block(pos).light_emission)
    }

    fn biome(&self, x: i32, z: i32) -> &str {
        self.biomes
            .get(&(x, z))
            .map(String::as_str)
            .unwrap_or(&self.default_biome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_terrain_layers() {
        let store = BlockStore::flat(3, "minecraft:plains");
        assert_eq!(store.block(BlockPos::new(0, 3, 0)).name, "minecraft:grass_block");
        assert_eq!(store.block(BlockPos::new(0, 0, 0)).name, "minecraft:stone");
        assert_eq!(store.block(BlockPos::new(0, MIN_Y, 0)).name, "minecraft:bedrock");
        assert!(store.is_air(BlockPos::new(0, 4, 0)));
        assert!(store.is_air(BlockPos::new(0, MIN_Y - 1, 0)));
    }

    #[test]
    fn placed_blocks_override_terrain() {
        let mut store = BlockStore::flat(3, "minecraft:plains");
        store.set_block(BlockPos::new(1, 3, 1), BlockState::air());
        store.set_block(BlockPos::new(1, 10, 1), BlockState::solid("minecraft:stone"));
        assert!(store.is_air(BlockPos::new(1, 3, 1)));
        assert!(store.block(BlockPos::new(1, 10, 1)).is_top_solid());
    }

    #[test]
    fn sky_light_blocked_by_roof() {
        let mut store = BlockStore::flat(3, "minecraft:plains");
        let open = BlockPos::new(0, 4, 0);
        assert_eq!(store.light(open, 0), 15);
        assert_eq!(store.light(open, 11), 4);

        store.set_block(BlockPos::new(0, 6, 0), BlockState::solid("minecraft:stone"));
        assert_eq!(store.light(open, 0), 0);
    }

    #[test]
    fn block_light_counts_under_roof() {
        let mut store = BlockStore::flat(3, "minecraft:plains");
        store.set_block(BlockPos::new(0, 6, 0), BlockState::solid("minecraft:stone"));
        store.set_block(BlockPos::new(0, 4, 0), BlockState::lava());
        assert_eq!(store.light(BlockPos::new(0, 4, 0), 0), 15);
    }

    #[test]
    fn biome_columns() {
        let mut store = BlockStore::flat(3, "minecraft:plains");
        store.fill_biome((0, 0), (2, 2), "minecraft:dark_forest");
        assert_eq!(store.biome(1, 1), "minecraft:dark_forest");
        assert_eq!(store.biome(3, 3), "minecraft:plains");
    }
}
