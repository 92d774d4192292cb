//! Block states as seen by entity logic: what an entity can stand on, breathe
//! in, or swim through.

use crate::pos::Facing;

/// Physical class of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Air,
    /// Full cube, solid on every face.
    Solid,
    /// Occupies space but has no solid top face (flowers, torches, slabs placed low).
    Passable,
    Water,
    Lava,
}

/// A block in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockState {
    /// Namespaced identifier, e.g. `"minecraft:stone"`.
    pub name: String,
    pub kind: BlockKind,
    /// Horizontal facing for directional blocks.
    pub facing: Option<Facing>,
    /// Emitted block light (0-15).
    pub light_emission: u8,
}

impl BlockState {
    pub fn air() -> Self {
        Self {
            name: "minecraft:air".into(),
            kind: BlockKind::Air,
            facing: None,
            light_emission: 0,
        }
    }

    pub fn solid(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BlockKind::Solid,
            facing: None,
            light_emission: 0,
        }
    }

    pub fn passable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BlockKind::Passable,
            facing: None,
            light_emission: 0,
        }
    }

    pub fn water() -> Self {
        Self {
            name: "minecraft:water".into(),
            kind: BlockKind::Water,
            facing: None,
            light_emission: 0,
        }
    }

    pub fn lava() -> Self {
        Self {
            name: "minecraft:lava".into(),
            kind: BlockKind::Lava,
            facing: None,
            light_emission: 15,
        }
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = Some(facing);
        self
    }

    pub fn with_light(mut self, level: u8) -> Self {
        self.light_emission = level.min(15);
        self
    }

    pub fn is_air(&self) -> bool {
        self.kind == BlockKind::Air
    }

    /// Whether an entity can stand on top of this block.
    pub fn is_top_solid(&self) -> bool {
        self.kind == BlockKind::Solid
    }

    pub fn is_liquid(&self) -> bool {
        matches!(self.kind, BlockKind::Water | BlockKind::Lava)
    }

    /// Whether the block blocks sky light from reaching below it.
    pub fn is_opaque(&self) -> bool {
        self.kind == BlockKind::Solid
    }
}
