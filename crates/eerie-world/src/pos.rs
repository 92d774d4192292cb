//! Integer block coordinates and horizontal facings.

use std::ops::Add;

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The block containing the given entity position.
    pub fn containing(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
            z: z.floor() as i32,
        }
    }

    pub fn up(self, n: i32) -> Self {
        Self {
            y: self.y + n,
            ..self
        }
    }

    pub fn down(self, n: i32) -> Self {
        self.up(-n)
    }

    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Chunk column this block belongs to.
    pub fn chunk(self) -> (i32, i32) {
        (self.x >> 4, self.z >> 4)
    }

    /// Center of the block's bottom face, where an entity stands.
    pub fn bottom_center(self) -> (f32, f32, f32) {
        (self.x as f32 + 0.5, self.y as f32, self.z as f32 + 0.5)
    }
}

impl Add for BlockPos {
    type Output = BlockPos;

    fn add(self, rhs: BlockPos) -> BlockPos {
        self.offset(rhs.x, rhs.y, rhs.z)
    }
}

/// Horizontal facing of a block or entity.
///
/// Yaw convention: 0 = south (+Z), 90 = west (-X), 180 = north (-Z), 270 = east (+X).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    South,
    West,
    North,
    East,
}

impl Facing {
    const HORIZONTALS: [Facing; 4] = [Facing::South, Facing::West, Facing::North, Facing::East];

    /// Nearest horizontal facing for a yaw in degrees (any range).
    pub fn from_yaw(yaw: f32) -> Self {
        let quarter = (yaw / 90.0 + 0.5).floor() as i32;
        Self::HORIZONTALS[quarter.rem_euclid(4) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Facing::South => "south",
            Facing::West => "west",
            Facing::North => "north",
            Facing::East => "east",
        }
    }
}
