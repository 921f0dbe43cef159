//! Block positions, block types and placement instructions
//!
//! Coordinates follow the usual voxel world convention: `y` is up, the spine
//! runs along `+z` (south) and branches extend along `+x` (east).

use serde::{Deserialize, Serialize};
use strum::Display;

/// Integer block coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position shifted by the given deltas
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// Block types the emitter can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    #[default]
    Air,
    StoneBricks,
    Cobblestone,
    Obsidian,
    Lava,
    Glowstone,
    Piston,
    StonePressurePlate,
    WallSign,
    Chest,
    GoldBlock,
    DiamondBlock,
    DragonSpawner,
}

impl BlockType {
    /// Blocks the player can stand on without harm
    pub const fn is_safe_floor(self) -> bool {
        matches!(
            self,
            BlockType::StoneBricks
                | BlockType::Cobblestone
                | BlockType::Obsidian
                | BlockType::GoldBlock
                | BlockType::DiamondBlock
                | BlockType::Glowstone
        )
    }

    /// Blocks that carry an extra record (sign text, chest inventory)
    pub const fn has_side_record(self) -> bool {
        matches!(self, BlockType::WallSign | BlockType::Chest)
    }
}

/// Facing of a directional block
///
/// North is `-z`, south `+z`, east `+x`, west `-x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    None,
    North,
    South,
    East,
    West,
    Up,
}

/// One block placement, the unit handed to the map writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockInstruction {
    #[serde(flatten)]
    pub pos: BlockPos,
    pub block: BlockType,
    #[serde(default)]
    pub orientation: Orientation,
}

impl BlockInstruction {
    pub const fn new(pos: BlockPos, block: BlockType, orientation: Orientation) -> Self {
        Self {
            pos,
            block,
            orientation,
        }
    }
}
