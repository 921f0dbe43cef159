//! Containment-checked block accumulator

use bitflags::bitflags;

use super::{ChestContents, EmitChunk, EmitStep, SignText};
use crate::block::{BlockInstruction, BlockPos, BlockType, Orientation};
use crate::dungeon::{RewardItem, RewardTier, Volume};
use crate::error::{LayoutError, LayoutResult};

bitflags! {
    /// Walls of a shell
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Faces: u8 {
        /// -z
        const NORTH = 0b0001;
        /// +z
        const SOUTH = 0b0010;
        /// +x
        const EAST  = 0b0100;
        /// -x
        const WEST  = 0b1000;
    }
}

/// Collects the instructions of one entity, rejecting any outside its volume
#[derive(Debug)]
pub struct BlockSink {
    step: EmitStep,
    bounds: Volume,
    blocks: Vec<BlockInstruction>,
    signs: Vec<SignText>,
    chests: Vec<ChestContents>,
}

impl BlockSink {
    pub fn new(step: EmitStep, bounds: Volume) -> Self {
        Self {
            step,
            bounds,
            blocks: Vec::new(),
            signs: Vec::new(),
            chests: Vec::new(),
        }
    }

    pub fn bounds(&self) -> &Volume {
        &self.bounds
    }

    fn push(&mut self, pos: BlockPos, block: BlockType, orientation: Orientation) -> LayoutResult<()> {
        if !self.bounds.contains_point(pos) {
            return Err(LayoutError::InvariantViolation(format!(
                "{block} at {pos:?} escapes {:?} of {:?}",
                self.bounds, self.step
            )));
        }
        self.blocks.push(BlockInstruction::new(pos, block, orientation));
        Ok(())
    }

    pub fn place(&mut self, pos: BlockPos, block: BlockType) -> LayoutResult<()> {
        self.place_facing(pos, block, Orientation::None)
    }

    /// Place a block; signs and chests must go through [`Self::sign`] and [`Self::chest`]
    pub fn place_facing(
        &mut self,
        pos: BlockPos,
        block: BlockType,
        orientation: Orientation,
    ) -> LayoutResult<()> {
        if block.has_side_record() {
            return Err(LayoutError::InvariantViolation(format!(
                "{block} at {pos:?} placed without its record"
            )));
        }
        self.push(pos, block, orientation)
    }

    pub fn sign(&mut self, pos: BlockPos, facing: Orientation, lines: [String; 4]) -> LayoutResult<()> {
        self.push(pos, BlockType::WallSign, facing)?;
        self.signs.push(SignText { position: pos, lines });
        Ok(())
    }

    pub fn chest(
        &mut self,
        pos: BlockPos,
        facing: Orientation,
        tier: RewardTier,
        items: Vec<RewardItem>,
    ) -> LayoutResult<()> {
        self.push(pos, BlockType::Chest, facing)?;
        self.chests.push(ChestContents {
            position: pos,
            tier,
            items,
        });
        Ok(())
    }

    /// Fill a box with one block
    pub fn fill(&mut self, volume: Volume, block: BlockType) -> LayoutResult<()> {
        for pos in volume.positions() {
            self.place(pos, block)?;
        }
        Ok(())
    }

    /// Foundation, floor, walls on `faces`, ceiling and clear air inside
    pub fn shell(&mut self, floor_y: i32, floor: BlockType, faces: Faces) -> LayoutResult<()> {
        if !floor.is_safe_floor() {
            return Err(LayoutError::InvariantViolation(format!(
                "{floor} is not a walkable floor"
            )));
        }
        let v = self.bounds;
        for pos in v.positions() {
            let wall = (faces.contains(Faces::WEST) && pos.x == v.min.x)
                || (faces.contains(Faces::EAST) && pos.x == v.max.x)
                || (faces.contains(Faces::NORTH) && pos.z == v.min.z)
                || (faces.contains(Faces::SOUTH) && pos.z == v.max.z);
            let block = if pos.y < floor_y {
                BlockType::StoneBricks
            } else if pos.y == floor_y {
                floor
            } else if pos.y == v.max.y || wall {
                BlockType::StoneBricks
            } else {
                BlockType::Air
            };
            self.place(pos, block)?;
        }
        Ok(())
    }

    /// Two-high opening standing on the floor
    pub fn doorway(&mut self, base: BlockPos) -> LayoutResult<()> {
        self.place(base, BlockType::Air)?;
        self.place(base.offset(0, 1, 0), BlockType::Air)
    }

    pub fn finish(self) -> EmitChunk {
        EmitChunk {
            step: self.step,
            blocks: self.blocks,
            signs: self.signs,
            chests: self.chests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> BlockSink {
        BlockSink::new(
            EmitStep::Boss,
            Volume::new(BlockPos::new(0, 0, 0), BlockPos::new(4, 5, 4)),
        )
    }

    #[test]
    fn test_escape_rejected() {
        let mut sink = sink();
        assert!(sink.place(BlockPos::new(4, 5, 4), BlockType::Glowstone).is_ok());
        let err = sink.place(BlockPos::new(5, 0, 0), BlockType::Glowstone).unwrap_err();
        assert!(matches!(err, LayoutError::InvariantViolation(_)));
        assert_eq!(sink.finish().blocks.len(), 1);
    }

    #[test]
    fn test_record_blocks_need_records() {
        let mut sink = sink();
        assert!(sink.place(BlockPos::new(1, 1, 1), BlockType::Chest).is_err());
        sink.chest(
            BlockPos::new(1, 1, 1),
            Orientation::West,
            RewardTier::Plain,
            RewardTier::Plain.rewards(),
        )
        .unwrap();
        sink.sign(BlockPos::new(2, 2, 1), Orientation::West, Default::default())
            .unwrap();
        let chunk = sink.finish();
        assert_eq!(chunk.chests.len(), 1);
        assert_eq!(chunk.signs.len(), 1);
        assert_eq!(chunk.blocks.len(), 2);
    }

    #[test]
    fn test_shell_layers() {
        let mut sink = sink();
        sink.shell(2, BlockType::Cobblestone, Faces::NORTH | Faces::SOUTH)
            .unwrap();
        let chunk = sink.finish();
        assert_eq!(chunk.blocks.len(), 5 * 6 * 5);
        let at = |x, y, z| {
            chunk
                .blocks
                .iter()
                .find(|b| b.pos == BlockPos::new(x, y, z))
                .map(|b| b.block)
        };
        assert_eq!(at(2, 1, 2), Some(BlockType::StoneBricks));
        assert_eq!(at(2, 2, 2), Some(BlockType::Cobblestone));
        assert_eq!(at(2, 3, 2), Some(BlockType::Air));
        assert_eq!(at(2, 3, 0), Some(BlockType::StoneBricks));
        assert_eq!(at(0, 3, 2), Some(BlockType::Air));
        assert_eq!(at(2, 5, 2), Some(BlockType::StoneBricks));
    }

    #[test]
    fn test_shell_rejects_hazard_floor() {
        let mut sink = sink();
        assert!(sink.shell(2, BlockType::Lava, Faces::all()).is_err());
    }
}
