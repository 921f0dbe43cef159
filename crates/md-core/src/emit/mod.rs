//! Block emission
//!
//! Walks a layout in a fixed order and turns it into block instructions:
//! the spine first, then every branch in thread order (hallway, puzzle rooms,
//! treasure room) and the boss room last. The walk is an explicit worklist of
//! [`EmitStep`]s, so a writer can also stream one entity at a time with
//! [`emit_step`].
//!
//! Every instruction is checked against the volume of the entity being
//! emitted. An escape fails the whole emission.

mod render;
mod sink;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::{BlockInstruction, BlockPos};
use crate::dungeon::{DungeonLayout, LayoutMetadata, RewardItem, RewardTier, Volume};
use crate::error::{LayoutError, LayoutResult};

pub use sink::{BlockSink, Faces};

/// Text of a wall sign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignText {
    pub position: BlockPos,
    pub lines: [String; 4],
}

/// Inventory of a chest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestContents {
    pub position: BlockPos,
    pub tier: RewardTier,
    pub items: Vec<RewardItem>,
}

/// One entity of the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum EmitStep {
    Spine,
    Hallway { branch: usize },
    Room { branch: usize, room: usize },
    Treasure { branch: usize },
    Boss,
}

/// Output of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitChunk {
    pub step: EmitStep,
    pub blocks: Vec<BlockInstruction>,
    pub signs: Vec<SignText>,
    pub chests: Vec<ChestContents>,
}

/// Everything the map writer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emission {
    pub blocks: Vec<BlockInstruction>,
    pub signs: Vec<SignText>,
    pub chests: Vec<ChestContents>,
    pub metadata: LayoutMetadata,
}

impl Emission {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn append(&mut self, chunk: EmitChunk) {
        self.blocks.extend(chunk.blocks);
        self.signs.extend(chunk.signs);
        self.chests.extend(chunk.chests);
    }
}

/// Steps in emission order
pub fn traversal(layout: &DungeonLayout) -> Vec<EmitStep> {
    let mut steps = Vec::with_capacity(2 + layout.room_count() + 2 * layout.branch_count());
    steps.push(EmitStep::Spine);
    for branch in &layout.branches {
        steps.push(EmitStep::Hallway { branch: branch.index });
        steps.extend((0..branch.room_count()).map(|room| EmitStep::Room {
            branch: branch.index,
            room,
        }));
        steps.push(EmitStep::Treasure { branch: branch.index });
    }
    steps.push(EmitStep::Boss);
    steps
}

/// Volume a step is confined to
pub fn step_volume(layout: &DungeonLayout, step: EmitStep) -> LayoutResult<Volume> {
    let missing = || LayoutError::InvariantViolation(format!("{step:?} is not part of the layout"));
    let branch = |index: usize| layout.branches.get(index).ok_or_else(missing);
    Ok(match step {
        EmitStep::Spine => layout.spine.volume,
        EmitStep::Hallway { branch: b } => branch(b)?.hallway,
        EmitStep::Room { branch: b, room } => branch(b)?.rooms.get(room).ok_or_else(missing)?.volume,
        EmitStep::Treasure { branch: b } => branch(b)?.treasure.volume,
        EmitStep::Boss => layout.boss.volume,
    })
}

/// Emit a single entity
pub fn emit_step(layout: &DungeonLayout, step: EmitStep) -> LayoutResult<EmitChunk> {
    let mut sink = BlockSink::new(step, step_volume(layout, step)?);
    match step {
        EmitStep::Spine => render::spine(&mut sink, layout)?,
        EmitStep::Hallway { .. } => render::hallway(&mut sink, layout)?,
        EmitStep::Room { branch, room } => {
            render::room(&mut sink, layout, &layout.branches[branch].rooms[room])?
        }
        EmitStep::Treasure { branch } => {
            render::treasure(&mut sink, layout, &layout.branches[branch])?
        }
        EmitStep::Boss => render::boss(&mut sink, layout, &layout.boss)?,
    }
    Ok(sink.finish())
}

/// Emit the whole layout
///
/// Output depends only on the layout, so emitting twice gives identical
/// sequences. On error nothing is returned.
pub fn emit(layout: &DungeonLayout) -> LayoutResult<Emission> {
    let mut emission = Emission {
        blocks: Vec::new(),
        signs: Vec::new(),
        chests: Vec::new(),
        metadata: layout.metadata(),
    };
    for step in traversal(layout) {
        emission.append(emit_step(layout, step)?);
    }
    debug!(
        blocks = emission.blocks.len(),
        signs = emission.signs.len(),
        chests = emission.chests.len(),
        "emitted layout"
    );
    Ok(emission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::config::GeneratorConfig;
    use crate::mail::RawThread;
    use crate::pipeline::build_layout;

    fn layout(counts: &[usize]) -> DungeonLayout {
        let raw: Vec<_> = counts
            .iter()
            .enumerate()
            .map(|(i, &m)| RawThread::with_message_count(format!("t{i}"), m))
            .collect();
        let threads = crate::mail::normalize(&raw, None).threads;
        build_layout(&threads, &GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_traversal_order() {
        let steps = traversal(&layout(&[2, 1]));
        assert_eq!(
            steps,
            vec![
                EmitStep::Spine,
                EmitStep::Hallway { branch: 0 },
                EmitStep::Room { branch: 0, room: 0 },
                EmitStep::Room { branch: 0, room: 1 },
                EmitStep::Treasure { branch: 0 },
                EmitStep::Hallway { branch: 1 },
                EmitStep::Room { branch: 1, room: 0 },
                EmitStep::Treasure { branch: 1 },
                EmitStep::Boss,
            ]
        );
    }

    #[test]
    fn test_every_step_stays_in_its_volume() {
        let layout = layout(&[3, 1, 4]);
        for step in traversal(&layout) {
            let volume = step_volume(&layout, step).unwrap();
            let chunk = emit_step(&layout, step).unwrap();
            assert!(!chunk.blocks.is_empty());
            assert!(chunk.blocks.iter().all(|b| volume.contains_point(b.pos)));
        }
    }

    #[test]
    fn test_side_records_match_blocks() {
        let layout = layout(&[2, 2, 2]);
        let emission = emit(&layout).unwrap();
        let signs = emission
            .blocks
            .iter()
            .filter(|b| b.block == BlockType::WallSign)
            .count();
        let chests = emission
            .blocks
            .iter()
            .filter(|b| b.block == BlockType::Chest)
            .count();
        assert_eq!(signs, emission.signs.len());
        assert_eq!(chests, emission.chests.len());
        assert_eq!(emission.signs.len(), 3);
        assert_eq!(emission.chests.len(), 3);
    }

    #[test]
    fn test_one_dragon() {
        let emission = emit(&layout(&[1])).unwrap();
        let spawners: Vec<_> = emission
            .blocks
            .iter()
            .filter(|b| b.block == BlockType::DragonSpawner)
            .collect();
        assert_eq!(spawners.len(), 1);
        assert_eq!(spawners[0].pos, emission.metadata.boss_room_position);
    }

    #[test]
    fn test_unknown_step_rejected() {
        let layout = layout(&[1]);
        let err = emit_step(&layout, EmitStep::Room { branch: 0, room: 5 }).unwrap_err();
        assert!(matches!(err, LayoutError::InvariantViolation(_)));
    }

    #[test]
    fn test_spine_hazards_emitted() {
        let single = emit_step(&layout(&[3]), EmitStep::Spine).unwrap();
        assert!(single.blocks.iter().all(|b| b.block != BlockType::Lava));

        let layout = layout(&[1, 1, 1, 1]);
        let chunk = emit_step(&layout, EmitStep::Spine).unwrap();
        let lava: Vec<_> = chunk.blocks.iter().filter(|b| b.block == BlockType::Lava).collect();
        let expected: usize = layout
            .spine
            .hazards
            .iter()
            .map(|h| h.pattern.floor_plan(&h.interior).hazard_count())
            .sum();
        assert_eq!(layout.spine.hazards.len(), 2);
        assert_eq!(lava.len(), expected);
        assert!(lava.iter().all(|b| b.pos.y == layout.floor_y));
    }

    #[test]
    fn test_escape_fails_whole_emission() {
        let mut layout = layout(&[2, 1]);
        // Boss door stays on the spine axis, now outside the boss room
        layout.boss.volume.min.x += 100;
        layout.boss.volume.max.x += 100;

        let err = emit(&layout).unwrap_err();
        assert!(matches!(err, LayoutError::InvariantViolation(_)));
        assert!(emit_step(&layout, EmitStep::Spine).is_ok());
        assert!(emit_step(&layout, EmitStep::Boss).is_err());
    }

    #[test]
    fn test_emit_is_repeatable() {
        let layout = layout(&[3, 2]);
        assert_eq!(emit(&layout).unwrap(), emit(&layout).unwrap());
    }
}
