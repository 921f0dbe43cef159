//! Dungeon layout graph
//!
//! The layout owns every structure: the spine with its junctions, one branch
//! per thread and the boss room. Nothing is shared between branches.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::reward::{RewardItem, RewardTier};
use super::volume::Volume;
use crate::block::BlockPos;
use crate::puzzle::{Interior, PuzzlePattern};

/// Where a branch attaches to the spine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionPoint {
    /// Index of the branch attached here
    pub index: usize,
    /// Center of the branch along the spine
    pub z: i32,
    /// Opening in the spine wall leading to the branch hallway
    pub doorway: BlockPos,
    /// Sign next to the doorway
    pub sign: BlockPos,
    pub sign_lines: [String; 4],
}

/// Hazard floor across the spine behind every second junction
///
/// The floor plan runs along the spine: plan `x` maps to world `z` and plan
/// `z` to world `x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpineHazard {
    /// Junction the segment follows
    pub after_junction: usize,
    /// Floor block under plan cell `(0, 0)`
    pub origin: BlockPos,
    pub interior: Interior,
    pub pattern: PuzzlePattern,
}

impl SpineHazard {
    /// Floor block under a plan cell
    pub fn cell_position(&self, x: i32, z: i32) -> BlockPos {
        self.origin.offset(z, 0, x)
    }
}

/// The main corridor from the entrance to the boss room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spine {
    pub volume: Volume,
    /// Part of the spine before the first junction
    pub entrance: Volume,
    /// X of the walkable center line
    pub axis_x: i32,
    /// Junctions ordered by increasing z
    pub junctions: Vec<JunctionPoint>,
    /// Hazard floors ordered by increasing z
    pub hazards: Vec<SpineHazard>,
}

impl Spine {
    /// Length along z
    pub fn length(&self) -> i32 {
        self.volume.size_z()
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }
}

/// Room generated from one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleRoom {
    /// Position within the branch
    pub index: usize,
    /// Ordinal of the source message
    pub ordinal: u32,
    pub volume: Volume,
    pub pattern: PuzzlePattern,
    /// In `[0, 1]`, non-decreasing along the branch
    pub difficulty: f32,
}

/// Room closing a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureRoom {
    pub volume: Volume,
    pub tier: RewardTier,
    pub rewards: Vec<RewardItem>,
}

/// Branch generated from one thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub index: usize,
    pub thread_id: String,
    /// Passage across the clearance gap between spine and first room
    pub hallway: Volume,
    pub rooms: Vec<PuzzleRoom>,
    pub treasure: TreasureRoom,
}

impl Branch {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Volume covering the rooms and the treasure room
    pub fn bounds(&self) -> Volume {
        self.rooms
            .iter()
            .fold(self.treasure.volume, |acc, room| acc.union(&room.volume))
    }
}

/// Fixed encounter of the boss room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BossEncounter {
    #[default]
    Dragon,
}

/// Room at the end of the spine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossRoom {
    pub volume: Volume,
    pub encounter: BossEncounter,
}

/// Placement data for the map writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetadata {
    pub spine_length: i32,
    pub branch_count: usize,
    pub boss_room_position: BlockPos,
    pub player_start: BlockPos,
}

/// A complete dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub spine: Spine,
    pub branches: Vec<Branch>,
    pub boss: BossRoom,
    /// Y of the floor layer shared by every structure
    pub floor_y: i32,
    /// World box every volume lies in
    pub world: Volume,
}

impl DungeonLayout {
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Puzzle rooms over all branches
    pub fn room_count(&self) -> usize {
        self.branches.iter().map(Branch::room_count).sum()
    }

    /// Walkable interior of a room-like volume
    pub fn interior_of(&self, volume: &Volume) -> Interior {
        Interior {
            length: volume.size_x() - 2,
            width: volume.size_z() - 2,
            height: volume.max.y - self.floor_y - 1,
        }
    }

    /// Center of the boss room floor, one block up
    pub fn boss_room_position(&self) -> BlockPos {
        let v = &self.boss.volume;
        BlockPos::new((v.min.x + v.max.x) / 2, self.floor_y + 1, (v.min.z + v.max.z) / 2)
    }

    /// Where the player spawns, just inside the entrance
    pub fn player_start(&self) -> BlockPos {
        BlockPos::new(self.spine.axis_x, self.floor_y + 1, self.spine.volume.min.z + 2)
    }

    pub fn metadata(&self) -> LayoutMetadata {
        LayoutMetadata {
            spine_length: self.spine.length(),
            branch_count: self.branch_count(),
            boss_room_position: self.boss_room_position(),
            player_start: self.player_start(),
        }
    }
}
