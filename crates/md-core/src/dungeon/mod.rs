//! Dungeon layout
//!
//! Allocation computes disjoint volumes for the spine, every branch and the
//! boss room. The builder then fills those volumes with junctions, spine
//! hazard floors, puzzle rooms and treasure rooms to form the layout graph.

mod allocator;
mod builder;
mod layout;
mod reward;
mod volume;

pub use allocator::{Allocation, BranchAllocation, SpatialAllocator};
pub use builder::{LayoutGraphBuilder, SIGN_LINE_WIDTH};
pub use layout::{
    BossEncounter, BossRoom, Branch, DungeonLayout, JunctionPoint, LayoutMetadata, PuzzleRoom,
    Spine, SpineHazard, TreasureRoom,
};
pub use reward::{Equipment, RewardItem, RewardTier};
pub use volume::Volume;
