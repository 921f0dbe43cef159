//! Puzzle segments
//!
//! Every puzzle room gets one pattern from a fixed library. Selection hashes
//! the room's position (or its message seed) so reruns reproduce the same
//! puzzles, and a difficulty scalar drives the pattern's parameters.

mod difficulty;
mod floor;
mod pattern;

pub use difficulty::{
    gap_width, hazard_percent, piston_count, pillar_spacing, room_difficulty, scale,
    spine_difficulty,
};
pub use floor::{Fixture, FloorCell, FloorPlan};
pub use pattern::{
    Hazard, Interior, MAX_JUMP_GAP, PatternKind, PuzzleGenerator, PuzzlePattern, RoomSlot,
};
