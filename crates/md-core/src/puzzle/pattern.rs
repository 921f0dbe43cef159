//! Pattern library and selection

use serde::{Deserialize, Serialize};
use strum::Display;

use super::difficulty::{gap_width, hazard_percent, pillar_spacing, piston_count};
use super::floor::{Fixture, FloorCell, FloorPlan};
use crate::block::{BlockPos, BlockType, Orientation};
use crate::config::GeneratorConfig;
use crate::rng::{LayoutRng, mix64, pattern_key};

/// Most hazard cells a player clears in one level jump
pub const MAX_JUMP_GAP: i32 = 3;

/// Walkable space inside a room's walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interior {
    /// Along the travel direction
    pub length: i32,
    /// Across the travel direction
    pub width: i32,
    /// Clear air above the floor
    pub height: i32,
}

impl Interior {
    /// Row lined up with the doorways
    pub fn lane(&self) -> i32 {
        self.width / 2
    }

    /// Columns between the two landings
    pub fn traversable_length(&self) -> i32 {
        self.length - 2
    }
}

/// What a player falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    Lava,
    Void,
}

impl Hazard {
    /// Block placed at floor level
    pub fn block(self) -> BlockType {
        match self {
            Hazard::Lava => BlockType::Lava,
            Hazard::Void => BlockType::Air,
        }
    }
}

/// Entries of the pattern library, in selection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    LavaStones,
    VoidStones,
    GapJump,
    PillarHop,
    PistonGauntlet,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::LavaStones,
        PatternKind::VoidStones,
        PatternKind::GapJump,
        PatternKind::PillarHop,
        PatternKind::PistonGauntlet,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Pick from the first `library_size` entries
    pub fn from_key(key: u64, library_size: usize) -> Self {
        let size = library_size.clamp(1, Self::COUNT);
        Self::ALL[(key % size as u64) as usize]
    }
}

/// A pattern with its difficulty-derived parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum PuzzlePattern {
    /// Random walk of safe stones over a hazard floor
    SteppingStones {
        hazard: Hazard,
        hazard_percent: u32,
        layout_seed: u64,
    },
    /// A pit across the room
    GapJump { gap: i32 },
    /// Lava floor with single-block pillars along the center lane
    PillarHop { spacing: i32 },
    /// Pistons in the north wall fired by plates, pushing toward a lava strip
    PistonGauntlet { pistons: i32 },
}

impl PuzzlePattern {
    pub fn kind(&self) -> PatternKind {
        match self {
            PuzzlePattern::SteppingStones { hazard: Hazard::Lava, .. } => PatternKind::LavaStones,
            PuzzlePattern::SteppingStones { hazard: Hazard::Void, .. } => PatternKind::VoidStones,
            PuzzlePattern::GapJump { .. } => PatternKind::GapJump,
            PuzzlePattern::PillarHop { .. } => PatternKind::PillarHop,
            PuzzlePattern::PistonGauntlet { .. } => PatternKind::PistonGauntlet,
        }
    }

    /// Widest run of hazard cells the player has to jump
    pub fn hazard_span(&self) -> i32 {
        match *self {
            PuzzlePattern::GapJump { gap } => gap,
            PuzzlePattern::PillarHop { spacing } => spacing - 1,
            PuzzlePattern::SteppingStones { .. } | PuzzlePattern::PistonGauntlet { .. } => 0,
        }
    }

    /// Lay the pattern out over a room interior
    pub fn floor_plan(&self, interior: &Interior) -> FloorPlan {
        let mut plan = FloorPlan::new(interior, FloorCell::Solid);
        let last = interior.length - 1;
        let lane = interior.lane();

        match *self {
            PuzzlePattern::SteppingStones {
                hazard,
                hazard_percent,
                layout_seed,
            } => {
                let mut rng = LayoutRng::new(layout_seed);
                let mut safe = vec![false; (interior.length.max(0) * interior.width.max(0)) as usize];
                let mut mark = |x: i32, z: i32| safe[(x * interior.width + z) as usize] = true;

                let mut z = lane;
                for x in 1..last {
                    mark(x, z);
                    z = (z + rng.step()).clamp(0, interior.width - 1);
                    mark(x, z);
                }
                for x in 1..last {
                    for z in 0..interior.width {
                        if !safe[(x * interior.width + z) as usize] && rng.percent(hazard_percent) {
                            plan.set(x, z, FloorCell::Hazard(hazard));
                        }
                    }
                }
            }
            PuzzlePattern::GapJump { gap } => {
                let gap = gap.clamp(1, interior.traversable_length().max(1));
                let start = ((interior.length - gap) / 2).max(1);
                for x in start..(start + gap).min(last) {
                    plan.fill_column(x, FloorCell::Hazard(Hazard::Void));
                }
            }
            PuzzlePattern::PillarHop { spacing } => {
                let spacing = spacing.clamp(1, MAX_JUMP_GAP);
                for x in 1..last {
                    plan.fill_column(x, FloorCell::Hazard(Hazard::Lava));
                }
                for x in (spacing..last).step_by(spacing as usize) {
                    plan.set(x, lane, FloorCell::Pillar(1));
                }
            }
            PuzzlePattern::PistonGauntlet { pistons } => {
                for x in 1..last {
                    plan.set(x, interior.width - 1, FloorCell::Hazard(Hazard::Lava));
                }
                for x in (1..last).step_by(2).take(pistons.max(0) as usize) {
                    plan.add_fixture(Fixture {
                        offset: BlockPos::new(x, 1, -1),
                        block: BlockType::Piston,
                        orientation: Orientation::South,
                    });
                    plan.add_fixture(Fixture {
                        offset: BlockPos::new(x, 1, 0),
                        block: BlockType::StonePressurePlate,
                        orientation: Orientation::None,
                    });
                }
            }
        }
        plan
    }
}

/// Where a puzzle goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSlot {
    pub branch_index: usize,
    pub room_index: usize,
    /// Seed carried by the message, if any
    pub seed: Option<u64>,
}

/// Picks and parameterizes puzzle patterns
#[derive(Debug, Clone)]
pub struct PuzzleGenerator {
    interior: Interior,
    library_size: usize,
}

impl PuzzleGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            interior: config.interior(),
            library_size: config.pattern_library_size.clamp(1, PatternKind::COUNT),
        }
    }

    pub fn interior(&self) -> &Interior {
        &self.interior
    }

    /// Pattern for a room; the same slot and difficulty always give the same pattern
    pub fn generate(&self, slot: &RoomSlot, difficulty: f32) -> PuzzlePattern {
        let key = pattern_key(slot.branch_index, slot.room_index, slot.seed);
        let kind = PatternKind::from_key(key, self.library_size);
        self.instantiate(kind, key, difficulty)
    }

    pub fn instantiate(&self, kind: PatternKind, key: u64, difficulty: f32) -> PuzzlePattern {
        let interior = &self.interior;
        match kind {
            PatternKind::LavaStones | PatternKind::VoidStones => PuzzlePattern::SteppingStones {
                hazard: if kind == PatternKind::LavaStones {
                    Hazard::Lava
                } else {
                    Hazard::Void
                },
                hazard_percent: hazard_percent(difficulty),
                layout_seed: mix64(key),
            },
            PatternKind::GapJump => PuzzlePattern::GapJump {
                gap: gap_width(difficulty, interior),
            },
            PatternKind::PillarHop => PuzzlePattern::PillarHop {
                spacing: pillar_spacing(difficulty, interior),
            },
            PatternKind::PistonGauntlet => PuzzlePattern::PistonGauntlet {
                pistons: piston_count(difficulty, interior),
            },
        }
    }
}
