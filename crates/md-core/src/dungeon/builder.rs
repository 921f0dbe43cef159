//! Layout graph construction
//!
//! Turns an [`Allocation`] and the threads it was computed from into a
//! [`DungeonLayout`]: junction signs on the spine, a hazard floor behind
//! every second junction, one puzzle per message, the treasure tier of each
//! branch and the boss room.

use tracing::{debug, trace};

use super::allocator::Allocation;
use super::layout::{
    BossEncounter, BossRoom, Branch, DungeonLayout, JunctionPoint, PuzzleRoom, Spine, SpineHazard,
    TreasureRoom,
};
use super::reward::RewardTier;
use super::volume::Volume;
use crate::block::BlockPos;
use crate::config::GeneratorConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::mail::Thread;
use crate::puzzle::{
    Interior, PatternKind, PuzzleGenerator, RoomSlot, room_difficulty, spine_difficulty,
};
use crate::rng::spine_key;

/// Characters that fit on one sign line
pub const SIGN_LINE_WIDTH: usize = 15;

/// Junctions from this index on get void pits under the spine instead of lava
const SPINE_VOID_FROM: usize = 8;

/// Shortest spine hazard floor: two landings and one hazard row
const MIN_SPINE_HAZARD_LENGTH: i32 = 3;

/// Builds the layout graph from allocated volumes
#[derive(Debug, Clone)]
pub struct LayoutGraphBuilder<'a> {
    config: &'a GeneratorConfig,
    puzzles: PuzzleGenerator,
}

impl<'a> LayoutGraphBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            puzzles: PuzzleGenerator::new(config),
        }
    }

    pub fn build(&self, threads: &[Thread], allocation: Allocation) -> LayoutResult<DungeonLayout> {
        if allocation.branches.len() != threads.len() {
            return Err(LayoutError::InvariantViolation(format!(
                "{} branch volumes for {} threads",
                allocation.branches.len(),
                threads.len()
            )));
        }

        let floor_y = self.config.floor_y;
        let spine_volume = allocation.spine;
        let thread_count = threads.len();

        let mut junctions = Vec::with_capacity(thread_count);
        let mut branches = Vec::with_capacity(thread_count);

        for (index, (thread, volumes)) in threads.iter().zip(allocation.branches).enumerate() {
            if volumes.rooms.len() != thread.message_count() {
                return Err(LayoutError::InvariantViolation(format!(
                    "branch {index} has {} rooms for {} messages",
                    volumes.rooms.len(),
                    thread.message_count()
                )));
            }

            let z = volumes.z + self.config.room_width / 2;
            junctions.push(JunctionPoint {
                index,
                z,
                doorway: BlockPos::new(spine_volume.max.x, floor_y + 1, z),
                sign: BlockPos::new(spine_volume.max.x - 1, floor_y + 2, z + 1),
                sign_lines: sign_lines(thread),
            });

            let mut rooms = Vec::with_capacity(thread.message_count());
            for (room_index, (volume, message)) in volumes.rooms.into_iter().zip(&thread.messages).enumerate() {
                let difficulty = room_difficulty(
                    self.config.difficulty_curve,
                    room_index,
                    thread.message_count(),
                    index,
                    thread_count,
                );
                let slot = RoomSlot {
                    branch_index: index,
                    room_index,
                    seed: message.seed,
                };
                let pattern = self.puzzles.generate(&slot, difficulty);

                let interior = self.puzzles.interior();
                if !pattern.floor_plan(interior).is_traversable(interior.lane()) {
                    return Err(LayoutError::InvariantViolation(format!(
                        "room {room_index} of thread {} cannot be crossed: {pattern:?}",
                        thread.id
                    )));
                }
                if let Some(prev) = rooms.last().map(|r: &PuzzleRoom| r.difficulty) {
                    if difficulty < prev {
                        return Err(LayoutError::InvariantViolation(format!(
                            "difficulty drops from {prev} to {difficulty} in thread {}",
                            thread.id
                        )));
                    }
                }
                trace!(thread = %thread.id, room_index, kind = %pattern.kind(), difficulty, "placed puzzle");

                rooms.push(PuzzleRoom {
                    index: room_index,
                    ordinal: message.ordinal,
                    volume,
                    pattern,
                    difficulty,
                });
            }

            let tier = RewardTier::for_thread(thread.message_count(), thread.recency_rank, thread_count);
            debug!(thread = %thread.id, rooms = rooms.len(), %tier, "built branch");

            branches.push(Branch {
                index,
                thread_id: thread.id.clone(),
                hallway: volumes.hallway,
                rooms,
                treasure: TreasureRoom {
                    volume: volumes.treasure,
                    tier,
                    rewards: tier.rewards(),
                },
            });
        }

        let hazards = self.spine_hazards(&spine_volume, &junctions)?;

        Ok(DungeonLayout {
            spine: Spine {
                volume: spine_volume,
                entrance: allocation.entrance,
                axis_x: allocation.axis_x,
                junctions,
                hazards,
            },
            branches,
            boss: BossRoom {
                volume: allocation.boss,
                encounter: BossEncounter::Dragon,
            },
            floor_y,
            world: allocation.world,
        })
    }

    /// Stepping stone floors behind every odd junction
    ///
    /// A segment starts past the junction's sign and ends on the landing in
    /// front of the next junction, or of the boss door after the last one.
    fn spine_hazards(&self, spine: &Volume, junctions: &[JunctionPoint]) -> LayoutResult<Vec<SpineHazard>> {
        let mut hazards = Vec::new();
        for junction in junctions.iter().filter(|j| j.index % 2 == 1) {
            let start = junction.sign.z + 1;
            let end = match junctions.get(junction.index + 1) {
                Some(next) => next.z - 2,
                None => spine.max.z - 1,
            };
            let interior = Interior {
                length: end - start + 1,
                width: spine.size_x() - 2,
                height: self.config.room_height,
            };
            if interior.length < MIN_SPINE_HAZARD_LENGTH {
                continue;
            }

            let kind = if junction.index < SPINE_VOID_FROM {
                PatternKind::LavaStones
            } else {
                PatternKind::VoidStones
            };
            let difficulty = spine_difficulty(self.config.difficulty_curve, junction.index, junctions.len());
            let pattern = self.puzzles.instantiate(kind, spine_key(junction.index), difficulty);
            if !pattern.floor_plan(&interior).is_traversable(interior.lane()) {
                return Err(LayoutError::InvariantViolation(format!(
                    "spine floor after junction {} cannot be crossed: {pattern:?}",
                    junction.index
                )));
            }
            trace!(junction = junction.index, kind = %kind, length = interior.length, "placed spine hazard");

            hazards.push(SpineHazard {
                after_junction: junction.index,
                origin: BlockPos::new(spine.min.x + 1, self.config.floor_y, start),
                interior,
                pattern,
            });
        }
        Ok(hazards)
    }
}

fn sign_lines(thread: &Thread) -> [String; 4] {
    let title = thread.subject.as_deref().unwrap_or(&thread.id);
    let rooms = match thread.message_count() {
        1 => "1 room".to_string(),
        n => format!("{n} rooms"),
    };
    [
        clip(title),
        clip(thread.sender.as_deref().unwrap_or_default()),
        rooms,
        String::new(),
    ]
}

fn clip(s: &str) -> String {
    s.chars().take(SIGN_LINE_WIDTH).collect()
}
