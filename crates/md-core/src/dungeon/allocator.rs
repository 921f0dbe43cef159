//! Spatial allocation
//!
//! Assigns a bounding volume to every structure before any topology is
//! built. The spine runs along +z with one junction every
//! `room_width + branch_clearance` blocks; branches extend along +x from the
//! spine's east wall, separated from it by the clearance gap which the branch
//! hallway fills. The boss room sits past the south end of the spine.
//!
//! ```text
//!   z
//!   |  [entrance]
//!   |  [  spine ]--hall--[room][room][room][treasure]
//!   |  [        ]
//!   |  [        ]--hall--[room][treasure]
//!   v  [  boss  ]
//! ```

use tracing::{debug, warn};

use super::volume::Volume;
use crate::block::BlockPos;
use crate::config::GeneratorConfig;
use crate::error::{Axis, LayoutError, LayoutResult};
use crate::mail::Thread;

/// Volumes of one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchAllocation {
    /// First z of the branch; the junction sits at its center line
    pub z: i32,
    pub hallway: Volume,
    /// One per message, chained along +x
    pub rooms: Vec<Volume>,
    pub treasure: Volume,
}

impl BranchAllocation {
    /// Volume covering the rooms and the treasure room
    pub fn bounds(&self) -> Volume {
        self.rooms
            .first()
            .map_or(self.treasure, |first| first.union(&self.treasure))
    }
}

/// Volumes for a whole layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub world: Volume,
    pub spine: Volume,
    pub entrance: Volume,
    pub axis_x: i32,
    pub branches: Vec<BranchAllocation>,
    pub boss: Volume,
}

impl Allocation {
    /// Check bounds, disjointness and room chaining
    pub fn verify(&self) -> LayoutResult<()> {
        let mut named: Vec<(String, Volume)> = vec![
            ("spine".to_string(), self.spine),
            ("boss room".to_string(), self.boss),
        ];
        for (i, branch) in self.branches.iter().enumerate() {
            named.push((format!("branch {i}"), branch.bounds()));
            named.push((format!("hallway {i}"), branch.hallway));

            let mut expected_x = branch.hallway.max.x + 1;
            for (k, room) in branch.rooms.iter().chain(Some(&branch.treasure)).enumerate() {
                if room.min.x != expected_x {
                    return Err(LayoutError::InvariantViolation(format!(
                        "room {k} of branch {i} starts at x={} instead of x={expected_x}",
                        room.min.x
                    )));
                }
                expected_x = room.max.x + 1;
            }
        }

        for (name, volume) in &named {
            if !volume.is_valid() || !self.world.contains(volume) {
                return Err(LayoutError::InvariantViolation(format!(
                    "{name} {volume:?} lies outside the world {:?}",
                    self.world
                )));
            }
        }

        for (i, (a_name, a)) in named.iter().enumerate() {
            for (b_name, b) in &named[i + 1..] {
                if a.intersects(b) {
                    return Err(LayoutError::InvariantViolation(format!(
                        "{a_name} intersects {b_name}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Computes volumes for a set of threads
#[derive(Debug, Clone, Copy)]
pub struct SpatialAllocator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> SpatialAllocator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// World box; horizontal coordinates run from 0 to `max_world_extent - 1`
    pub fn world(&self) -> Volume {
        Volume::sized(
            BlockPos::new(0, 0, 0),
            self.config.max_world_extent,
            self.config.world_height,
            self.config.max_world_extent,
        )
    }

    /// Center line shared by the spine and the boss room
    pub fn axis_x(&self) -> i32 {
        self.config.spine_width.max(self.config.boss_width) / 2
    }

    fn spine_min_x(&self) -> i32 {
        self.axis_x() - self.config.spine_width / 2
    }

    fn boss_min_x(&self) -> i32 {
        self.axis_x() - self.config.boss_width / 2
    }

    /// First x of every branch's first room
    pub fn branch_start_x(&self) -> i32 {
        self.spine_min_x() + self.config.spine_width + self.config.branch_clearance
    }

    /// Spine length for a number of branches
    pub fn spine_length(&self, branch_count: usize) -> i64 {
        i64::from(self.config.entrance_length)
            + branch_count as i64 * i64::from(self.config.junction_spacing())
    }

    /// Length along x of a branch's rooms plus treasure room
    pub fn branch_length(&self, message_count: usize) -> i64 {
        message_count as i64 * i64::from(self.config.room_length) + i64::from(self.config.treasure_length)
    }

    /// Extent needed along z
    pub fn required_z(&self, branch_count: usize) -> i64 {
        self.spine_length(branch_count) + i64::from(self.config.boss_length)
    }

    /// Extent needed along x for a branch of the given size
    pub fn required_x(&self, message_count: usize) -> i64 {
        let branch_end = i64::from(self.branch_start_x()) + self.branch_length(message_count);
        let boss_end = i64::from(self.boss_min_x() + self.config.boss_width);
        branch_end.max(boss_end)
    }

    /// Whether a branch of this size fits inside the world
    pub fn branch_fits(&self, message_count: usize) -> bool {
        self.required_x(message_count) <= i64::from(self.config.max_world_extent)
    }

    /// Whether a spine with this many junctions fits inside the world
    pub fn spine_fits(&self, branch_count: usize) -> bool {
        self.required_z(branch_count) <= i64::from(self.config.max_world_extent)
    }

    /// Indices of the threads that fit, in source order
    ///
    /// Walks threads from the most recent and keeps each one whose branch
    /// fits while the spine still has room for another junction.
    pub fn fitting_threads(&self, threads: &[Thread]) -> Vec<usize> {
        let mut by_recency: Vec<usize> = (0..threads.len()).collect();
        by_recency.sort_by_key(|&i| (threads[i].recency_rank, i));

        let mut kept = Vec::new();
        for i in by_recency {
            if self.branch_fits(threads[i].message_count()) && self.spine_fits(kept.len() + 1) {
                kept.push(i);
            }
        }
        kept.sort_unstable();
        kept
    }

    /// Reject thread sets whose footprint exceeds the world
    pub fn check_fit(&self, threads: &[Thread]) -> LayoutResult<()> {
        let max = self.config.max_world_extent;
        let overflow = |axis: Axis, required: i64, offending: Option<String>| -> LayoutResult<()> {
            let fitting = match axis {
                Axis::Y => 0,
                Axis::X | Axis::Z => self.fitting_threads(threads).len(),
            };
            warn!(%axis, required, max, threads = threads.len(), fitting, "layout does not fit");
            Err(LayoutError::LayoutOverflow {
                axis,
                required: i32::try_from(required).unwrap_or(i32::MAX),
                max,
                threads: threads.len(),
                fitting,
                offending,
            })
        };

        let (y_min, y_max) = self.config.vertical_span();
        if y_min < 0 || y_max >= self.config.world_height {
            return overflow(Axis::Y, i64::from(y_max) + 1, None);
        }

        if !self.spine_fits(threads.len()) {
            return overflow(Axis::Z, self.required_z(threads.len()), None);
        }

        // The first of the longest threads is the one reported.
        let longest = threads.iter().rev().max_by_key(|t| t.message_count());
        let longest_len = longest.map_or(0, Thread::message_count);
        if !self.branch_fits(longest_len) {
            return overflow(
                Axis::X,
                self.required_x(longest_len),
                longest.map(|t| t.id.clone()),
            );
        }
        Ok(())
    }

    /// Allocate volumes for the threads, in thread order
    pub fn allocate(&self, threads: &[Thread]) -> LayoutResult<Allocation> {
        self.check_fit(threads)?;

        let c = self.config;
        let (y_min, y_max) = c.vertical_span();
        let height = y_max - y_min + 1;

        // check_fit guarantees every extent below fits in i32
        let spine_len = self.spine_length(threads.len()) as i32;
        let spine_x = self.spine_min_x();
        let spine = Volume::sized(BlockPos::new(spine_x, y_min, 0), c.spine_width, height, spine_len);
        let entrance = Volume::sized(BlockPos::new(spine_x, y_min, 0), c.spine_width, height, c.entrance_length);

        let start_x = self.branch_start_x();
        let branches = threads
            .iter()
            .enumerate()
            .map(|(i, thread)| {
                let z = c.entrance_length + i as i32 * c.junction_spacing();
                let center_z = z + c.room_width / 2;
                let hallway = Volume::new(
                    BlockPos::new(spine.max.x + 1, y_min, center_z - 1),
                    BlockPos::new(start_x - 1, y_max, center_z + 1),
                );
                let rooms: Vec<Volume> = (0..thread.message_count() as i32)
                    .map(|k| {
                        Volume::sized(
                            BlockPos::new(start_x + k * c.room_length, y_min, z),
                            c.room_length,
                            height,
                            c.room_width,
                        )
                    })
                    .collect();
                let treasure_x = start_x + thread.message_count() as i32 * c.room_length;
                let treasure = Volume::sized(
                    BlockPos::new(treasure_x, y_min, z),
                    c.treasure_length,
                    height,
                    c.room_width,
                );
                BranchAllocation {
                    z,
                    hallway,
                    rooms,
                    treasure,
                }
            })
            .collect();

        let boss = Volume::sized(
            BlockPos::new(self.boss_min_x(), y_min, spine_len),
            c.boss_width,
            height,
            c.boss_length,
        );

        let allocation = Allocation {
            world: self.world(),
            spine,
            entrance,
            axis_x: self.axis_x(),
            branches,
            boss,
        };
        allocation.verify()?;

        debug!(
            branches = threads.len(),
            spine_length = spine_len,
            "allocated layout volumes"
        );
        Ok(allocation)
    }
}
