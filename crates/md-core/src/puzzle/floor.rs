//! Floor plans
//!
//! A floor plan is the interior floor of a puzzle room as a grid, indexed by
//! `x` along the travel direction and `z` across it, plus fixtures placed
//! relative to the interior's floor origin. Column 0 and the last column are
//! the landings in front of the two doorways.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::pattern::{Hazard, Interior, MAX_JUMP_GAP};
use crate::block::{BlockPos, BlockType, Orientation};

/// One floor cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloorCell {
    Solid,
    Hazard(Hazard),
    /// Solid column rising the given number of blocks above the floor
    Pillar(i32),
}

impl FloorCell {
    /// Height a player stands at on this cell, relative to the floor
    pub fn standing_height(self) -> Option<i32> {
        match self {
            FloorCell::Solid => Some(0),
            FloorCell::Pillar(h) => Some(h),
            FloorCell::Hazard(_) => None,
        }
    }
}

/// A block placed relative to the interior floor origin
///
/// `offset.y` is measured from the floor layer, so `y = 1` is the first air
/// block. `z = -1` addresses the north wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub offset: BlockPos,
    pub block: BlockType,
    pub orientation: Orientation,
}

/// Interior floor of a puzzle room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorPlan {
    length: i32,
    width: i32,
    cells: Vec<FloorCell>,
    fixtures: Vec<Fixture>,
}

impl FloorPlan {
    pub fn new(interior: &Interior, fill: FloorCell) -> Self {
        let length = interior.length.max(0);
        let width = interior.width.max(0);
        Self {
            length,
            width,
            cells: vec![fill; (length * width) as usize],
            fixtures: Vec::new(),
        }
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x >= self.length || z >= self.width {
            return None;
        }
        Some((x * self.width + z) as usize)
    }

    pub fn get(&self, x: i32, z: i32) -> Option<FloorCell> {
        self.index(x, z).map(|i| self.cells[i])
    }

    /// Set a cell; out-of-range coordinates are ignored
    pub fn set(&mut self, x: i32, z: i32, cell: FloorCell) {
        if let Some(i) = self.index(x, z) {
            self.cells[i] = cell;
        }
    }

    /// Set a whole column across the room
    pub fn fill_column(&mut self, x: i32, cell: FloorCell) {
        for z in 0..self.width {
            self.set(x, z, cell);
        }
    }

    pub fn add_fixture(&mut self, fixture: Fixture) {
        self.fixtures.push(fixture);
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Cells in emission order: x outer, z inner
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, FloorCell)> + '_ {
        (0..self.length).flat_map(move |x| {
            (0..self.width).map(move |z| (x, z, self.cells[(x * self.width + z) as usize]))
        })
    }

    pub fn hazard_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, FloorCell::Hazard(_)))
            .count()
    }

    /// Whether a player entering at `(0, lane)` can reach `(length - 1, lane)`
    ///
    /// Walking moves one cell in any horizontal direction and may climb one
    /// block. Jumps cross up to [`MAX_JUMP_GAP`] hazard cells in a straight
    /// line when landing level or lower, or one cell less when landing one
    /// block higher.
    pub fn is_traversable(&self, lane: i32) -> bool {
        let (Some(start), Some(goal)) = (self.index(0, lane), self.index(self.length - 1, lane)) else {
            return false;
        };
        if self.cells[start].standing_height().is_none() {
            return false;
        }

        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([(0, lane)]);
        seen[start] = true;

        while let Some((x, z)) = queue.pop_front() {
            if self.index(x, z) == Some(goal) {
                return true;
            }
            let Some(from) = self.get(x, z).and_then(FloorCell::standing_height) else {
                continue;
            };
            for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                for step in 1..=MAX_JUMP_GAP + 1 {
                    let (nx, nz) = (x + dx * step, z + dz * step);
                    let Some(cell) = self.get(nx, nz) else {
                        break;
                    };
                    let Some(to) = cell.standing_height() else {
                        continue;
                    };
                    if can_reach(from, to, step - 1) {
                        let i = (nx * self.width + nz) as usize;
                        if !seen[i] {
                            seen[i] = true;
                            queue.push_back((nx, nz));
                        }
                    }
                    break;
                }
            }
        }
        false
    }
}

fn can_reach(from: i32, to: i32, gap: i32) -> bool {
    let rise = to - from;
    match gap {
        0 => rise <= 1,
        _ if rise <= 0 => gap <= MAX_JUMP_GAP,
        _ => rise == 1 && gap < MAX_JUMP_GAP,
    }
}
