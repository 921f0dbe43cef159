//! Axis-aligned bounding volumes
//!
//! Every structure in a layout owns one volume. Bounds are inclusive on both
//! ends, so a volume from x=0 to x=4 is five blocks long.

use serde::{Deserialize, Serialize};

use crate::block::BlockPos;

/// An inclusive box of blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Volume {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl Volume {
    pub const fn new(min: BlockPos, max: BlockPos) -> Self {
        Self { min, max }
    }

    /// Volume of the given size (in blocks) starting at `origin`
    pub const fn sized(origin: BlockPos, size_x: i32, size_y: i32, size_z: i32) -> Self {
        Self {
            min: origin,
            max: BlockPos::new(
                origin.x + size_x - 1,
                origin.y + size_y - 1,
                origin.z + size_z - 1,
            ),
        }
    }

    /// Size along x
    pub fn size_x(&self) -> i32 {
        (self.max.x - self.min.x + 1).max(0)
    }

    /// Size along y
    pub fn size_y(&self) -> i32 {
        (self.max.y - self.min.y + 1).max(0)
    }

    /// Size along z
    pub fn size_z(&self) -> i32 {
        (self.max.z - self.min.z + 1).max(0)
    }

    /// Number of blocks in the volume
    pub fn block_count(&self) -> i64 {
        i64::from(self.size_x()) * i64::from(self.size_y()) * i64::from(self.size_z())
    }

    /// Check if the volume has at least one block
    pub fn is_valid(&self) -> bool {
        self.max.x >= self.min.x && self.max.y >= self.min.y && self.max.z >= self.min.z
    }

    pub fn contains_point(&self, p: BlockPos) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Check if this volume contains another
    pub fn contains(&self, other: &Volume) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Check if this volume shares at least one block with another
    pub fn intersects(&self, other: &Volume) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y
            || self.max.z < other.min.z
            || self.min.z > other.max.z)
    }

    /// Smallest volume containing both
    pub fn union(&self, other: &Volume) -> Volume {
        Volume {
            min: BlockPos::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: BlockPos::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Every position in a fixed order: x, then z, then y innermost
    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + use<> {
        let Volume { min, max } = *self;
        (min.x..=max.x).flat_map(move |x| {
            (min.z..=max.z).flat_map(move |z| (min.y..=max.y).map(move |y| BlockPos::new(x, y, z)))
        })
    }
}
