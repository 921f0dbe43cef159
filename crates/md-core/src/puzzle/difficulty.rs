//! Difficulty scalar and parameter mapping
//!
//! Every mapping here is monotonic in the difficulty and clamped so that the
//! hardest setting still leaves the room solvable.

use super::pattern::{Interior, MAX_JUMP_GAP};
use crate::config::DifficultyCurve;

/// Weight of a room's position along its branch
const ALONG_BRANCH_WEIGHT: f32 = 0.75;

/// Weight of the branch's position along the spine
const ALONG_SPINE_WEIGHT: f32 = 0.25;

/// Widest pillar spacing. The open gap (spacing - 1) stays under the flat
/// jump limit since reaching a pillar means jumping up.
const MAX_PILLAR_SPACING: i32 = MAX_JUMP_GAP;

/// Difficulty of a room
///
/// Grows with the room's index in its branch and with the branch's depth
/// along the spine. Single-message threads always get 0.
pub fn room_difficulty(
    curve: DifficultyCurve,
    room_index: usize,
    message_count: usize,
    junction_index: usize,
    junction_count: usize,
) -> f32 {
    if message_count <= 1 {
        return 0.0;
    }
    let along_branch = fraction(room_index, message_count);
    let along_spine = fraction(junction_index, junction_count);
    curve.apply(ALONG_BRANCH_WEIGHT * along_branch + ALONG_SPINE_WEIGHT * along_spine)
}

/// Difficulty of the hazard floor behind a junction; only depth counts
pub fn spine_difficulty(curve: DifficultyCurve, junction_index: usize, junction_count: usize) -> f32 {
    curve.apply(fraction(junction_index, junction_count))
}

/// Position of `index` among `count` items, from 0 to 1
fn fraction(index: usize, count: usize) -> f32 {
    if count > 1 {
        index.min(count - 1) as f32 / (count - 1) as f32
    } else {
        0.0
    }
}

/// Linear interpolation from `lo` to `hi`, rounded and clamped
pub fn scale(difficulty: f32, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        return lo;
    }
    let d = if difficulty.is_nan() { 0.0 } else { difficulty.clamp(0.0, 1.0) };
    lo + ((hi - lo) as f32 * d).round() as i32
}

/// Share of non-path stepping stone cells that are hazards
pub fn hazard_percent(difficulty: f32) -> u32 {
    scale(difficulty, 25, 75) as u32
}

/// Width of a jump gap; never above the jump limit or the space between landings
pub fn gap_width(difficulty: f32, interior: &Interior) -> i32 {
    let max = MAX_JUMP_GAP.min(interior.traversable_length()).max(1);
    scale(difficulty, 1, max)
}

/// Distance between consecutive pillars
pub fn pillar_spacing(difficulty: f32, interior: &Interior) -> i32 {
    let max = MAX_PILLAR_SPACING.min(interior.traversable_length()).max(1);
    scale(difficulty, 1, max)
}

/// Pistons along the north wall, one every other column
pub fn piston_count(difficulty: f32, interior: &Interior) -> i32 {
    let max = ((interior.length - 1) / 2).max(1);
    scale(difficulty, 1, max)
}
