//! Per-entity renderers
//!
//! Each renderer writes one entity into a sink bounded by that entity's
//! volume. Order inside an entity is fixed: shell, openings, contents, light.

use super::sink::{BlockSink, Faces};
use crate::block::{BlockPos, BlockType, Orientation};
use crate::dungeon::{BossRoom, Branch, DungeonLayout, PuzzleRoom, TreasureRoom, Volume};
use crate::error::LayoutResult;
use crate::puzzle::{FloorCell, Hazard};

/// Blocks between ceiling lights along the spine
const SPINE_LIGHT_SPACING: usize = 4;

/// Inset of the boss room pillars from the walls
const BOSS_PILLAR_INSET: i32 = 2;

fn mid_z(v: &Volume) -> i32 {
    v.min.z + v.size_z() / 2
}

fn mid_x(v: &Volume) -> i32 {
    v.min.x + v.size_x() / 2
}

/// One floor plan cell over the floor block `at`; void pits run down to `pit_bottom`
fn floor_cell(sink: &mut BlockSink, at: BlockPos, cell: FloorCell, pit_bottom: i32) -> LayoutResult<()> {
    match cell {
        FloorCell::Solid => {}
        FloorCell::Hazard(hazard) => {
            let bottom = match hazard {
                Hazard::Lava => at.y,
                Hazard::Void => pit_bottom,
            };
            for y in (bottom..=at.y).rev() {
                sink.place(BlockPos::new(at.x, y, at.z), hazard.block())?;
            }
        }
        FloorCell::Pillar(h) => {
            for dy in 1..=h {
                sink.place(at.offset(0, dy, 0), BlockType::StoneBricks)?;
            }
        }
    }
    Ok(())
}

fn ceiling_light(sink: &mut BlockSink) -> LayoutResult<()> {
    let v = *sink.bounds();
    sink.place(BlockPos::new(mid_x(&v), v.max.y, mid_z(&v)), BlockType::Glowstone)
}

pub(super) fn spine(sink: &mut BlockSink, layout: &DungeonLayout) -> LayoutResult<()> {
    let spine = &layout.spine;
    let v = spine.volume;
    let f = layout.floor_y;

    sink.shell(f, BlockType::StoneBricks, Faces::all())?;
    for pos in spine.entrance.positions().filter(|p| p.y == f) {
        sink.place(pos, BlockType::Cobblestone)?;
    }

    for junction in &spine.junctions {
        sink.doorway(junction.doorway)?;
        sink.sign(junction.sign, Orientation::West, junction.sign_lines.clone())?;
    }
    sink.doorway(BlockPos::new(spine.axis_x, f + 1, v.max.z))?;

    for hazard in &spine.hazards {
        let plan = hazard.pattern.floor_plan(&hazard.interior);
        for (x, z, cell) in plan.cells() {
            floor_cell(sink, hazard.cell_position(x, z), cell, v.min.y)?;
        }
    }

    for z in (v.min.z + 2..v.max.z).step_by(SPINE_LIGHT_SPACING) {
        sink.place(BlockPos::new(spine.axis_x, v.max.y, z), BlockType::Glowstone)?;
    }
    Ok(())
}

pub(super) fn hallway(sink: &mut BlockSink, layout: &DungeonLayout) -> LayoutResult<()> {
    sink.shell(layout.floor_y, BlockType::StoneBricks, Faces::NORTH | Faces::SOUTH)
}

pub(super) fn room(sink: &mut BlockSink, layout: &DungeonLayout, room: &PuzzleRoom) -> LayoutResult<()> {
    let v = room.volume;
    let f = layout.floor_y;
    let z = mid_z(&v);

    sink.shell(f, BlockType::StoneBricks, Faces::all())?;
    sink.doorway(BlockPos::new(v.min.x, f + 1, z))?;
    sink.doorway(BlockPos::new(v.max.x, f + 1, z))?;

    let interior = layout.interior_of(&v);
    let plan = room.pattern.floor_plan(&interior);
    let origin = BlockPos::new(v.min.x + 1, f, v.min.z + 1);
    for (x, z, cell) in plan.cells() {
        floor_cell(sink, origin.offset(x, 0, z), cell, v.min.y)?;
    }
    for fixture in plan.fixtures() {
        let pos = origin.offset(fixture.offset.x, fixture.offset.y, fixture.offset.z);
        sink.place_facing(pos, fixture.block, fixture.orientation)?;
    }

    ceiling_light(sink)
}

pub(super) fn treasure(
    sink: &mut BlockSink,
    layout: &DungeonLayout,
    branch: &Branch,
) -> LayoutResult<()> {
    let TreasureRoom { volume, tier, rewards } = &branch.treasure;
    let f = layout.floor_y;
    let z = mid_z(volume);

    sink.shell(f, tier.floor_block(), Faces::all())?;
    sink.doorway(BlockPos::new(volume.min.x, f + 1, z))?;
    sink.chest(
        BlockPos::new(volume.max.x - 1, f + 1, z),
        Orientation::West,
        *tier,
        rewards.clone(),
    )?;
    ceiling_light(sink)
}

pub(super) fn boss(sink: &mut BlockSink, layout: &DungeonLayout, boss: &BossRoom) -> LayoutResult<()> {
    let v = boss.volume;
    let f = layout.floor_y;

    sink.shell(f, BlockType::Obsidian, Faces::all())?;
    sink.doorway(BlockPos::new(layout.spine.axis_x, f + 1, v.min.z))?;

    // Pillars only where they leave the center free
    if v.size_x() > 2 * (BOSS_PILLAR_INSET + 1) && v.size_z() > 2 * (BOSS_PILLAR_INSET + 1) {
        let xs = [v.min.x + BOSS_PILLAR_INSET, v.max.x - BOSS_PILLAR_INSET];
        let zs = [v.min.z + BOSS_PILLAR_INSET, v.max.z - BOSS_PILLAR_INSET];
        for x in xs {
            for z in zs {
                for y in f + 1..v.max.y {
                    sink.place(BlockPos::new(x, y, z), BlockType::Obsidian)?;
                }
            }
        }
    }

    sink.place(layout.boss_room_position(), BlockType::DragonSpawner)?;
    ceiling_light(sink)
}
