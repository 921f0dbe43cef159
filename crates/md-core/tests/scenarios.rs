use md_core::block::{BlockPos, BlockType};
use md_core::dungeon::RewardTier;
use md_core::emit::{EmitStep, traversal};
use md_core::mail::{RawThread, normalize};
use md_core::{Axis, GeneratorConfig, LayoutError, generate, generate_from_threads, truncate_to_fit};

fn counts(counts: &[usize]) -> Vec<RawThread> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &m)| RawThread::with_message_count(format!("t{i}"), m))
        .collect()
}

#[test]
fn one_thread_three_messages() {
    let generated = generate(&counts(&[3]), &GeneratorConfig::default()).unwrap();
    let layout = &generated.layout;

    assert_eq!(layout.spine.junction_count(), 1);
    assert_eq!(layout.branch_count(), 1);
    assert_eq!(layout.branches[0].room_count(), 3);
    assert!(!layout.branches[0].treasure.rewards.is_empty());
    assert_eq!(
        traversal(layout),
        vec![
            EmitStep::Spine,
            EmitStep::Hallway { branch: 0 },
            EmitStep::Room { branch: 0, room: 0 },
            EmitStep::Room { branch: 0, room: 1 },
            EmitStep::Room { branch: 0, room: 2 },
            EmitStep::Treasure { branch: 0 },
            EmitStep::Boss,
        ]
    );

    let metadata = generated.emission.metadata;
    assert_eq!(metadata.branch_count, 1);
    assert_eq!(metadata.spine_length, layout.spine.length());
    assert!(layout.spine.volume.contains_point(metadata.player_start));
    assert!(layout.boss.volume.contains_point(metadata.boss_room_position));
}

#[test]
fn no_valid_threads_gives_spine_and_boss() {
    let generated = generate(&counts(&[0, 0]), &GeneratorConfig::default()).unwrap();
    assert_eq!(generated.dropped.len(), 2);
    assert_eq!(generated.layout.branch_count(), 0);
    assert_eq!(
        traversal(&generated.layout),
        vec![EmitStep::Spine, EmitStep::Boss]
    );
    assert!(generated.emission.signs.is_empty());
    assert!(generated.emission.chests.is_empty());
    assert!(!generated.emission.blocks.is_empty());
}

#[test]
fn empty_input() {
    let generated = generate(&[], &GeneratorConfig::default()).unwrap();
    assert_eq!(generated.layout.branch_count(), 0);
    assert_eq!(generated.emission.metadata.branch_count, 0);
}

#[test]
fn oversized_input_fails_before_emission() {
    let config = GeneratorConfig {
        max_world_extent: 128,
        ..Default::default()
    };
    let err = generate(&counts(&[2; 20]), &config).unwrap_err();
    match err {
        LayoutError::LayoutOverflow {
            axis,
            max,
            threads,
            fitting,
            ..
        } => {
            assert_eq!(axis, Axis::Z);
            assert_eq!(max, 128);
            assert_eq!(threads, 20);
            assert_eq!(fitting, 10);
        }
        other => panic!("expected overflow, got {other:?}"),
    }
}

#[test]
fn overlong_thread_is_named() {
    let config = GeneratorConfig {
        max_world_extent: 128,
        ..Default::default()
    };
    let err = generate(&counts(&[2, 40, 3]), &config).unwrap_err();
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("'t1'"));
}

#[test]
fn truncation_recovers_from_overflow() {
    let config = GeneratorConfig {
        max_world_extent: 128,
        ..Default::default()
    };
    let threads = normalize(&counts(&[2; 20]), None).threads;
    assert!(generate_from_threads(&threads, &config).is_err());

    let truncation = truncate_to_fit(threads, &config);
    assert_eq!(truncation.kept.len(), 10);
    assert_eq!(truncation.excluded.len(), 10);
    let generated = generate_from_threads(&truncation.kept, &config).unwrap();
    assert_eq!(generated.layout.branch_count(), 10);
}

#[test]
fn treasure_chest_matches_tier() {
    let generated = generate(&counts(&[8]), &GeneratorConfig::default()).unwrap();
    let chest = &generated.emission.chests[0];
    assert_eq!(chest.tier, RewardTier::Legendary);
    assert_eq!(chest.items, RewardTier::Legendary.rewards());

    let treasure = &generated.layout.branches[0].treasure.volume;
    let floor = generated
        .emission
        .blocks
        .iter()
        .find(|b| b.pos == BlockPos::new(treasure.min.x + 1, generated.layout.floor_y, treasure.min.z + 1))
        .map(|b| b.block);
    assert_eq!(floor, Some(BlockType::DiamondBlock));
}

#[test]
fn junction_sign_text_emitted() {
    let generated = generate(&counts(&[2, 5]), &GeneratorConfig::default()).unwrap();
    let lines: Vec<_> = generated
        .emission
        .signs
        .iter()
        .map(|s| s.lines[0].as_str())
        .collect();
    assert_eq!(lines, ["t0", "t1"]);
    assert_eq!(generated.emission.signs[1].lines[2], "5 rooms");
}
