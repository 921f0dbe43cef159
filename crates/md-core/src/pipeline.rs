//! End-to-end generation
//!
//! Runs normalization, allocation, graph building and emission in order.
//! Nothing here retries: on [`crate::LayoutError::LayoutOverflow`] the caller decides
//! whether to call [`truncate_to_fit`] and try again.

use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::dungeon::{DungeonLayout, LayoutGraphBuilder, SpatialAllocator};
use crate::emit::{Emission, emit};
use crate::error::LayoutResult;
use crate::mail::{DroppedThread, RawThread, Thread, assign_recency_ranks, normalize};

/// A generated dungeon
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub layout: DungeonLayout,
    pub emission: Emission,
    /// Threads rejected during normalization
    pub dropped: Vec<DroppedThread>,
}

/// Threads split by whether they fit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    /// Kept threads in source order, recency ranks recomputed
    pub kept: Vec<Thread>,
    /// Ids of the threads left out
    pub excluded: Vec<String>,
}

/// Allocate volumes and build the layout graph
pub fn build_layout(threads: &[Thread], config: &GeneratorConfig) -> LayoutResult<DungeonLayout> {
    config.validate()?;
    let allocation = SpatialAllocator::new(config).allocate(threads)?;
    LayoutGraphBuilder::new(config).build(threads, allocation)
}

/// Build and emit a dungeon from normalized threads
pub fn generate_from_threads(threads: &[Thread], config: &GeneratorConfig) -> LayoutResult<Generated> {
    let layout = build_layout(threads, config)?;
    debug!(
        branches = layout.branch_count(),
        rooms = layout.room_count(),
        "built layout"
    );
    let emission = emit(&layout)?;
    Ok(Generated {
        layout,
        emission,
        dropped: Vec::new(),
    })
}

/// Normalize raw threads, then build and emit a dungeon
///
/// Invalid threads are dropped and listed in [`Generated::dropped`].
pub fn generate(raw: &[RawThread], config: &GeneratorConfig) -> LayoutResult<Generated> {
    config.validate()?;
    let normalized = normalize(raw, config.message_cap);
    let mut generated = generate_from_threads(&normalized.threads, config)?;
    generated.dropped = normalized.dropped;
    Ok(generated)
}

/// Keep the most recent threads that fit inside the world
pub fn truncate_to_fit(threads: Vec<Thread>, config: &GeneratorConfig) -> Truncation {
    let fitting = SpatialAllocator::new(config).fitting_threads(&threads);

    let mut kept = Vec::with_capacity(fitting.len());
    let mut excluded = Vec::new();
    let mut next = fitting.iter().peekable();
    for (i, thread) in threads.into_iter().enumerate() {
        if next.next_if_eq(&&i).is_some() {
            kept.push(thread);
        } else {
            excluded.push(thread.id);
        }
    }
    assign_recency_ranks(&mut kept);

    if !excluded.is_empty() {
        warn!(kept = kept.len(), excluded = excluded.len(), "truncated thread set to fit");
    }
    Truncation { kept, excluded }
}
