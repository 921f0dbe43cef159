//! Error types for layout generation
//!
//! Three classes of failure exist. Bad input threads are dropped and reported
//! ([`InputError`]), an oversized layout is rejected so the caller can retry
//! with fewer threads ([`LayoutError::LayoutOverflow`]), and internal
//! inconsistencies abort the run ([`LayoutError::InvariantViolation`]).

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// World axis, used to report which dimension overflowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Reasons a raw thread is rejected during normalization
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("thread #{index} has no thread id")]
    MissingThreadId { index: usize },

    #[error("thread '{thread_id}' has no messages")]
    EmptyThread { thread_id: String },

    #[error("thread '{thread_id}' appears more than once")]
    DuplicateThread { thread_id: String },

    #[error("thread '{thread_id}' has more than one message with ordinal {ordinal}")]
    DuplicateOrdinal { thread_id: String, ordinal: u32 },
}

/// Invalid generator configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: i32,
        value: i32,
    },

    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        max: i32,
        value: i32,
    },

    #[error("pattern library size must be between 1 and {max}, got {value}")]
    PatternLibrarySize { value: usize, max: usize },

    #[error("stepped difficulty curve needs at least one step")]
    NoCurveSteps,

    #[error("rooms reach y={top} but the world is only {world_height} blocks tall")]
    TooTall { top: i32, world_height: i32 },
}

/// Layout generation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error(
        "layout needs {required} blocks along {axis} but the world allows {max} ({threads} threads, {fitting} would fit{})",
        offender_note(.offending)
    )]
    LayoutOverflow {
        axis: Axis,
        required: i32,
        max: i32,
        threads: usize,
        /// Threads kept when truncating to fit, newest first
        fitting: usize,
        /// Longest thread, when a branch is what overflows
        offending: Option<String>,
    },

    #[error("layout invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl LayoutError {
    /// Whether dropping threads and retrying can resolve this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LayoutError::LayoutOverflow { .. })
    }
}

fn offender_note(offending: &Option<String>) -> String {
    offending
        .as_ref()
        .map(|id| format!(", longest is '{id}'"))
        .unwrap_or_default()
}

/// Result alias for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
