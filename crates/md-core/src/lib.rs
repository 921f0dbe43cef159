//! md-core: Dungeon layout generator for mail threads
//!
//! Maps an ordered set of mail threads onto a spine of junctions with one
//! branch of puzzle rooms per thread, a treasure room at the end of every
//! branch and a boss room at the end of the spine, then renders the layout
//! into block placement instructions.
//!
//! This crate contains no I/O. Fetching threads and writing the rendered
//! blocks to a world save belong to the callers.

pub mod block;
pub mod config;
pub mod dungeon;
pub mod emit;
pub mod mail;
pub mod pipeline;
pub mod puzzle;

mod error;
mod rng;

pub use config::{DifficultyCurve, GeneratorConfig, PIT_DEPTH};
pub use error::{Axis, ConfigError, InputError, LayoutError, LayoutResult};
pub use pipeline::{Generated, Truncation, build_layout, generate, generate_from_threads, truncate_to_fit};
pub use rng::{LayoutRng, mix64, pattern_key, spine_key, text_seed};
