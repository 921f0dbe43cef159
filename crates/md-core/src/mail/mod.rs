//! Mail thread model
//!
//! Raw thread dumps from a mail fetcher are normalized here into the
//! [`Thread`] representation the layout generator consumes.

mod normalize;
mod thread;

pub use normalize::{DroppedThread, NormalizedThreads, assign_recency_ranks, normalize};
pub use thread::{Message, RawMessage, RawThread, Thread};
