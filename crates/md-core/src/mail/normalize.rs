//! Thread normalization
//!
//! Invalid threads are dropped rather than failing the run. Every drop is
//! reported back with its reason so the caller can surface counts and ids.

use std::cmp::Ordering;

use hashbrown::HashSet;
use tracing::{debug, warn};

use super::thread::{Message, RawThread, Thread};
use crate::error::InputError;
use crate::rng::text_seed;

/// A raw thread rejected during normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedThread {
    /// Index in the raw input
    pub index: usize,
    pub reason: InputError,
}

/// Result of [`normalize`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedThreads {
    /// Kept threads in source order
    pub threads: Vec<Thread>,
    pub dropped: Vec<DroppedThread>,
}

impl NormalizedThreads {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    /// Reject the whole input if any thread was dropped
    pub fn into_strict(self) -> Result<Vec<Thread>, InputError> {
        match self.dropped.into_iter().next() {
            Some(dropped) => Err(dropped.reason),
            None => Ok(self.threads),
        }
    }
}

/// Normalize raw threads
///
/// Keeps source order, sorts each thread's messages by ordinal and caps them
/// at `message_cap` when set. Threads without an id, without messages, with a
/// repeated id or with repeated ordinals are dropped. Messages without a seed
/// take one derived from the thread's sender, when there is one.
pub fn normalize(raw: &[RawThread], message_cap: Option<usize>) -> NormalizedThreads {
    let mut result = NormalizedThreads::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, raw_thread) in raw.iter().enumerate() {
        match normalize_thread(index, raw_thread, &seen, message_cap) {
            Ok(thread) => {
                seen.insert(raw_thread.thread_id.trim());
                result.threads.push(thread);
            }
            Err(reason) => {
                debug!(index, %reason, "dropping thread");
                result.dropped.push(DroppedThread { index, reason });
            }
        }
    }

    if !result.dropped.is_empty() {
        warn!(
            dropped = result.dropped.len(),
            kept = result.threads.len(),
            "dropped invalid threads"
        );
    }

    assign_recency_ranks(&mut result.threads);
    result
}

fn normalize_thread(
    index: usize,
    raw: &RawThread,
    seen: &HashSet<&str>,
    message_cap: Option<usize>,
) -> Result<Thread, InputError> {
    let id = raw.thread_id.trim();
    if id.is_empty() {
        return Err(InputError::MissingThreadId { index });
    }
    if seen.contains(id) {
        return Err(InputError::DuplicateThread {
            thread_id: id.to_string(),
        });
    }
    if raw.messages.is_empty() {
        return Err(InputError::EmptyThread {
            thread_id: id.to_string(),
        });
    }

    let mut messages: Vec<_> = raw.messages.iter().collect();
    messages.sort_by_key(|m| m.ordinal);
    if let Some(pair) = messages.windows(2).find(|w| w[0].ordinal == w[1].ordinal) {
        return Err(InputError::DuplicateOrdinal {
            thread_id: id.to_string(),
            ordinal: pair[0].ordinal,
        });
    }
    if let Some(cap) = message_cap {
        messages.truncate(cap.max(1));
    }

    let first = messages[0];
    let sender = non_blank(first.from.as_deref());
    let sender_seed = sender.as_deref().map(text_seed);
    Ok(Thread {
        id: id.to_string(),
        source_index: index,
        messages: messages
            .iter()
            .map(|m| Message {
                ordinal: m.ordinal,
                seed: m.seed.or(sender_seed),
                sent_at: m.sent_at,
            })
            .collect(),
        recency_rank: 0,
        subject: non_blank(first.subject.as_deref()),
        sender,
    })
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Rank threads by latest activity, newest first
///
/// Threads without any dated message come after dated ones. Ties keep the
/// order of the slice.
pub fn assign_recency_ranks(threads: &mut [Thread]) {
    let latest: Vec<_> = threads.iter().map(Thread::latest_activity).collect();
    let mut order: Vec<usize> = (0..threads.len()).collect();
    order.sort_by(|&a, &b| {
        let by_date = match (latest[a], latest[b]) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_date.then(a.cmp(&b))
    });
    for (rank, idx) in order.into_iter().enumerate() {
        threads[idx].recency_rank = rank;
    }
}
