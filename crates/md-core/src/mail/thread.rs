//! Thread and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message as supplied by the mail fetcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawMessage {
    /// Position within the thread
    pub ordinal: u32,
    /// Seed used to pick a reproducible puzzle variant
    pub seed: Option<u64>,
    pub sent_at: Option<DateTime<Utc>>,
    pub from: Option<String>,
    pub subject: Option<String>,
}

/// Thread as supplied by the mail fetcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawThread {
    pub thread_id: String,
    pub messages: Vec<RawMessage>,
}

impl RawThread {
    /// Thread whose messages carry only ordinals
    pub fn with_message_count(thread_id: impl Into<String>, count: usize) -> Self {
        Self {
            thread_id: thread_id.into(),
            messages: (0..count)
                .map(|i| RawMessage {
                    ordinal: i as u32,
                    ..Default::default()
                })
                .collect(),
        }
    }
}

/// A message mapped to one puzzle room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub ordinal: u32,
    /// The message's own seed, else one derived from the thread's sender
    pub seed: Option<u64>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// A normalized thread, the source of one branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    /// Thread key
    pub id: String,
    /// Index of the thread in the raw input
    pub source_index: usize,
    /// Messages ordered by ordinal; never empty
    pub messages: Vec<Message>,
    /// 0 for the most recently active thread
    pub recency_rank: usize,
    /// Subject of the first message, shown on the junction sign
    pub subject: Option<String>,
    /// Sender of the first message, shown on the junction sign
    pub sender: Option<String>,
}

impl Thread {
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Timestamp of the newest message, if any message is dated
    pub fn latest_activity(&self) -> Option<DateTime<Utc>> {
        self.messages.iter().filter_map(|m| m.sent_at).max()
    }
}
