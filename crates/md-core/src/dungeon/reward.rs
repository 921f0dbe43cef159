//! Treasure room rewards

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::block::BlockType;

/// Equipment that can be found in a treasure chest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    StoneSword,
    LeatherTunic,
    Bread,
    IronSword,
    IronChestplate,
    Bow,
    Arrow,
    DiamondSword,
    DiamondChestplate,
    GoldenApple,
}

/// One stack in a chest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardItem {
    pub item: Equipment,
    pub count: u8,
}

impl RewardItem {
    const fn new(item: Equipment, count: u8) -> Self {
        Self { item, count }
    }
}

/// Reward class of a treasure room
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RewardTier {
    Plain,
    Gaudy,
    Legendary,
}

impl RewardTier {
    /// Tier for a thread
    ///
    /// Longer threads earn better rewards; threads in the most recent quarter
    /// are bumped one tier.
    pub fn for_thread(message_count: usize, recency_rank: usize, thread_count: usize) -> Self {
        let by_length = match message_count {
            0..=3 => RewardTier::Plain,
            4..=6 => RewardTier::Gaudy,
            _ => RewardTier::Legendary,
        };
        if recency_rank * 4 < thread_count {
            by_length.bump()
        } else {
            by_length
        }
    }

    fn bump(self) -> Self {
        match self {
            RewardTier::Plain => RewardTier::Gaudy,
            RewardTier::Gaudy | RewardTier::Legendary => RewardTier::Legendary,
        }
    }

    /// Chest contents for this tier
    pub fn rewards(self) -> Vec<RewardItem> {
        use Equipment::*;
        match self {
            RewardTier::Plain => vec![
                RewardItem::new(StoneSword, 1),
                RewardItem::new(LeatherTunic, 1),
                RewardItem::new(Bread, 4),
            ],
            RewardTier::Gaudy => vec![
                RewardItem::new(IronSword, 1),
                RewardItem::new(IronChestplate, 1),
                RewardItem::new(Bow, 1),
                RewardItem::new(Arrow, 16),
            ],
            RewardTier::Legendary => vec![
                RewardItem::new(DiamondSword, 1),
                RewardItem::new(DiamondChestplate, 1),
                RewardItem::new(Bow, 1),
                RewardItem::new(Arrow, 32),
                RewardItem::new(GoldenApple, 2),
            ],
        }
    }

    /// Floor of the treasure room
    pub fn floor_block(self) -> BlockType {
        match self {
            RewardTier::Plain => BlockType::Cobblestone,
            RewardTier::Gaudy => BlockType::GoldBlock,
            RewardTier::Legendary => BlockType::DiamondBlock,
        }
    }
}
