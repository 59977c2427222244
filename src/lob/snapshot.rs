//! Fixed-depth MBP snapshot.
//!
//! An `MbpSnapshot` always holds exactly `depth` entries per side, best
//! price first. Slots past the last populated level are padding: no price,
//! zero size, zero count.

use serde::{Deserialize, Serialize};

use super::ladder::PriceLadder;

/// One ranked slot of a snapshot side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    /// Level price, `None` for padding
    pub price: Option<i64>,
    /// Aggregate resting size
    pub size: u64,
    /// Resting order count
    pub count: u64,
}

impl LevelEntry {
    /// Padding slot.
    pub const EMPTY: LevelEntry = LevelEntry {
        price: None,
        size: 0,
        count: 0,
    };

    /// Populated slot.
    #[inline]
    pub fn new(price: i64, size: u64, count: u64) -> Self {
        Self {
            price: Some(price),
            size,
            count,
        }
    }

    /// True for padding slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
    }
}

/// Top-N levels per side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbpSnapshot {
    /// Bid slots (highest price first)
    pub bids: Vec<LevelEntry>,
    /// Ask slots (lowest price first)
    pub asks: Vec<LevelEntry>,
}

impl MbpSnapshot {
    /// All-padding snapshot of the given depth.
    pub fn new(depth: usize) -> Self {
        Self {
            bids: vec![LevelEntry::EMPTY; depth],
            asks: vec![LevelEntry::EMPTY; depth],
        }
    }

    /// Number of slots per side.
    #[inline]
    pub fn depth(&self) -> usize {
        self.bids.len()
    }

    /// Overwrite every slot from the two ladders, keeping the current depth.
    pub fn fill_from(&mut self, bids: &PriceLadder, asks: &PriceLadder) {
        fill_side(&mut self.bids, bids);
        fill_side(&mut self.asks, asks);
    }

    /// Change the depth, then refill.
    pub fn fill_from_with_depth(&mut self, bids: &PriceLadder, asks: &PriceLadder, depth: usize) {
        self.bids.resize(depth, LevelEntry::EMPTY);
        self.asks.resize(depth, LevelEntry::EMPTY);
        self.fill_from(bids, asks);
    }

    /// Best bid price.
    #[inline]
    pub fn best_bid(&self) -> Option<i64> {
        self.bids.first().and_then(|entry| entry.price)
    }

    /// Best ask price.
    #[inline]
    pub fn best_ask(&self) -> Option<i64> {
        self.asks.first().and_then(|entry| entry.price)
    }

    /// Number of populated bid slots.
    #[inline]
    pub fn active_bid_levels(&self) -> usize {
        self.bids.iter().filter(|entry| !entry.is_empty()).count()
    }

    /// Number of populated ask slots.
    #[inline]
    pub fn active_ask_levels(&self) -> usize {
        self.asks.iter().filter(|entry| !entry.is_empty()).count()
    }
}

fn fill_side(slots: &mut [LevelEntry], ladder: &PriceLadder) {
    let mut ranked = ladder.iter_ranked();
    for slot in slots.iter_mut() {
        *slot = match ranked.next() {
            Some((price, level)) => LevelEntry::new(price, level.size(), level.count()),
            None => LevelEntry::EMPTY,
        };
    }
}
