//! One side of the book: price → aggregated level, ranked best-first.
//!
//! Levels are kept in a `BTreeMap` keyed by fixed-point price. The map is
//! always ascending; ranking is a property of the ladder's side (bids walk
//! the map from the top, asks from the bottom), so top-N extraction never
//! needs a sort.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::Rev;

use super::price_level::{LevelRemovalPolicy, PriceLevel};

/// Ranking direction of a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderSide {
    /// Highest price first
    Bid,
    /// Lowest price first
    Ask,
}

/// What a reduction did to the level it touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    /// No level at that price
    Missing,
    /// Level updated and kept
    Updated,
    /// Level depleted and dropped from the ladder
    Removed,
}

/// Ordered collection of price levels for one side.
#[derive(Debug, Clone)]
pub struct PriceLadder {
    side: LadderSide,
    levels: BTreeMap<i64, PriceLevel>,
}

impl PriceLadder {
    /// Create an empty ladder ranked for `side`.
    pub fn new(side: LadderSide) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Ranking direction.
    #[inline]
    pub fn side(&self) -> LadderSide {
        self.side
    }

    /// Attribute a new resting order to the level at `price`, creating the
    /// level if needed.
    #[inline]
    pub fn add(&mut self, price: i64, size: u64) {
        self.levels.entry(price).or_default().add_order(size);
    }

    /// Reduce the level at `price` and drop it if the reduction depletes it.
    #[inline]
    pub fn reduce(
        &mut self,
        price: i64,
        delta: u64,
        removes_order: bool,
        policy: LevelRemovalPolicy,
    ) -> LevelChange {
        let btree_map::Entry::Occupied(mut entry) = self.levels.entry(price) else {
            return LevelChange::Missing;
        };

        let level = entry.get_mut();
        level.reduce(delta, removes_order);

        if level.is_depleted(policy) {
            entry.remove();
            LevelChange::Removed
        } else {
            LevelChange::Updated
        }
    }

    /// Level at `price`, if any.
    #[inline]
    pub fn get(&self, price: i64) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Best (highest bid / lowest ask) price.
    #[inline]
    pub fn best_price(&self) -> Option<i64> {
        match self.side {
            LadderSide::Bid => self.levels.keys().next_back().copied(),
            LadderSide::Ask => self.levels.keys().next().copied(),
        }
    }

    /// Levels in rank order, best first.
    #[inline]
    pub fn iter_ranked(&self) -> RankedLevels<'_> {
        match self.side {
            LadderSide::Bid => RankedLevels::Descending(self.levels.iter().rev()),
            LadderSide::Ask => RankedLevels::Ascending(self.levels.iter()),
        }
    }

    /// Number of levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// No levels at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Drop every level.
    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

/// Best-first iterator over a ladder's levels.
pub enum RankedLevels<'a> {
    Ascending(btree_map::Iter<'a, i64, PriceLevel>),
    Descending(Rev<btree_map::Iter<'a, i64, PriceLevel>>),
}

impl<'a> Iterator for RankedLevels<'a> {
    type Item = (i64, &'a PriceLevel);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (price, level) = match self {
            RankedLevels::Ascending(iter) => iter.next()?,
            RankedLevels::Descending(iter) => iter.next()?,
        };
        Some((*price, level))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            RankedLevels::Ascending(iter) => iter.size_hint(),
            RankedLevels::Descending(iter) => iter.size_hint(),
        }
    }
}
