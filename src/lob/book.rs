//! Single-instrument MBP order book.
//!
//! Implementation:
//! - `BTreeMap` ladders for sorted price levels (see [`PriceLadder`])
//! - ahash `HashMap` order index for id lookups (see [`OrderIndex`])
//! - Aggregates only; individual order queues are not kept
//!
//! The book is tolerant by construction: unknown order ids, unrecognized
//! sides and unknown actions are no-ops (counted in [`BookStats`]), never
//! errors, unless a stricter policy is configured.

use serde::{Deserialize, Serialize};

use super::ladder::{LadderSide, LevelChange, PriceLadder};
use super::order_index::OrderIndex;
use super::price_level::{LevelRemovalPolicy, PriceLevel};
use super::snapshot::MbpSnapshot;
use crate::error::{MbpError, Result};
use crate::types::{Action, MboEvent, RestingOrder, Side, MBP_LEVELS};

/// What a partial Cancel/Modify does to the size recorded for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PartialReducePolicy {
    /// Leave the recorded size untouched (default). A later cancel of the
    /// original size then over-subtracts from the level.
    #[default]
    KeepOriginal,

    /// Record `size - delta` so later events are measured against what remains
    TrackRemaining,
}

/// How `Add` handles a side that is neither bid nor ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownSidePolicy {
    /// Record the order in the index but touch no ladder (default)
    #[default]
    Record,

    /// Refuse the event with `MbpError::UnrecognizedSide`; the book is unchanged
    Reject,
}

/// Configuration for order book behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookConfig {
    /// Number of ranked levels per side in snapshots
    pub depth: usize,

    /// When a level leaves its ladder
    pub level_removal: LevelRemovalPolicy,

    /// Bookkeeping after a partial Cancel/Modify
    pub partial_reduce: PartialReducePolicy,

    /// Handling of unrecognized sides on Add
    pub unknown_side: UnknownSidePolicy,

    /// Whether to log tolerated anomalies
    pub log_warnings: bool,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            depth: MBP_LEVELS,
            level_removal: LevelRemovalPolicy::default(),
            partial_reduce: PartialReducePolicy::default(),
            unknown_side: UnknownSidePolicy::default(),
            log_warnings: true,
        }
    }
}

impl BookConfig {
    /// Create a new config with the specified snapshot depth.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Set the level removal policy.
    pub fn with_level_removal(mut self, policy: LevelRemovalPolicy) -> Self {
        self.level_removal = policy;
        self
    }

    /// Set the partial reduce policy.
    pub fn with_partial_reduce(mut self, policy: PartialReducePolicy) -> Self {
        self.partial_reduce = policy;
        self
    }

    /// Set the unknown side policy.
    pub fn with_unknown_side(mut self, policy: UnknownSidePolicy) -> Self {
        self.unknown_side = policy;
        self
    }

    /// Enable/disable anomaly logs.
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log_warnings = log;
        self
    }
}

/// Counters for monitoring book health.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStats {
    /// Events handed to `process` (accepted or not)
    pub events_processed: u64,

    /// Add events applied
    pub adds: u64,

    /// Cancel events seen
    pub cancels: u64,

    /// Modify events seen
    pub modifies: u64,

    /// Reset events applied
    pub resets: u64,

    /// Trade/Fill/unknown actions passed over
    pub ignored_actions: u64,

    /// Cancel/Modify referencing an id not in the index
    pub unknown_order_refs: u64,

    /// Add over an id already in the index
    pub replaced_orders: u64,

    /// Add recorded in the index without a ladder (unrecognized side)
    pub unattributed_orders: u64,

    /// Events refused under a strict policy
    pub rejected_events: u64,
}

/// Single-instrument book aggregating MBO events into price levels.
///
/// Owns one order index and two ladders. After every `process` call the
/// ladders reflect the cumulative effect of all events so far.
#[derive(Debug, Clone)]
pub struct OrderBook {
    config: BookConfig,
    bids: PriceLadder,
    asks: PriceLadder,
    orders: OrderIndex,
    stats: BookStats,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty book with the default configuration (depth 10).
    ///
    /// # Example
    /// ```
    /// use mbp_reconstructor::OrderBook;
    ///
    /// let book = OrderBook::new();
    /// assert_eq!(book.order_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    /// Create an empty book with a custom configuration.
    ///
    /// # Example
    /// ```
    /// use mbp_reconstructor::{BookConfig, OrderBook, PartialReducePolicy};
    ///
    /// let config = BookConfig::new(5).with_partial_reduce(PartialReducePolicy::TrackRemaining);
    /// let book = OrderBook::with_config(config);
    /// assert_eq!(book.config().depth, 5);
    /// ```
    pub fn with_config(config: BookConfig) -> Self {
        Self {
            config,
            bids: PriceLadder::new(LadderSide::Bid),
            asks: PriceLadder::new(LadderSide::Ask),
            orders: OrderIndex::new(),
            stats: BookStats::default(),
        }
    }

    /// Get a reference to the current configuration.
    #[inline]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Apply one event to the book.
    ///
    /// Dispatches on the action:
    /// - `Add`: record the order and attribute its size to its level
    /// - `Cancel` / `Modify`: remove the event's size from the order's level
    /// - `Reset`: empty the book
    /// - anything else: no-op
    ///
    /// # Errors
    /// Only under `UnknownSidePolicy::Reject`, for an `Add` on an
    /// unrecognized side. The default configuration never errors.
    #[inline]
    pub fn process(&mut self, event: &MboEvent) -> Result<()> {
        self.stats.events_processed += 1;

        match event.action {
            Action::Add => self.add_order(event)?,
            Action::Cancel => {
                self.stats.cancels += 1;
                self.reduce_order(event);
            }
            Action::Modify => {
                self.stats.modifies += 1;
                self.reduce_order(event);
            }
            Action::Reset => {
                self.stats.resets += 1;
                self.clear();
            }
            Action::Trade | Action::Fill | Action::Other(_) => {
                self.stats.ignored_actions += 1;
            }
        }

        Ok(())
    }

    /// Add a new order to the book.
    #[inline]
    fn add_order(&mut self, event: &MboEvent) -> Result<()> {
        if !event.side.is_recognized() && self.config.unknown_side == UnknownSidePolicy::Reject {
            self.stats.rejected_events += 1;
            return Err(MbpError::UnrecognizedSide(event.side.to_byte()));
        }

        let replaced = self.orders.insert(
            event.order_id,
            RestingOrder {
                price: event.price,
                size: event.size,
            },
        );
        if replaced.is_some() {
            // No duplicate detection: the stale entry's level keeps its share.
            self.stats.replaced_orders += 1;
            if self.config.log_warnings {
                log::debug!("Add for resting order {} replaced its index entry", event.order_id);
            }
        }

        match self.ladder_mut(event.side) {
            Some(ladder) => ladder.add(event.price, event.size),
            None => {
                self.stats.unattributed_orders += 1;
                if self.config.log_warnings {
                    log::debug!(
                        "Order {} added on unrecognized side {:?}; not aggregated",
                        event.order_id,
                        event.side.as_char()
                    );
                }
            }
        }

        self.stats.adds += 1;
        Ok(())
    }

    /// Cancel/Modify: reduce the level the order rests on.
    ///
    /// The delta counts as a full removal of the order only when it equals the
    /// recorded size exactly; the index entry goes once the delta reaches it.
    #[inline]
    fn reduce_order(&mut self, event: &MboEvent) {
        let Some(order) = self.orders.get(event.order_id) else {
            // Resting before the observed window, or already gone.
            self.stats.unknown_order_refs += 1;
            if self.config.log_warnings {
                log::debug!("{:?} for unknown order {} ignored", event.action, event.order_id);
            }
            return;
        };

        let delta = event.size;
        let policy = self.config.level_removal;

        if let Some(ladder) = self.ladder_mut(event.side) {
            let change = ladder.reduce(order.price, delta, delta == order.size, policy);
            if change == LevelChange::Missing && self.config.log_warnings {
                log::debug!(
                    "No {:?} level at {} for order {}",
                    event.side,
                    order.price,
                    event.order_id
                );
            }
        }

        if delta >= order.size {
            self.orders.remove(event.order_id);
        } else if self.config.partial_reduce == PartialReducePolicy::TrackRemaining {
            self.orders.set_size(event.order_id, order.size - delta);
        }
    }

    #[inline(always)]
    fn ladder_mut(&mut self, side: Side) -> Option<&mut PriceLadder> {
        match side {
            Side::Bid => Some(&mut self.bids),
            Side::Ask => Some(&mut self.asks),
            Side::Other(_) => None,
        }
    }

    /// Ladder for a recognized side.
    #[inline]
    pub fn ladder(&self, side: Side) -> Option<&PriceLadder> {
        match side {
            Side::Bid => Some(&self.bids),
            Side::Ask => Some(&self.asks),
            Side::Other(_) => None,
        }
    }

    /// Clear both ladders and the order index. Statistics are kept.
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.orders.clear();
    }

    /// Top `depth` levels per side, padded to exactly `depth` slots.
    #[inline]
    pub fn top_levels(&self, depth: usize) -> MbpSnapshot {
        let mut snapshot = MbpSnapshot::new(depth);
        snapshot.fill_from(&self.bids, &self.asks);
        snapshot
    }

    /// Snapshot at the configured depth.
    #[inline]
    pub fn snapshot(&self) -> MbpSnapshot {
        self.top_levels(self.config.depth)
    }

    /// Fill a caller-owned snapshot at the configured depth, reusing its buffers.
    #[inline]
    pub fn snapshot_into(&self, snapshot: &mut MbpSnapshot) {
        snapshot.fill_from_with_depth(&self.bids, &self.asks, self.config.depth);
    }

    /// Highest bid price.
    #[inline]
    pub fn best_bid(&self) -> Option<i64> {
        self.bids.best_price()
    }

    /// Lowest ask price.
    #[inline]
    pub fn best_ask(&self) -> Option<i64> {
        self.asks.best_price()
    }

    /// Aggregate level at `price` on `side`.
    #[inline]
    pub fn level(&self, side: Side, price: i64) -> Option<&PriceLevel> {
        self.ladder(side)?.get(price)
    }

    /// Index entry for an order id.
    #[inline]
    pub fn resting_order(&self, order_id: u64) -> Option<RestingOrder> {
        self.orders.get(order_id)
    }

    /// Get current statistics.
    pub fn stats(&self) -> &BookStats {
        &self.stats
    }

    /// Get number of orders in the index.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Get number of price levels on bid side.
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Get number of price levels on ask side.
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// No levels and no resting orders.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty() && self.orders.is_empty()
    }
}
