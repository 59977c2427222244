//! Order book reconstruction module.
//!
//! This module aggregates MBO events into ranked price levels and extracts
//! fixed-depth MBP snapshots.

pub mod book;
pub mod ladder;
mod order_index;
pub mod price_level;
pub mod snapshot;

pub use book::{BookConfig, BookStats, OrderBook, PartialReducePolicy, UnknownSidePolicy};
pub use ladder::{LadderSide, LevelChange, PriceLadder, RankedLevels};
pub use order_index::OrderIndex;
pub use price_level::{LevelRemovalPolicy, PriceLevel};
pub use snapshot::{LevelEntry, MbpSnapshot};
