//! # MBP-Reconstructor
//!
//! Rebuilds a depth-limited, price-aggregated book (Market-By-Price, MBP-10)
//! from a strictly ordered stream of per-order events (Market-By-Order, MBO).
//!
//! After every event the book exposes the top N price levels per side with
//! aggregated resting size and order count, which is the view pricing,
//! analytics and replay tools consume.
//!
//! ## Quick Start
//!
//! ```rust
//! use mbp_reconstructor::{MboEvent, OrderBook, Side, PRICE_SCALE};
//!
//! let mut book = OrderBook::new();
//!
//! book.process(&MboEvent::add(12345, Side::Bid, 150 * PRICE_SCALE, 100)).unwrap();
//!
//! let snapshot = book.top_levels(10);
//! assert_eq!(snapshot.bids[0].price, Some(150 * PRICE_SCALE));
//! assert_eq!(snapshot.bids[0].size, 100);
//! assert_eq!(snapshot.bids[0].count, 1);
//! assert!(snapshot.asks[0].is_empty());
//! ```
//!
//! ### CSV → CSV
//!
//! ```ignore
//! use std::fs::File;
//! use mbp_reconstructor::{reconstruct_csv, CsvSource, MarketDataSource, MbpWriter, OrderBook};
//!
//! let source = CsvSource::new("mbo.csv")?;
//! let mut book = OrderBook::new();
//! let mut writer = MbpWriter::new(File::create("mbp.csv")?, book.config().depth);
//!
//! let summary = reconstruct_csv(source.records()?, &mut book, &mut writer)?;
//! println!("{} rows, {} lines skipped", summary.rows_written, summary.records_skipped);
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Core types: `MboEvent`, `Action`, `Side`, fixed-point price helpers |
//! | [`lob`] | Book state: `OrderBook`, `PriceLadder`, `PriceLevel`, `MbpSnapshot` |
//! | [`record`] | Input row parsing: `MboRecord` |
//! | [`loader`] | CSV streaming with skip-and-log error recovery |
//! | [`source`] | Source abstraction: `MarketDataSource`, `CsvSource`, `VecSource` |
//! | [`writer`] | Output row encoding: `MbpWriter` |
//! | [`pipeline`] | The per-event driver: `reconstruct`, `reconstruct_csv` |

pub mod error;
pub mod loader;
pub mod lob;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod types;
pub mod writer;

// Re-exports - Core types
pub use error::{MbpError, ParseError, Result};
pub use types::{
    format_price, Action, MboEvent, RestingOrder, Side, MBP_LEVELS, PRICE_DECIMALS, PRICE_SCALE,
};

// Re-exports - Book
pub use lob::{
    BookConfig, BookStats, LevelEntry, LevelRemovalPolicy, MbpSnapshot, OrderBook,
    PartialReducePolicy, PriceLadder, PriceLevel, UnknownSidePolicy,
};

// Re-exports - I/O
pub use loader::{CsvLoader, LoaderStats, RecordIterator, IO_BUFFER_SIZE};
pub use record::MboRecord;
pub use source::{CsvSource, MarketDataSource, SourceMetadata, VecSource};
pub use writer::MbpWriter;

// Re-exports - Pipeline
pub use pipeline::{reconstruct, reconstruct_csv, RunSummary};
