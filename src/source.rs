//! Market data source abstraction.
//!
//! The reconstruction pipeline pulls records from a [`MarketDataSource`]
//! and does not care where they come from: an MBO CSV file, or an in-memory
//! vector in tests.
//!
//! # Example
//!
//! ```ignore
//! use mbp_reconstructor::source::{CsvSource, MarketDataSource};
//!
//! let source = CsvSource::new("data/ARL_2025-07-17.mbo.csv")?;
//! println!("Symbol: {:?}", source.metadata().symbol);
//!
//! for record in source.records()? {
//!     // Process record...
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::loader::{CsvLoader, RecordIterator};
use crate::record::MboRecord;

// ============================================================================
// Source Metadata
// ============================================================================

/// Metadata about a market data source.
#[derive(Debug, Clone, Default)]
pub struct SourceMetadata {
    /// Trading symbol (e.g., "ARL", "NVDA")
    pub symbol: Option<String>,

    /// Trading date in YYYY-MM-DD format
    pub date: Option<String>,

    /// Original file path (if loaded from file)
    pub file_path: Option<PathBuf>,

    /// Data provider name (e.g., "csv", "memory")
    pub provider: Option<String>,

    /// Estimated record count (for progress tracking)
    pub estimated_records: Option<u64>,

    /// File size in bytes (if applicable)
    pub file_size: Option<u64>,
}

impl SourceMetadata {
    /// Create new empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the file path.
    pub fn with_file_path(mut self, path: impl AsRef<Path>) -> Self {
        self.file_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the provider.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the estimated record count.
    pub fn with_estimated_records(mut self, count: u64) -> Self {
        self.estimated_records = Some(count);
        self
    }

    /// Extract metadata from a file path.
    ///
    /// Recognized filename patterns:
    /// - `ARL_2025-07-17.mbo.csv` → symbol="ARL", date="2025-07-17"
    /// - `ARL.mbo.csv` → symbol="ARL"
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut metadata = Self::new().with_file_path(path);

        if let Ok(meta) = std::fs::metadata(path) {
            metadata.file_size = Some(meta.len());
        }

        if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
            let base = filename
                .trim_end_matches(".csv")
                .trim_end_matches(".mbo")
                .trim_end_matches(".mbp-10");

            match base.split_once('_') {
                Some((symbol, rest)) => {
                    metadata.symbol = Some(symbol.to_string());
                    if rest.len() >= 10 && rest.as_bytes()[4] == b'-' {
                        metadata.date = rest.get(..10).map(str::to_string);
                    }
                }
                None => metadata.symbol = Some(base.to_string()),
            }
        }

        metadata
    }
}

// ============================================================================
// Market Data Source Trait
// ============================================================================

/// Trait for market data sources.
///
/// `records()` consumes `self`: a source is a single pass over its input.
pub trait MarketDataSource {
    /// The iterator type for records.
    type RecordIter: Iterator<Item = MboRecord>;

    /// Consume the source and return an iterator over records.
    ///
    /// # Returns
    ///
    /// * `Ok(Iterator)` - Iterator over MBO records
    /// * `Err(...)` - Failed to open/read the source
    fn records(self) -> Result<Self::RecordIter>;

    /// Get metadata about the source.
    fn metadata(&self) -> &SourceMetadata;
}

// ============================================================================
// Vector Source (for testing)
// ============================================================================

/// A simple in-memory source.
///
/// # Example
///
/// ```
/// use mbp_reconstructor::source::{MarketDataSource, SourceMetadata, VecSource};
/// use mbp_reconstructor::{MboEvent, MboRecord, Side};
///
/// let records = vec![
///     MboRecord::from_event(MboEvent::add(1, Side::Bid, 1_500_000, 100)),
///     MboRecord::from_event(MboEvent::add(2, Side::Ask, 1_500_100, 100)),
/// ];
///
/// let source = VecSource::new(records)
///     .with_metadata(SourceMetadata::new().with_symbol("TEST"));
///
/// assert_eq!(source.records().unwrap().count(), 2);
/// ```
pub struct VecSource {
    records: Vec<MboRecord>,
    metadata: SourceMetadata,
}

impl VecSource {
    /// Create a new vector source.
    pub fn new(records: Vec<MboRecord>) -> Self {
        Self {
            metadata: SourceMetadata::new()
                .with_provider("memory")
                .with_estimated_records(records.len() as u64),
            records,
        }
    }

    /// Set custom metadata.
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl MarketDataSource for VecSource {
    type RecordIter = std::vec::IntoIter<MboRecord>;

    fn records(self) -> Result<Self::RecordIter> {
        Ok(self.records.into_iter())
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

// ============================================================================
// CSV Source
// ============================================================================

/// Market data source for MBO CSV files.
pub struct CsvSource {
    loader: CsvLoader,
    metadata: SourceMetadata,
}

impl CsvSource {
    /// Create a new CSV source from a file path.
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSource)` - Ready to iterate
    /// * `Err(...)` - File not found or inaccessible
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let loader = CsvLoader::new(path)?;
        let metadata = SourceMetadata::from_path(path).with_provider("csv");

        Ok(Self { loader, metadata })
    }

    /// See [`CsvLoader::skip_invalid`].
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.loader = self.loader.skip_invalid(skip);
        self
    }

    /// Get the file path being read.
    pub fn path(&self) -> &Path {
        self.loader.path()
    }
}

impl MarketDataSource for CsvSource {
    type RecordIter = RecordIterator<BufReader<File>>;

    fn records(self) -> Result<Self::RecordIter> {
        self.loader.iter_records()
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

// ============================================================================
// Tests
// ============================================================================
