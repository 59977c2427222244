//! MBO CSV file loader and streaming interface.
//!
//! This module streams [`MboRecord`]s out of an MBO CSV file:
//! - Memory-efficient streaming (the file is never loaded whole)
//! - Header row discarded, blank lines passed over
//! - Error recovery: malformed lines are logged with their content and
//!   the cause, then skipped
//! - Large I/O buffer (1MB) for improved throughput
//!
//! # Example
//!
//! ```ignore
//! use mbp_reconstructor::{CsvLoader, OrderBook};
//!
//! let loader = CsvLoader::new("mbo.csv")?;
//! let mut book = OrderBook::new();
//!
//! for record in loader.iter_records()? {
//!     book.process(&record.event)?;
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, StringRecord};

use crate::error::{MbpError, Result};
use crate::record::MboRecord;

/// I/O buffer size for file reading.
///
/// Default `BufReader` uses 8KB; MBO files run to gigabytes.
pub const IO_BUFFER_SIZE: usize = 1024 * 1024; // 1 MB

/// Statistics for CSV loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Records successfully parsed
    pub records_read: u64,

    /// Lines skipped because they failed to parse
    pub records_skipped: u64,

    /// File size in bytes (0 for non-file readers)
    pub file_size: u64,
}

/// MBO CSV file loader.
///
/// # Responsibilities
///
/// This loader handles:
/// - File I/O (opening, streaming, buffering)
/// - CSV framing and record parsing
/// - Error recovery for malformed lines
///
/// It does NOT touch the book; feed its records to an `OrderBook`.
pub struct CsvLoader {
    /// Path to the CSV file
    path: PathBuf,

    /// Statistics
    stats: LoaderStats,

    /// Skip lines that fail to parse (instead of stopping)
    skip_invalid: bool,
}

impl CsvLoader {
    /// Create a new loader.
    ///
    /// # Returns
    ///
    /// * `Ok(CsvLoader)` - Loader ready to use
    /// * `Err(MbpError)` - File not found or not accessible
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(MbpError::Io(format!("File not found: {}", path.display())));
        }

        let file_size = std::fs::metadata(&path)
            .map_err(|e| MbpError::Io(format!("Failed to read file metadata: {e}")))?
            .len();

        Ok(Self {
            path,
            stats: LoaderStats {
                file_size,
                ..Default::default()
            },
            skip_invalid: true,
        })
    }

    /// Choose between skipping malformed lines (default) and stopping at
    /// the first one.
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get statistics.
    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }

    /// Open the file and iterate over its records.
    ///
    /// # Returns
    ///
    /// * `Ok(RecordIterator)` - Iterator over records
    /// * `Err(MbpError)` - Failed to open the file
    pub fn iter_records(self) -> Result<RecordIterator<BufReader<File>>> {
        let file = File::open(&self.path).map_err(|e| {
            MbpError::Io(format!("Could not open input file {}: {e}", self.path.display()))
        })?;
        let reader = BufReader::with_capacity(IO_BUFFER_SIZE, file);

        let mut iter = RecordIterator::from_reader(reader).skip_invalid(self.skip_invalid);
        iter.stats.file_size = self.stats.file_size;
        Ok(iter)
    }
}

/// Iterator over the records of an MBO CSV stream.
///
/// Lines are split on raw commas: quote characters carry no meaning and
/// are kept as field content.
pub struct RecordIterator<R: Read> {
    reader: csv::Reader<R>,
    row: ByteRecord,
    stats: LoaderStats,
    skip_invalid: bool,
    failed: bool,
}

impl<R: Read> RecordIterator<R> {
    /// Stream records from any reader. The first line is taken as the header.
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        Self {
            reader,
            row: ByteRecord::new(),
            stats: LoaderStats::default(),
            skip_invalid: true,
            failed: false,
        }
    }

    /// See [`CsvLoader::skip_invalid`].
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Get current statistics.
    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }

    /// Whether iteration ended on an error rather than end of input.
    pub fn failed(&self) -> bool {
        self.failed
    }

    fn line_number(&self) -> u64 {
        self.row.position().map(|p| p.line()).unwrap_or(0)
    }

    fn row_content(&self) -> String {
        self.row
            .iter()
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Log (and count) a bad line; returns whether to keep going.
    fn reject(&mut self, line: u64, content: &str, cause: &dyn std::fmt::Display) -> bool {
        if self.skip_invalid {
            log::warn!("Skipping line {line}: {content:?} ({cause})");
            self.stats.records_skipped += 1;
            true
        } else {
            log::error!("Invalid line {line}: {content:?} ({cause})");
            self.failed = true;
            false
        }
    }
}

impl<R: Read> Iterator for RecordIterator<R> {
    type Item = MboRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            match self.reader.read_byte_record(&mut self.row) {
                Ok(false) => return None, // End of input
                Ok(true) => {}
                Err(e) => {
                    // I/O failures do not advance the reader; never retry them.
                    if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                        log::error!("Failed to read input: {e}");
                        self.failed = true;
                        return None;
                    }
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    let content = self.row_content();
                    if self.reject(line, &content, &e) {
                        continue;
                    }
                    return None;
                }
            }

            let line = self.line_number();
            let bytes = std::mem::replace(&mut self.row, ByteRecord::new());
            let text = match StringRecord::from_byte_record(bytes) {
                Ok(text) => text,
                Err(e) => {
                    let cause = e.utf8_error().clone();
                    self.row = e.into_byte_record();
                    let content = self.row_content();
                    if self.reject(line, &content, &cause) {
                        continue;
                    }
                    return None;
                }
            };

            let parsed = MboRecord::from_csv(&text);
            self.row = text.into_byte_record();

            match parsed {
                Ok(record) => {
                    self.stats.records_read += 1;
                    return Some(record);
                }
                Err(e) => {
                    let content = self.row_content();
                    if self.reject(line, &content, &e) {
                        continue;
                    }
                    return None;
                }
            }
        }
    }
}
