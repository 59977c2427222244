//! Source → book → snapshot → sink driver.
//!
//! One synchronous pass: each record is applied to the book, then the
//! book's snapshot is encoded as one output row. A record the book refuses
//! (strict policies only) is logged and produces no row. Sink failures
//! abort the run.
//!
//! [`reconstruct_csv`] runs the same loop over a CSV record stream and
//! also reports how many input lines the loader skipped.

use std::io::{Read, Write};

use serde::Serialize;

use crate::error::{MbpError, Result};
use crate::loader::RecordIterator;
use crate::lob::{BookStats, MbpSnapshot, OrderBook};
use crate::record::MboRecord;
use crate::writer::MbpWriter;

/// Outcome of a reconstruction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Output rows written (one per accepted record)
    pub rows_written: u64,

    /// Records the book refused
    pub records_rejected: u64,

    /// Malformed input lines the loader skipped (CSV runs only)
    pub records_skipped: u64,

    /// Book counters at the end of the run
    pub book: BookStats,
}

/// Apply every record to `book` and write one MBP row after each.
///
/// Writes the header first and flushes the sink at the end.
///
/// # Example
///
/// ```
/// use mbp_reconstructor::{reconstruct, MboEvent, MboRecord, MbpWriter, OrderBook, Side};
///
/// let records = vec![MboRecord::from_event(MboEvent::add(1, Side::Bid, 1_500_000, 100))];
/// let mut book = OrderBook::new();
/// let mut writer = MbpWriter::new(Vec::new(), 10);
///
/// let summary = reconstruct(records, &mut book, &mut writer).unwrap();
/// assert_eq!(summary.rows_written, 1);
/// ```
pub fn reconstruct<I, W>(records: I, book: &mut OrderBook, writer: &mut MbpWriter<W>) -> Result<RunSummary>
where
    I: IntoIterator<Item = MboRecord>,
    W: Write,
{
    let mut summary = RunSummary::default();
    let mut snapshot = MbpSnapshot::new(book.config().depth);

    writer.write_header()?;

    for record in records {
        if let Err(e) = book.process(&record.event) {
            log::warn!(
                "Rejected record (order_id={}, sequence={}): {e}",
                record.event.order_id,
                record.sequence
            );
            summary.records_rejected += 1;
            continue;
        }

        book.snapshot_into(&mut snapshot);
        writer.write_row(summary.rows_written, &record, &snapshot)?;
        summary.rows_written += 1;
    }

    writer.flush()?;
    summary.book = book.stats().clone();

    log::info!(
        "Reconstruction finished: {} rows, {} rejected, {} unknown order refs",
        summary.rows_written,
        summary.records_rejected,
        summary.book.unknown_order_refs
    );

    Ok(summary)
}

/// [`reconstruct`] over a CSV record stream, carrying the loader's skip
/// count into the summary.
///
/// # Errors
/// Sink failures, and a stream that stopped on an unreadable or (with
/// `skip_invalid(false)`) malformed line. Rows up to that point are
/// already written.
pub fn reconstruct_csv<R, W>(
    mut records: RecordIterator<R>,
    book: &mut OrderBook,
    writer: &mut MbpWriter<W>,
) -> Result<RunSummary>
where
    R: Read,
    W: Write,
{
    let mut summary = reconstruct(records.by_ref(), book, writer)?;
    summary.records_skipped = records.stats().records_skipped;

    if summary.records_skipped > 0 {
        log::warn!("Skipped {} malformed input lines", summary.records_skipped);
    }

    if records.failed() {
        return Err(MbpError::Io(format!(
            "input stopped early after {} records",
            records.stats().records_read
        )));
    }

    Ok(summary)
}
