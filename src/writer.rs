//! MBP output encoding.
//!
//! One CSV row per processed input record:
//!
//! ```text
//! <row>,ts_recv,ts_event,rtype,publisher_id,instrument_id,action,side,depth,price,size,flags,ts_in_delta,sequence,
//!   bid_px_00,bid_sz_00,bid_ct_00,ask_px_00,ask_sz_00,ask_ct_00, ... ,symbol,order_id
//! ```
//!
//! `ts_recv` repeats the input's `ts_event`, `rtype` is always 10 (MBP-10)
//! and `depth` always 0. Prices carry exactly four decimals; absent levels
//! read `,,0,0`. A Reset row leaves its own price blank but still echoes
//! the input size.

use std::io::Write;

use csv::{QuoteStyle, StringRecord, Terminator, WriterBuilder};

use crate::error::Result;
use crate::lob::{LevelEntry, MbpSnapshot};
use crate::record::MboRecord;
use crate::types::{format_price, Action};

/// Record type written on every output row.
pub const MBP_RTYPE: u8 = 10;

/// Writes MBP rows to any `Write` sink.
pub struct MbpWriter<W: Write> {
    writer: csv::Writer<W>,
    row: StringRecord,
    depth: usize,
    rows_written: u64,
}

impl<W: Write> MbpWriter<W> {
    /// Wrap a sink for snapshots of `depth` levels per side. No header is
    /// written until [`write_header`](Self::write_header).
    pub fn new(sink: W, depth: usize) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(sink);

        Self {
            writer,
            row: StringRecord::new(),
            depth,
            rows_written: 0,
        }
    }

    /// Levels per side this writer emits.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Data rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Write the column header.
    pub fn write_header(&mut self) -> Result<()> {
        self.row.clear();
        self.row.push_field("");
        for name in [
            "ts_recv",
            "ts_event",
            "rtype",
            "publisher_id",
            "instrument_id",
            "action",
            "side",
            "depth",
            "price",
            "size",
            "flags",
            "ts_in_delta",
            "sequence",
        ] {
            self.row.push_field(name);
        }
        for level in 0..self.depth {
            for prefix in ["bid_px", "bid_sz", "bid_ct", "ask_px", "ask_sz", "ask_ct"] {
                self.row.push_field(&format!("{prefix}_{level:02}"));
            }
        }
        self.row.push_field("symbol");
        self.row.push_field("order_id");

        self.writer.write_record(&self.row)?;
        Ok(())
    }

    /// Write one data row for `record` and the book state after it.
    ///
    /// `snapshot` slots beyond the writer's depth are ignored; missing ones
    /// are written as padding.
    pub fn write_row(&mut self, index: u64, record: &MboRecord, snapshot: &MbpSnapshot) -> Result<()> {
        let event = &record.event;
        let row = &mut self.row;
        row.clear();

        row.push_field(&index.to_string());
        row.push_field(&record.ts_event);
        row.push_field(&record.ts_event);
        row.push_field(&MBP_RTYPE.to_string());
        row.push_field(&record.publisher_id.to_string());
        row.push_field(&record.instrument_id.to_string());
        row.push_field(&event.action.as_char().to_string());
        row.push_field(&event.side.as_char().to_string());
        row.push_field("0");
        if event.action == Action::Reset {
            row.push_field("");
        } else {
            row.push_field(&format_price(event.price));
        }
        row.push_field(&event.size.to_string());
        row.push_field(&record.flags.to_string());
        row.push_field(&record.ts_in_delta.to_string());
        row.push_field(&record.sequence.to_string());

        for level in 0..self.depth {
            push_level(row, snapshot.bids.get(level));
            push_level(row, snapshot.asks.get(level));
        }

        row.push_field(&record.symbol);
        row.push_field(&event.order_id.to_string());

        self.writer.write_record(&self.row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush buffered rows to the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::MbpError::Io(e.error().to_string()))
    }
}

fn push_level(row: &mut StringRecord, entry: Option<&LevelEntry>) {
    match entry.and_then(|e| e.price.map(|price| (price, e))) {
        Some((price, entry)) => {
            row.push_field(&format_price(price));
            row.push_field(&entry.size.to_string());
            row.push_field(&entry.count.to_string());
        }
        None => {
            row.push_field("");
            row.push_field("0");
            row.push_field("0");
        }
    }
}
