//! Input record: one MBO CSV row.
//!
//! Converts a CSV row into an [`MboRecord`]: the book-relevant [`MboEvent`]
//! plus the passthrough columns the output row echoes. Parsing is an
//! explicit fallible operation returning a structured [`ParseError`]; the
//! caller decides whether to skip or stop.
//!
//! Column layout (header row discarded by the loader):
//!
//! ```text
//! ts_recv,ts_event,rtype,publisher_id,instrument_id,action,side,price,size,channel_id,order_id,flags,ts_in_delta,sequence,symbol
//! ```
//!
//! `channel_id` is read past and ignored. Everything after `sequence` is
//! the symbol, commas included.

use std::str::FromStr;

use csv::StringRecord;
use rust_decimal::Decimal;

use crate::error::ParseError;
use crate::types::{decimal_to_price, Action, MboEvent, Side};

mod col {
    pub const TS_RECV: usize = 0;
    pub const TS_EVENT: usize = 1;
    pub const RTYPE: usize = 2;
    pub const PUBLISHER_ID: usize = 3;
    pub const INSTRUMENT_ID: usize = 4;
    pub const ACTION: usize = 5;
    pub const SIDE: usize = 6;
    pub const PRICE: usize = 7;
    pub const SIZE: usize = 8;
    pub const ORDER_ID: usize = 10;
    pub const FLAGS: usize = 11;
    pub const TS_IN_DELTA: usize = 12;
    pub const SEQUENCE: usize = 13;
    pub const SYMBOL: usize = 14;
}

/// One parsed MBO input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MboRecord {
    /// Capture timestamp, kept verbatim
    pub ts_recv: String,
    /// Matching-engine timestamp, kept verbatim
    pub ts_event: String,
    pub rtype: i32,
    pub publisher_id: i32,
    pub instrument_id: i32,
    /// The book-relevant fields
    pub event: MboEvent,
    pub flags: i32,
    pub ts_in_delta: i64,
    pub sequence: u64,
    pub symbol: String,
}

impl MboRecord {
    /// Wrap a bare event with empty passthrough columns.
    pub fn from_event(event: MboEvent) -> Self {
        Self {
            ts_recv: String::new(),
            ts_event: String::new(),
            rtype: 160,
            publisher_id: 0,
            instrument_id: 0,
            event,
            flags: 0,
            ts_in_delta: 0,
            sequence: 0,
            symbol: String::new(),
        }
    }

    /// Set the symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Set both timestamps.
    pub fn with_timestamps(mut self, ts_recv: impl Into<String>, ts_event: impl Into<String>) -> Self {
        self.ts_recv = ts_recv.into();
        self.ts_event = ts_event.into();
        self
    }

    /// Parse a CSV row.
    pub fn from_csv(record: &StringRecord) -> Result<Self, ParseError> {
        let field = |index: usize, name: &'static str| {
            record
                .get(index)
                .ok_or(ParseError::MissingField { field: name })
        };

        let action = code_byte(field(col::ACTION, "action")?);
        let side = code_byte(field(col::SIDE, "side")?);

        let event = MboEvent {
            order_id: parse_number(field(col::ORDER_ID, "order_id")?, "order_id")?,
            action: Action::from_byte(action),
            side: Side::from_byte(side),
            price: parse_price(field(col::PRICE, "price")?)?,
            size: parse_number(field(col::SIZE, "size")?, "size")?,
        };

        let symbol = record
            .iter()
            .skip(col::SYMBOL)
            .collect::<Vec<_>>()
            .join(",");

        Ok(Self {
            ts_recv: field(col::TS_RECV, "ts_recv")?.to_string(),
            ts_event: field(col::TS_EVENT, "ts_event")?.to_string(),
            rtype: parse_number(field(col::RTYPE, "rtype")?, "rtype")?,
            publisher_id: parse_number(field(col::PUBLISHER_ID, "publisher_id")?, "publisher_id")?,
            instrument_id: parse_number(field(col::INSTRUMENT_ID, "instrument_id")?, "instrument_id")?,
            event,
            flags: parse_number(field(col::FLAGS, "flags")?, "flags")?,
            ts_in_delta: parse_number(field(col::TS_IN_DELTA, "ts_in_delta")?, "ts_in_delta")?,
            sequence: parse_number(field(col::SEQUENCE, "sequence")?, "sequence")?,
            symbol,
        })
    }
}

impl FromStr for MboRecord {
    type Err = ParseError;

    /// Parse a raw CSV line (no quoting).
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let record = StringRecord::from(line.split(',').collect::<Vec<_>>());
        Self::from_csv(&record)
    }
}

/// First byte of a code column; blank reads as a space.
#[inline]
fn code_byte(text: &str) -> u8 {
    text.as_bytes().first().copied().unwrap_or(b' ')
}

#[inline]
fn parse_number<T>(text: &str, field: &'static str) -> Result<T, ParseError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let trimmed = text.trim();
    trimmed
        .parse()
        .map_err(|e| ParseError::invalid(field, trimmed, e))
}

/// Decimal price text → fixed-point. Blank reads as zero.
pub fn parse_price(text: &str) -> Result<i64, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| ParseError::invalid("price", trimmed, e))?;

    decimal_to_price(value).ok_or_else(|| ParseError::invalid("price", trimmed, "out of range"))
}
