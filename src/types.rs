//! Core data types for MBO events and resting orders.
//!
//! These types are designed to be:
//! - Small and `Copy` (an event is a handful of integers)
//! - Lossless for the single-byte action/side codes of the MBO feed,
//!   including codes the book does not act on
//! - Fixed-point for prices (no floating-point drift)

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed-point scale: stored price = true price × 10,000.
pub const PRICE_SCALE: i64 = 10_000;

/// Number of decimal digits carried by a fixed-point price.
pub const PRICE_DECIMALS: u32 = 4;

/// Number of ranked levels per side in an MBP-10 snapshot.
pub const MBP_LEVELS: usize = 10;

/// MBO action type (what happened to the order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Add new order to book
    Add,
    /// Modify existing order (same bookkeeping as `Cancel`)
    Modify,
    /// Cancel/reduce an order
    Cancel,
    /// Clear the whole book
    Reset,
    /// Trade print; carries no book effect on its own
    Trade,
    /// Fill print; carries no book effect on its own
    Fill,
    /// Any other code, kept so it can be echoed downstream
    Other(u8),
}

impl Action {
    /// Parse action from a byte. Never fails: unknown codes map to `Other`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'A' => Action::Add,
            b'M' => Action::Modify,
            b'C' => Action::Cancel,
            b'R' => Action::Reset,
            b'T' => Action::Trade,
            b'F' => Action::Fill,
            other => Action::Other(other),
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        match self {
            Action::Add => b'A',
            Action::Modify => b'M',
            Action::Cancel => b'C',
            Action::Reset => b'R',
            Action::Trade => b'T',
            Action::Fill => b'F',
            Action::Other(byte) => byte,
        }
    }

    /// Code as a printable character.
    #[inline]
    pub fn as_char(self) -> char {
        char::from(self.to_byte())
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy order (bid)
    Bid,
    /// Sell order (ask)
    Ask,
    /// Anything else (`N`, blank, ...). Never aggregated into a ladder.
    Other(u8),
}

impl Side {
    /// Parse side from a byte. Never fails: unknown codes map to `Other`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'B' => Side::Bid,
            b'A' => Side::Ask,
            other => Side::Other(other),
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        match self {
            Side::Bid => b'B',
            Side::Ask => b'A',
            Side::Other(byte) => byte,
        }
    }

    /// Code as a printable character.
    #[inline]
    pub fn as_char(self) -> char {
        char::from(self.to_byte())
    }

    /// Bid or ask.
    #[inline(always)]
    pub fn is_recognized(self) -> bool {
        !matches!(self, Side::Other(_))
    }
}

/// Market By Order (MBO) event.
///
/// The book-relevant part of one input record. For `Add` the size is the
/// resting quantity created; for `Cancel`/`Modify` it is the quantity
/// being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MboEvent {
    /// Order identifier, stable across the order's lifetime
    pub order_id: u64,

    /// What happened
    pub action: Action,

    /// Which side of the book
    pub side: Side,

    /// Price in fixed-point format (divide by `PRICE_SCALE` for the true price)
    pub price: i64,

    /// Quantity created (Add) or removed (Cancel/Modify)
    pub size: u64,
}

impl MboEvent {
    /// Create a new MBO event.
    pub fn new(order_id: u64, action: Action, side: Side, price: i64, size: u64) -> Self {
        Self {
            order_id,
            action,
            side,
            price,
            size,
        }
    }

    /// Shorthand for an `Add`.
    pub fn add(order_id: u64, side: Side, price: i64, size: u64) -> Self {
        Self::new(order_id, Action::Add, side, price, size)
    }

    /// Shorthand for a `Cancel`.
    pub fn cancel(order_id: u64, side: Side, price: i64, size: u64) -> Self {
        Self::new(order_id, Action::Cancel, side, price, size)
    }

    /// Shorthand for a `Modify`.
    pub fn modify(order_id: u64, side: Side, price: i64, size: u64) -> Self {
        Self::new(order_id, Action::Modify, side, price, size)
    }

    /// A book reset. Id, price and size carry no meaning for the book.
    pub fn reset() -> Self {
        Self::new(0, Action::Reset, Side::Other(b'N'), 0, 0)
    }
}

/// Order information stored in the order index.
///
/// Only where to find the aggregate (price) and the size recorded for the
/// order; the side comes from the event that references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrder {
    pub price: i64,
    pub size: u64,
}

/// Convert a decimal to fixed-point, truncating digits past the fourth decimal.
///
/// Returns `None` if the scaled value does not fit in an `i64`.
pub fn decimal_to_price(value: Decimal) -> Option<i64> {
    value
        .checked_mul(Decimal::from(PRICE_SCALE))?
        .trunc()
        .to_i64()
}

/// Convert a fixed-point price to a decimal carrying exactly four decimals.
#[inline]
pub fn price_to_decimal(price: i64) -> Decimal {
    Decimal::new(price, PRICE_DECIMALS)
}

/// Render a fixed-point price with exactly four decimals (`150.0000`).
#[inline]
pub fn format_price(price: i64) -> String {
    price_to_decimal(price).to_string()
}
