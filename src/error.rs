//! Error types for MBP reconstruction.
//!
//! Clean error handling using `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Result type alias for reconstruction operations.
pub type Result<T> = std::result::Result<T, MbpError>;

/// Main error type for reconstruction operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MbpError {
    /// An input record could not be parsed into an event
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Add on a side that is neither bid nor ask (only under `UnknownSidePolicy::Reject`)
    #[error("Unrecognized side: {:?}", byte_char(.0))]
    UnrecognizedSide(u8),

    /// I/O failure while reading input or writing output
    #[error("IO error: {0}")]
    Io(String),

    /// Record-level CSV failure (bad UTF-8, unterminated quote, ...)
    #[error("CSV error: {0}")]
    Csv(String),
}

fn byte_char(byte: &u8) -> char {
    char::from(*byte)
}

/// Structured failure from parsing one input record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The record ended before this column
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    /// The column was present but its text is not a valid value
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn invalid(field: &'static str, value: &str, reason: impl ToString) -> Self {
        ParseError::InvalidField {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for MbpError {
    fn from(err: std::io::Error) -> Self {
        MbpError::Io(err.to_string())
    }
}

impl From<csv::Error> for MbpError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io) => MbpError::Io(io.to_string()),
            _ => MbpError::Csv(err.to_string()),
        }
    }
}
