//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! mismatched batch lengths, operations a value kind does not support, invalid
//! parameters, and grids whose storage has already been released.
//!
//! Every operation validates its inputs before touching a grid, so an `Err` always
//! leaves the operands exactly as they were.
use thiserror::Error;

use crate::grid::ValueKind;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("'{op}' is not supported for {kind} grids")]
    Unsupported { op: String, kind: ValueKind },

    #[error("grid kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: ValueKind, found: ValueKind },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("grid '{name}' has been disposed")]
    Disposed { name: String },

    #[error("{0} has no working grid; reset it first")]
    Uninitialized(&'static str),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn unsupported(op: impl Into<String>, kind: ValueKind) -> Self {
        Error::Unsupported {
            op: op.into(),
            kind,
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
