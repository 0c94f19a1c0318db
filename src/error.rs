use std::collections::TryReserveError;
use std::fmt;

/// Unified error type for the skip map.
///
/// Absent keys and duplicate inserts are not errors; they are reported
/// through `Option`, `end()` cursors and the `inserted` flag.
#[derive(Debug)]
pub enum Error {
    /// Dereferenced or stepped forward from the end position.
    PastEnd,
    /// Stepped backward from the first position.
    BeforeBegin,
    /// Cursor was produced by a different map.
    ForeignCursor,
    /// Cursor points at an entry that has since been removed.
    StaleCursor,
    /// Allocation failed before the structure was modified.
    Alloc(TryReserveError),
    /// Rejected construction options.
    InvalidOptions(&'static str),
    /// Structural invariant violated (reported by `verify`).
    Corruption(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PastEnd => write!(f, "cursor is at or past the end"),
            Error::BeforeBegin => write!(f, "cursor is at the beginning"),
            Error::ForeignCursor => write!(f, "cursor belongs to another map"),
            Error::StaleCursor => write!(f, "cursor refers to a removed entry"),
            Error::Alloc(e) => write!(f, "allocation failed: {e}"),
            Error::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            Error::Corruption(msg) => write!(f, "Corruption: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Alloc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Self {
        Error::Alloc(e)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
