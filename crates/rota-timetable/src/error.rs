//! Error types for timetable operations.

use thiserror::Error;

/// Errors produced by the calendar algebra and the slot key codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimetableError {
    /// An hour pair was not exactly two values inside the calendar bit width
    #[error("Invalid hour range: {0}")]
    InvalidRange(String),

    /// A slot key string did not match `<day>:<start>,<end>`
    #[error("Malformed slot key: {0}")]
    MalformedKey(String),
}

/// Result type alias for timetable operations
pub type TimetableResult<T> = Result<T, TimetableError>;
