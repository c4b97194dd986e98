//! Error types for store operations.
//!
//! All errors use thiserror for consistent error handling across the codebase.

use thiserror::Error;

/// Errors surfaced by a [`crate::DocumentStore`] implementation.
///
/// These are infrastructure failures: callers may retry reads, but must
/// re-verify state before retrying a non-idempotent write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write addressed a document that does not exist
    #[error("Document not found: {collection}/{id}")]
    NotFound {
        /// Collection the document was looked up in
        collection: &'static str,
        /// Document id
        id: String,
    },

    /// Backend-specific failure carrying the underlying message
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Validation errors for persisted records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A field failed validation
    #[error("Invalid {field} in {record} '{id}': {reason}")]
    InvalidField {
        /// Record type name
        record: &'static str,
        /// Id of the offending record
        id: String,
        /// Field that failed validation
        field: &'static str,
        /// Reason for the failure
        reason: String,
    },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::NotFound {
            collection: "courses",
            id: "c1".to_string(),
        };
        assert_eq!(err.to_string(), "Document not found: courses/c1");

        let err = RecordError::InvalidField {
            record: "school",
            id: "s1".to_string(),
            field: "hours_per_day",
            reason: "must be between 1 and 32".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid hours_per_day in school 's1': must be between 1 and 32"
        );
    }
}
