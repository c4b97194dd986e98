//! Error types for the reservation server.
//!
//! All errors use thiserror for consistent error handling across the
//! codebase. [`BookingError`] is the protocol taxonomy surfaced to callers
//! as stable codes; the remaining enums cover configuration, seed data and
//! server runtime failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rota_store::{RecordError, StoreError};
use rota_timetable::TimetableError;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Outcome of a subscribe or unsubscribe operation, surfaced to the caller
/// as a stable code rather than a stack trace.
///
/// Every variant except `Store` is non-retryable without changing input.
/// `Store` failures are infrastructure: the caller is told the outcome is
/// unknown and should re-verify state before retrying a write.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Caller token could not be resolved to an identity, or the caller is
    /// not allowed to perform this operation
    #[error("Caller identity could not be resolved")]
    Unauthorized,

    /// Identity resolved but no profile document matches it
    #[error("No profile exists for this account; is it enrolled in a school?")]
    ProfileMissing,

    /// Profile exists but has no timetable yet
    #[error("Profile has no timetable yet")]
    ProfileIncomplete,

    /// Admin-held reservations cannot be released
    #[error("Admin reservations cannot be modified")]
    CannotModifyAdmin,

    /// Course does not exist
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    /// Profile has no location, or the location document is missing
    #[error("Location not found")]
    LocationNotFound,

    /// Reservation does not exist
    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    /// The reservation points at a profile that no longer exists
    #[error("Reservation owner no longer exists")]
    ReservationOwnerMissing,

    /// The reservation owner has no timetable to re-open
    #[error("Reservation owner has no timetable")]
    OwnerRulesMissing,

    /// Requested hour range was not exactly two in-width integers
    #[error("Invalid hour range: {0}")]
    InvalidRange(String),

    /// A slot key failed to parse
    #[error("Malformed slot key: {0}")]
    MalformedKey(String),

    /// Course declares no booking unit and cannot be reserved
    #[error("Course declares no booking unit")]
    CourseMisconfigured,

    /// Requested range is outside the location's segmented availability
    #[error("Course is not offered at the requested time")]
    SlotNotOffered,

    /// Some other commitment already consumes part of the requested range
    #[error("Requested time conflicts with an existing commitment")]
    SlotConflict,

    /// Capacity was exhausted by a concurrent reservation
    #[error("Course capacity is exhausted for this slot")]
    CourseFull,

    /// Store call failed; operation outcome is unknown
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    /// Stable wire code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ProfileMissing => "PROFILE_MISSING",
            Self::ProfileIncomplete => "PROFILE_INCOMPLETE",
            Self::CannotModifyAdmin => "CANNOT_MODIFY_ADMIN",
            Self::CourseNotFound(_) => "COURSE_NOT_FOUND",
            Self::LocationNotFound => "LOCATION_NOT_FOUND",
            Self::ReservationNotFound(_) => "RESERVATION_NOT_FOUND",
            Self::ReservationOwnerMissing => "RESERVATION_OWNER_MISSING",
            Self::OwnerRulesMissing => "OWNER_RULES_MISSING",
            Self::InvalidRange(_) => "INVALID_RANGE",
            Self::MalformedKey(_) => "MALFORMED_KEY",
            Self::CourseMisconfigured => "COURSE_MISCONFIGURED",
            Self::SlotNotOffered => "SLOT_NOT_OFFERED",
            Self::SlotConflict => "SLOT_CONFLICT",
            Self::CourseFull => "COURSE_FULL",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::CannotModifyAdmin => StatusCode::FORBIDDEN,
            Self::ProfileMissing
            | Self::CourseNotFound(_)
            | Self::LocationNotFound
            | Self::ReservationNotFound(_)
            | Self::ReservationOwnerMissing => StatusCode::NOT_FOUND,
            Self::InvalidRange(_) | Self::MalformedKey(_) => StatusCode::BAD_REQUEST,
            Self::CourseMisconfigured | Self::OwnerRulesMissing => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::ProfileIncomplete
            | Self::SlotNotOffered
            | Self::SlotConflict
            | Self::CourseFull => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TimetableError> for BookingError {
    fn from(err: TimetableError) -> Self {
        match err {
            TimetableError::InvalidRange(reason) => Self::InvalidRange(reason),
            TimetableError::MalformedKey(raw) => Self::MalformedKey(raw),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Store failure surfaced to caller: {self}");
        }
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration value
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Seed-data errors raised while loading the school, token map or records.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Failed to read a seed file
    #[error("Failed to load seed data from {path}: {source}")]
    LoadFailed {
        /// Path to the offending file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid JSON in a seed file
    #[error("Invalid JSON in seed file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A record failed field validation
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A record references another record that is not in the seed
    #[error("{record} '{id}' references unknown {target} '{reference}'")]
    UnknownReference {
        /// Record type holding the dangling reference
        record: &'static str,
        /// Id of the referencing record
        id: String,
        /// Referenced record type
        target: &'static str,
        /// The dangling id
        reference: String,
    },
}

/// Server runtime errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind HTTP server
    #[error("Failed to bind HTTP server to {addr}: {source}")]
    HttpBindFailed {
        /// Address that failed to bind
        addr: std::net::SocketAddr,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Seed data error
    #[error("Seed data error: {0}")]
    Seed(#[from] SeedError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server shutdown error
    #[error("Server shutdown error: {0}")]
    Shutdown(String),
}
