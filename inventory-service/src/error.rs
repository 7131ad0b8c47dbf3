//! Error types and transport conversions
//!
//! Every store-level failure is wrapped into a [`DbError`] carrying the
//! operation and table it happened on before it crosses the repository
//! boundary. The coarse [`ErrorKind`] taxonomy is what the transport adapters
//! consume: REST via [`IntoResponse`], gRPC via `From<Error> for Status`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error as ThisError;

use crate::entity::ReservationStatus;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Category of database error, classified from the driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbErrorKind {
    /// No row matched the query
    NotFound,
    /// Unique constraint violation (duplicate key)
    UniqueViolation,
    /// Foreign key constraint violation
    ForeignKeyViolation,
    /// Serializable transactions could not be reconciled (SQLSTATE 40001)
    SerializationFailure,
    /// Pool or statement timeout
    Timeout,
    /// Anything else the driver reported
    Other,
}

impl fmt::Display for DbErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::UniqueViolation => write!(f, "unique_violation"),
            Self::ForeignKeyViolation => write!(f, "foreign_key_violation"),
            Self::SerializationFailure => write!(f, "serialization_failure"),
            Self::Timeout => write!(f, "timeout"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured database error with operation and table context
#[derive(Debug, ThisError)]
#[error("database {kind} error during {operation} on {table}: {source}")]
pub struct DbError {
    /// Operation being performed, e.g. "find product by id"
    pub operation: &'static str,
    /// Table the operation targeted
    pub table: &'static str,
    /// Classified category
    pub kind: DbErrorKind,
    /// The underlying driver error
    #[source]
    pub source: sqlx::Error,
}

impl DbError {
    /// Wrap a driver error with operation and table context
    pub fn new(source: sqlx::Error, table: &'static str, operation: &'static str) -> Self {
        let kind = classify(&source);
        Self {
            operation,
            table,
            kind,
            source,
        }
    }
}

/// Classify a driver error into a [`DbErrorKind`]
fn classify(err: &sqlx::Error) -> DbErrorKind {
    match err {
        sqlx::Error::RowNotFound => DbErrorKind::NotFound,
        sqlx::Error::PoolTimedOut => DbErrorKind::Timeout,
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("40001") => DbErrorKind::SerializationFailure,
            Some("23505") => DbErrorKind::UniqueViolation,
            Some("23503") => DbErrorKind::ForeignKeyViolation,
            _ => DbErrorKind::Other,
        },
        _ => DbErrorKind::Other,
    }
}

/// Coarse error taxonomy consumed by the transport adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lookup matched nothing
    NotFound,
    /// Nil/empty payload, zero id, invalid status transition
    InvalidArgument,
    /// Concurrent write conflict (duplicate key, serialization failure)
    Conflict,
    /// Unclassified failure
    Internal,
}

/// Main error type for the service
#[derive(Debug, ThisError)]
pub enum Error {
    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request payload or identifier
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Disallowed reservation status transition
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// Concurrent write conflict
    #[error("conflict: {0}")]
    Conflict(String),

    /// Structured database error with operation context
    #[error(transparent)]
    Database(#[from] DbError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a driver error with operation and table context
    pub fn db(source: sqlx::Error, table: &'static str, operation: &'static str) -> Self {
        Self::Database(DbError::new(source, table, operation))
    }

    /// Map this error onto the coarse taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidArgument(_) | Self::InvalidTransition { .. } => ErrorKind::InvalidArgument,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Database(db) => match db.kind {
                DbErrorKind::NotFound => ErrorKind::NotFound,
                DbErrorKind::SerializationFailure | DbErrorKind::UniqueViolation => {
                    ErrorKind::Conflict
                }
                DbErrorKind::ForeignKeyViolation => ErrorKind::InvalidArgument,
                DbErrorKind::Timeout | DbErrorKind::Other => ErrorKind::Internal,
            },
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<Error> for tonic::Status {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => tonic::Status::not_found(message),
            ErrorKind::InvalidArgument => tonic::Status::invalid_argument(message),
            ErrorKind::Conflict => tonic::Status::aborted(message),
            ErrorKind::Internal => {
                tracing::error!(error = %message, "rpc failed");
                tonic::Status::internal(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_kind() {
        let err = Error::NotFound("product 42".to_string());
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn invalid_transition_is_invalid_argument() {
        let err = Error::InvalidTransition {
            from: ReservationStatus::Confirmed,
            to: ReservationStatus::Pending,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("CONFIRMED"));
        assert!(err.to_string().contains("PENDING"));
    }

    #[test]
    fn row_not_found_classifies_as_not_found() {
        let err = Error::db(sqlx::Error::RowNotFound, "products", "find product by id");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn pool_timeout_classifies_as_internal() {
        let err = Error::db(sqlx::Error::PoolTimedOut, "products", "find product");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn db_error_display_includes_operation_and_table() {
        let err = DbError::new(sqlx::Error::RowNotFound, "reservations", "count reservation");
        let display = err.to_string();
        assert!(display.contains("count reservation"));
        assert!(display.contains("reservations"));
        assert!(display.contains("not_found"));
    }

    #[test]
    fn grpc_status_codes() {
        let status: tonic::Status = Error::NotFound("reservation 7".to_string()).into();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let status: tonic::Status = Error::InvalidArgument("quantity".to_string()).into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status: tonic::Status = Error::Conflict("serialization failure".to_string()).into();
        assert_eq!(status.code(), tonic::Code::Aborted);
    }
}
