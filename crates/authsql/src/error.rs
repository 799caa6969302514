//! Error types for authsql

use thiserror::Error;

/// Result type alias for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error types for adapter operations.
///
/// Backend errors are carried verbatim in their own variants so callers can tell
/// "backend unreachable" apart from an empty outcome that the operation forbids.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// SQLite driver error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// PostgreSQL driver error
    #[cfg(feature = "postgres")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Error raised by a third-party `SqlClient` implementation
    #[error("Backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),

    /// `create` got no row back from `RETURNING`
    #[error("Failed to create record in {model}")]
    NotCreated { model: String },

    /// `count` got no row (or no `count` column) back
    #[error("Count query on {model} returned no result")]
    CountMissing { model: String },

    /// Operator or connector outside the supported set
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Model or field name that is not a plain SQL identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Predicate value of the wrong shape for its operator
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Request rejected before reaching the backend
    #[error("Validation error: {0}")]
    Validation(String),

    /// Column value that has no `Scalar` representation
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl AdapterError {
    /// Wrap an arbitrary backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Backend(err.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create an invalid value error for a specific field
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this error came from the backend driver.
    pub fn is_backend(&self) -> bool {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => true,
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => true,
            Self::Backend(_) => true,
            _ => false,
        }
    }

    /// Check if this is a "record not created" error
    pub fn is_not_created(&self) -> bool {
        matches!(self, Self::NotCreated { .. })
    }

    /// Check if this is a "count returned nothing" error
    pub fn is_count_missing(&self) -> bool {
        matches!(self, Self::CountMissing { .. })
    }
}
