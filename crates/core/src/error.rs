//! Error types for the pagination domain layer.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ValidationError`] - Rejected pagination parameters
//! - [`StorageError`] - Data source errors
//! - [`PaginationError`] - Top-level error returned by the paginator
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! A malformed cursor is deliberately absent: the engine recovers from it
//! locally and never surfaces it to the caller.

use thiserror::Error;

// =============================================================================
// Validation Errors
// =============================================================================

/// Pagination parameters that cannot be interpreted.
///
/// These are always raised before the data source is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Both `after` and `before` were supplied.
    #[error("Invalid pagination: `after` and `before` cannot be combined")]
    ConflictingCursors,

    /// Both `first` and `last` were supplied.
    #[error("Invalid pagination: `first` and `last` cannot be combined")]
    ConflictingLimits,

    /// `first` or `last` was zero or negative.
    #[error("Invalid pagination: `{field}` must be at least 1, got {value}")]
    LimitOutOfRange {
        /// Parameter name (`first` or `last`).
        field: &'static str,
        /// Value supplied by the caller.
        value: i32,
    },
}

impl ValidationError {
    /// Short machine-readable reason, used as a metrics label.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ConflictingCursors => "conflicting_cursors",
            Self::ConflictingLimits => "conflicting_limits",
            Self::LimitOutOfRange { .. } => "limit_out_of_range",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Database and data source errors.
///
/// These errors originate from the thread source and are propagated
/// through the paginator without modification.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to establish database connection.
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// Query execution failed.
    #[error("Query execution error: {0}")]
    QueryError(String),

    /// Database migration failed.
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// A stored row could not be mapped to a domain model.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// =============================================================================
// Pagination Errors
// =============================================================================

/// Errors returned by [`crate::services::Paginator`].
#[derive(Debug, Error)]
pub enum PaginationError {
    /// Request parameters were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The data source failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The paginator was configured with unusable limits.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PaginationError {
    /// Whether the error was caused by caller input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for pagination operations.
pub type PaginationResult<T> = Result<T, PaginationError>;
