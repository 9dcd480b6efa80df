//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! SQLite error (sqlx::Error)
//!      │
//!      ▼
//! DbError (this module)  - adds context and categorization
//!      │
//!      ▼
//! ServiceError::Internal (pantry-service)  - opaque to callers
//! ```

use thiserror::Error;

/// Database operation errors.
///
/// Wraps sqlx errors with enough categorization for the service layer to
/// log with context before surfacing an opaque internal failure.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found where one was required.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// UNIQUE constraint violation.
    #[error("duplicate value for {constraint}")]
    UniqueViolation { constraint: String },

    /// FOREIGN KEY constraint violation.
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Connecting to or creating the database failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Applying migrations failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Connection pool exhausted or closed.
    #[error("connection pool unavailable")]
    PoolUnavailable,

    /// Anything else.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraints in the message text:
                //   "UNIQUE constraint failed: <table>.<column>"
                //   "FOREIGN KEY constraint failed"
                if let Some(constraint) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        constraint: constraint.to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => DbError::PoolUnavailable,

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
