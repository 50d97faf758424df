//! Server-specific error types

use thiserror::Error;

/// Result type alias for server operations
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Errors from queries and server plumbing
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
