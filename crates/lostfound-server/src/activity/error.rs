use thiserror::Error;

use crate::error::ServerError;

/// Failures while turning a request into an activity record.
///
/// None of these ever reach the client; the logger reports them through its
/// sink and forwards the request unchanged.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("Identity resolution failed: {0}")]
    Identity(String),

    #[error("Authenticated session carries no user id")]
    MissingUserId,

    #[error("Failed to serialize request data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to read request body: {0}")]
    RequestBody(String),

    #[error("Invalid activity record: {0}")]
    InvalidRecord(&'static str),

    #[error("Activity store error: {0}")]
    Store(#[from] ServerError),
}

impl From<sqlx::Error> for ActivityError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(ServerError::Database(err))
    }
}
