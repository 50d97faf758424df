use serde::Serialize;
use sqlx::PgPool;

use crate::activity::{list_activity_log, ActivityLogEntry, ActivityQuery};
use crate::error::ServerError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogResponse {
    pub success: bool,
    pub activity_log: Vec<ActivityLogEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum ActivityLogError {
    #[error("{0}")]
    Store(#[from] ServerError),
}

/// Activity entries newest first, optionally for a single user
#[tracing::instrument(skip(pool), fields(user_id = ?query.user_id, limit = query.limit))]
pub async fn handle(pool: PgPool, query: ActivityQuery) -> Result<ActivityLogResponse, ActivityLogError> {
    let activity_log = list_activity_log(&pool, &query).await?;

    Ok(ActivityLogResponse {
        success: true,
        activity_log,
    })
}
