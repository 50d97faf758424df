use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GetCurrentUserQuery {
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct GetCurrentUserResponse {
    pub id: i64,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetCurrentUserError {
    #[error("User '{0}' not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(user_id = query.user_id))]
pub async fn handle(
    pool: PgPool,
    query: GetCurrentUserQuery,
) -> Result<GetCurrentUserResponse, GetCurrentUserError> {
    sqlx::query_as::<_, GetCurrentUserResponse>("SELECT id, last_login_at FROM users WHERE id = $1")
        .bind(query.user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetCurrentUserError::NotFound(query.user_id))
}
