use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::User;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersQuery {}

#[derive(Debug, Clone, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListUsersError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// All users ordered by id, without password hashes
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, _query: ListUsersQuery) -> Result<ListUsersResponse, ListUsersError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role, last_login_at, created_at, updated_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(&pool)
    .await?;

    tracing::debug!(count = users.len(), "Listed users");

    Ok(ListUsersResponse { users })
}
