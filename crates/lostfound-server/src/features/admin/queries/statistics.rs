use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminStatisticsQuery {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatisticsResponse {
    pub total_users: i64,
    pub lost_items: i64,
    pub found_items: i64,
    /// Sum of per-user claim counts; claims whose user was deleted are not counted
    pub claims: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AdminStatisticsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    _query: AdminStatisticsQuery,
) -> Result<AdminStatisticsResponse, AdminStatisticsError> {
    let stats = sqlx::query_as::<_, AdminStatisticsResponse>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM lost_items) AS lost_items,
            (SELECT COUNT(*) FROM found_items) AS found_items,
            (SELECT COALESCE(SUM(get_user_claims_count(id)), 0)::BIGINT FROM users) AS claims
        "#,
    )
    .fetch_one(&pool)
    .await?;

    Ok(stats)
}
