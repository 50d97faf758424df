use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::items::{list_claims, list_found_items, list_lost_items};
use crate::features::shared::{ClaimView, FoundItemView, LostItemView};

/// Number of entries in each "recent" list
pub const RECENT_ITEMS_LIMIT: i64 = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardOverviewQuery {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverviewResponse {
    pub total_users: i64,
    pub lost_items: i64,
    pub found_items: i64,
    pub claims: i64,
    pub recent_lost_items: Vec<LostItemView>,
    pub recent_found_items: Vec<FoundItemView>,
    pub recent_claims: Vec<ClaimView>,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardOverviewError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct TableCounts {
    total_users: i64,
    lost_items: i64,
    found_items: i64,
    claims: i64,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    _query: DashboardOverviewQuery,
) -> Result<DashboardOverviewResponse, DashboardOverviewError> {
    let counts = sqlx::query_as::<_, TableCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM lost_items) AS lost_items,
            (SELECT COUNT(*) FROM found_items) AS found_items,
            (SELECT COUNT(*) FROM claims) AS claims
        "#,
    )
    .fetch_one(&pool);

    let limit = Some(RECENT_ITEMS_LIMIT);
    let (counts, recent_lost_items, recent_found_items, recent_claims) = tokio::try_join!(
        counts,
        list_lost_items(&pool, limit),
        list_found_items(&pool, limit),
        list_claims(&pool, limit),
    )?;

    Ok(DashboardOverviewResponse {
        total_users: counts.total_users,
        lost_items: counts.lost_items,
        found_items: counts.found_items,
        claims: counts.claims,
        recent_lost_items,
        recent_found_items,
        recent_claims,
    })
}
