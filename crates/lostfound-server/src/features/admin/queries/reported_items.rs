use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::items::{list_found_items, list_lost_items};
use crate::features::shared::{FoundItemView, LostItemView};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportedItemsQuery {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedItemsResponse {
    pub lost_items: Vec<LostItemView>,
    pub found_items: Vec<FoundItemView>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportedItemsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Every lost and found report, found items with their latest claim
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    _query: ReportedItemsQuery,
) -> Result<ReportedItemsResponse, ReportedItemsError> {
    let (lost_items, found_items) =
        tokio::try_join!(list_lost_items(&pool, None), list_found_items(&pool, None))?;

    Ok(ReportedItemsResponse {
        lost_items,
        found_items,
    })
}
