//! Item and claim listings shared by the dashboard and admin reports
//!
//! Each listing is ordered newest first (`created_at`, then id) and takes an
//! optional limit; `None` returns every row.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::{Claim, FoundItem, LostItem, UserSummary};

/// Lost item with its reporter
#[derive(Debug, Clone, Serialize)]
pub struct LostItemView {
    #[serde(flatten)]
    pub item: LostItem,
    pub user: Option<UserSummary>,
}

/// Latest claim on a found item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimSummary {
    pub claim_id: i64,
    pub claim_status: String,
}

/// Found item with its reporter and most recent claim
#[derive(Debug, Clone, Serialize)]
pub struct FoundItemView {
    #[serde(flatten)]
    pub item: FoundItem,
    pub user: Option<UserSummary>,
    pub claim: Option<ClaimSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundItemSummary {
    pub id: i64,
    pub item_name: String,
}

/// Claim with its claimant and the claimed item
#[derive(Debug, Clone, Serialize)]
pub struct ClaimView {
    #[serde(flatten)]
    pub claim: Claim,
    pub user: Option<UserSummary>,
    pub found_item: Option<FoundItemSummary>,
}

#[derive(Debug, FromRow)]
struct LostItemRow {
    #[sqlx(flatten)]
    item: LostItem,
    owner_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct FoundItemRow {
    #[sqlx(flatten)]
    item: FoundItem,
    owner_name: Option<String>,
    latest_claim_id: Option<i64>,
    latest_claim_status: Option<String>,
}

#[derive(Debug, FromRow)]
struct ClaimRow {
    #[sqlx(flatten)]
    claim: Claim,
    claimant_name: Option<String>,
    found_item_name: Option<String>,
}

pub async fn list_lost_items(pool: &PgPool, limit: Option<i64>) -> Result<Vec<LostItemView>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LostItemRow>(
        r#"
        SELECT l.id, l.user_id, l.item_name, l.description, l.category, l.location,
               l.date_lost, l.status, l.created_at, l.updated_at,
               u.name AS owner_name
        FROM lost_items l
        LEFT JOIN users u ON u.id = l.user_id
        ORDER BY l.created_at DESC, l.id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| LostItemView {
            user: UserSummary::from_join(row.item.user_id, row.owner_name),
            item: row.item,
        })
        .collect())
}

pub async fn list_found_items(pool: &PgPool, limit: Option<i64>) -> Result<Vec<FoundItemView>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FoundItemRow>(
        r#"
        SELECT f.id, f.user_id, f.item_name, f.description, f.category, f.location,
               f.date_found, f.status, f.created_at, f.updated_at,
               u.name AS owner_name,
               c.claim_id AS latest_claim_id,
               c.claim_status AS latest_claim_status
        FROM found_items f
        LEFT JOIN users u ON u.id = f.user_id
        LEFT JOIN LATERAL (
            SELECT claim_id, claim_status
            FROM claims
            WHERE found_item_id = f.id
            ORDER BY created_at DESC, claim_id DESC
            LIMIT 1
        ) c ON TRUE
        ORDER BY f.created_at DESC, f.id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| FoundItemView {
            user: UserSummary::from_join(row.item.user_id, row.owner_name),
            claim: row
                .latest_claim_id
                .zip(row.latest_claim_status)
                .map(|(claim_id, claim_status)| ClaimSummary { claim_id, claim_status }),
            item: row.item,
        })
        .collect())
}

pub async fn list_claims(pool: &PgPool, limit: Option<i64>) -> Result<Vec<ClaimView>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ClaimRow>(
        r#"
        SELECT c.claim_id, c.found_item_id, c.user_id, c.claim_status,
               c.created_at, c.updated_at,
               u.name AS claimant_name,
               f.item_name AS found_item_name
        FROM claims c
        LEFT JOIN users u ON u.id = c.user_id
        LEFT JOIN found_items f ON f.id = c.found_item_id
        ORDER BY c.created_at DESC, c.claim_id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ClaimView {
            user: UserSummary::from_join(row.claim.user_id, row.claimant_name),
            found_item: row.found_item_name.map(|item_name| FoundItemSummary {
                id: row.claim.found_item_id,
                item_name,
            }),
            claim: row.claim,
        })
        .collect())
}
