//! Database queries for the activity log

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use super::models::{ActivityLog, ActivityLogEntry, ActivityQuery, NewActivityLog};
use crate::error::ServerResult;
use crate::models::UserSummary;

/// Insert one activity record and return the stored row
pub async fn create_activity_log(pool: &PgPool, entry: NewActivityLog) -> ServerResult<ActivityLog> {
    let record = sqlx::query_as::<_, ActivityLog>(
        r#"
        INSERT INTO activity_log (user_id, action, action_time, ip_address, user_agent)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, action, action_time, ip_address, user_agent,
                  created_at, updated_at
        "#,
    )
    .bind(entry.user_id)
    .bind(&entry.action)
    .bind(entry.action_time)
    .bind(&entry.ip_address)
    .bind(&entry.user_agent)
    .fetch_one(pool)
    .await?;

    debug!(log_id = record.id, user_id = entry.user_id, "Created activity log entry");

    Ok(record)
}

#[derive(Debug, sqlx::FromRow)]
struct ActivityLogRow {
    id: i64,
    user_id: Option<i64>,
    user_name: Option<String>,
    action: String,
    action_time: DateTime<Utc>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl From<ActivityLogRow> for ActivityLogEntry {
    fn from(row: ActivityLogRow) -> Self {
        let user = row
            .user_id
            .zip(row.user_name)
            .map(|(id, name)| UserSummary { id, name });

        Self {
            id: row.id,
            user,
            action: row.action,
            action_time: row.action_time,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
        }
    }
}

/// List activity entries, newest first, with the owning user joined in
pub async fn list_activity_log(pool: &PgPool, query: &ActivityQuery) -> ServerResult<Vec<ActivityLogEntry>> {
    let rows = sqlx::query_as::<_, ActivityLogRow>(
        r#"
        SELECT a.id, a.user_id, u.name AS user_name, a.action, a.action_time,
               a.ip_address, a.user_agent
        FROM activity_log a
        LEFT JOIN users u ON u.id = a.user_id
        WHERE ($1::BIGINT IS NULL OR a.user_id = $1)
        ORDER BY a.action_time DESC, a.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.user_id)
    .bind(query.effective_limit())
    .bind(query.effective_offset())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ActivityLogEntry::from).collect())
}
