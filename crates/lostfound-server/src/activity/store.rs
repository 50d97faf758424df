use async_trait::async_trait;
use sqlx::PgPool;

use super::error::ActivityError;
use super::models::{ActivityLog, NewActivityLog};
use super::queries::create_activity_log;

/// Durable destination for activity records.
///
/// Every successful `insert` yields a record with a fresh id, including
/// when the same request is submitted twice.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn insert(&self, entry: NewActivityLog) -> Result<ActivityLog, ActivityError>;
}

/// `activity_log` table in Postgres
#[derive(Debug, Clone)]
pub struct PgActivityStore {
    pool: PgPool,
}

impl PgActivityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for PgActivityStore {
    async fn insert(&self, entry: NewActivityLog) -> Result<ActivityLog, ActivityError> {
        Ok(create_activity_log(&self.pool, entry).await?)
    }
}
