//! Activity log data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::ActivityError;
use crate::models::UserSummary;

// ============================================================================
// Activity Query Constants
// ============================================================================

/// Default number of activity entries returned per query
pub const DEFAULT_ACTIVITY_QUERY_LIMIT: i64 = 100;

/// Maximum number of activity entries that can be returned in a single query.
pub const MAX_ACTIVITY_QUERY_LIMIT: i64 = 1000;

/// Width of the `ip_address` column; fits any textual IPv6 address.
pub const MAX_IP_ADDRESS_LEN: usize = 45;

/// Request fields in the order the client sent them.
pub type FieldMap = serde_json::Map<String, JsonValue>;

/// Activity log row from the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLog {
    pub id: i64,
    /// Owning user; nulled by the store when the user is deleted
    pub user_id: Option<i64>,
    pub action: String,
    /// When the request was captured, not when the row was written
    pub action_time: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for persisting one activity record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivityLog {
    pub user_id: i64,
    pub action: String,
    pub action_time: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewActivityLog {
    /// Create a builder for constructing activity records
    pub fn builder() -> NewActivityLogBuilder {
        NewActivityLogBuilder::default()
    }
}

/// Builder for [`NewActivityLog`]
#[derive(Debug, Clone, Default)]
pub struct NewActivityLogBuilder {
    user_id: Option<i64>,
    action: Option<String>,
    action_time: Option<DateTime<Utc>>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl NewActivityLogBuilder {
    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn action_time(mut self, action_time: DateTime<Utc>) -> Self {
        self.action_time = Some(action_time);
        self
    }

    pub fn ip_address(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Build the record, rejecting anything the `activity_log` table would not accept
    pub fn try_build(self) -> Result<NewActivityLog, ActivityError> {
        let user_id = self
            .user_id
            .ok_or(ActivityError::InvalidRecord("user_id is required"))?;
        let action = self
            .action
            .filter(|a| !a.is_empty())
            .ok_or(ActivityError::InvalidRecord("action must not be empty"))?;
        let action_time = self
            .action_time
            .ok_or(ActivityError::InvalidRecord("action_time is required"))?;

        if self
            .ip_address
            .as_ref()
            .is_some_and(|ip| ip.len() > MAX_IP_ADDRESS_LEN)
        {
            return Err(ActivityError::InvalidRecord("ip_address exceeds 45 characters"));
        }

        Ok(NewActivityLog {
            user_id,
            action,
            action_time,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
        })
    }
}

/// Query parameters for the activity log listing
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityQuery {
    /// Filter by user ID
    pub user_id: Option<i64>,
    /// Maximum number of results to return
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Offset for pagination
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_ACTIVITY_QUERY_LIMIT
}

impl Default for ActivityQuery {
    fn default() -> Self {
        Self {
            user_id: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl ActivityQuery {
    /// Limit clamped to `1..=MAX_ACTIVITY_QUERY_LIMIT`
    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(1, MAX_ACTIVITY_QUERY_LIMIT)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.max(0)
    }
}

/// Activity entry as shown to administrators, with the owning user resolved
#[derive(Debug, Clone, Serialize)]
pub struct ActivityLogEntry {
    pub id: i64,
    pub user: Option<UserSummary>,
    pub action: String,
    pub action_time: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
