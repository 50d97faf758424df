//! Database models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parse a role name exactly as stored
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account without its password hash
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal user reference embedded in other resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
}

impl UserSummary {
    /// Build from a LEFT JOIN where either column may be missing
    pub fn from_join(id: Option<i64>, name: Option<String>) -> Option<Self> {
        id.zip(name).map(|(id, name)| Self { id, name })
    }
}

/// Lost item report
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LostItem {
    pub id: i64,
    pub user_id: Option<i64>,
    pub item_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub date_lost: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Found item report
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoundItem {
    pub id: i64,
    pub user_id: Option<i64>,
    pub item_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub date_found: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Claim on a found item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Claim {
    pub claim_id: i64,
    pub found_item_id: i64,
    pub user_id: Option<i64>,
    pub claim_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
