//! Test helpers and fixtures for database tests
//!
//! ```rust,ignore
//! use crate::features::shared::test_helpers::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_something(pool: PgPool) -> sqlx::Result<()> {
//!     let owner = TestUser::new("Alice", "alice@example.com").insert(&pool).await?;
//!     let item = TestFoundItem::new("Umbrella").owned_by(owner).insert(&pool).await?;
//!     insert_claim(&pool, item, Some(owner), "pending").await?;
//!     Ok(())
//! }
//! ```

use sqlx::PgPool;

/// Builder for creating test users
#[derive(Debug, Clone)]
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl TestUser {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            role: "user".to_string(),
        }
    }

    pub fn admin(mut self) -> Self {
        self.role = "admin".to_string();
        self
    }

    /// Insert the user and return its id
    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar(
            "INSERT INTO users (name, email, password, role) VALUES ($1, $2, 'not-a-hash', $3) RETURNING id",
        )
        .bind(&self.name)
        .bind(&self.email)
        .bind(&self.role)
        .fetch_one(pool)
        .await
    }
}

/// Builder for creating test lost items
#[derive(Debug, Clone)]
pub struct TestLostItem {
    pub item_name: String,
    pub user_id: Option<i64>,
}

impl TestLostItem {
    pub fn new(item_name: &str) -> Self {
        Self {
            item_name: item_name.to_string(),
            user_id: None,
        }
    }

    pub fn owned_by(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar("INSERT INTO lost_items (user_id, item_name) VALUES ($1, $2) RETURNING id")
            .bind(self.user_id)
            .bind(&self.item_name)
            .fetch_one(pool)
            .await
    }
}

/// Builder for creating test found items
#[derive(Debug, Clone)]
pub struct TestFoundItem {
    pub item_name: String,
    pub user_id: Option<i64>,
}

impl TestFoundItem {
    pub fn new(item_name: &str) -> Self {
        Self {
            item_name: item_name.to_string(),
            user_id: None,
        }
    }

    pub fn owned_by(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar("INSERT INTO found_items (user_id, item_name) VALUES ($1, $2) RETURNING id")
            .bind(self.user_id)
            .bind(&self.item_name)
            .fetch_one(pool)
            .await
    }
}

/// Insert a claim and return its `claim_id`
pub async fn insert_claim(
    pool: &PgPool,
    found_item_id: i64,
    user_id: Option<i64>,
    status: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "INSERT INTO claims (found_item_id, user_id, claim_status) VALUES ($1, $2, $3) RETURNING claim_id",
    )
    .bind(found_item_id)
    .bind(user_id)
    .bind(status)
    .fetch_one(pool)
    .await
}
