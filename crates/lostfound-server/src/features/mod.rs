//! Feature modules implementing the Lost & Found API
//!
//! Each feature is a vertical slice with its own commands, queries and routes.
//!
//! # Features
//!
//! - **dashboard**: Landing-page counts and recent activity
//! - **admin**: Statistics, user management, activity log and item reports
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions
//!
//! Commands and queries are plain data; each has a standalone `handle`
//! function holding its business logic and SQL, and a dedicated error type
//! that the routes map to HTTP responses.

pub mod admin;
pub mod dashboard;
pub mod shared;

use std::sync::Arc;

use axum::Router;

use crate::auth::PasswordHasher;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool for database operations
    pub db: sqlx::PgPool,
    /// Hashes passwords of newly created users
    pub hasher: Arc<dyn PasswordHasher>,
}

/// Creates the API router with all feature routes mounted
///
/// - `/dashboard` - Dashboard overview
/// - `/admin` - Administration endpoints
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/dashboard", dashboard::dashboard_routes().with_state(state.db.clone()))
        .nest("/admin", admin::admin_routes().with_state(state))
}
