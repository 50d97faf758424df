//! Lost & Found Server Library
//!
//! Administration back-office for a lost-and-found service.
//!
//! # Overview
//!
//! - **Activity logging**: every authenticated request is written to the
//!   `activity_log` table by [`activity::ActivityLayer`] before it reaches
//!   its handler
//! - **Admin API**: statistics, user management, the activity log and item
//!   reports under `/api/v1/admin`
//! - **Dashboard**: landing-page counts under `/api/v1/dashboard`
//!
//! # Request pipeline
//!
//! ```text
//! trace -> cors -> session -> activity log -> compression -> handler
//! ```
//!
//! The session layer attaches an [`auth::AuthenticatedUser`] to the request
//! when the caller carries a valid `x-user-id` header. The activity layer
//! reads it, describes the request and stores one row. Requests without a
//! session pass through untouched.
//!
//! # Example
//!
//! ```no_run
//! use lostfound_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     api::serve(config, pool).await?;
//!     Ok(())
//! }
//! ```

pub mod activity;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use error::{ServerError, ServerResult};
