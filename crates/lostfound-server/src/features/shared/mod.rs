//! Shared utilities and types for feature modules
//!
//! - **items**: item and claim listings with their related users
//! - **validation**: user field validation
//! - **error_helpers**: database error handling utilities
//! - **test_helpers**: fixtures for database-backed tests (test-only)

pub mod error_helpers;
pub mod items;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use items::{ClaimSummary, ClaimView, FoundItemSummary, FoundItemView, LostItemView};
pub use validation::UserValidationError;
