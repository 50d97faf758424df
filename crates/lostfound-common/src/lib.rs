//! Lost & Found Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging setup for the Lost & Found workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`LostFoundError`] and the [`Result`] alias
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`]
//!
//! # Example
//!
//! ```no_run
//! use lostfound_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> lostfound_common::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{LostFoundError, Result};
