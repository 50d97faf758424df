//! Activity logging
//!
//! Every request made by a signed-in user is written to the `activity_log`
//! table as one human-readable action, before the request is handled:
//!
//! - `GET` requests are recorded as `Viewed <path>` without request data
//! - `POST`, `PUT`/`PATCH` and `DELETE` become `Created new`, `Updated` and
//!   `Deleted`, followed by the request fields as compact JSON
//! - `password`, `token` and `_token` are never recorded
//! - tooling endpoints (`_debugbar`, `livewire`, `sanctum`) are skipped
//!
//! Logging never affects the response. Failures are reported through the
//! logger's [`ActivitySink`] and the request continues.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use sqlx::PgPool;
//! use lostfound_server::activity::{ActivityLayer, ActivityLogger, PgActivityStore, SessionIdentity};
//!
//! # fn example(pool: PgPool) {
//! let logger = ActivityLogger::new(Arc::new(PgActivityStore::new(pool)), Arc::new(SessionIdentity));
//! let app: Router = Router::new().layer(ActivityLayer::new(logger));
//! # }
//! ```

mod action;
mod context;
mod error;
mod identity;
mod logger;
mod middleware;
mod models;
mod queries;
mod sink;
mod store;

#[cfg(test)]
mod logger_tests;
#[cfg(test)]
mod test_support;

pub use action::{Action, ActionVerb, REDACTED_FIELDS};
pub use context::{BodyKind, RequestContext};
pub use error::ActivityError;
pub use identity::{IdentityResolver, SessionIdentity};
pub use logger::{ActivityLogger, DEFAULT_SKIP_PREFIXES};
pub use middleware::{ActivityLayer, ActivityMiddleware, DEFAULT_MAX_CAPTURED_BODY_BYTES};
pub use models::{
    ActivityLog, ActivityLogEntry, ActivityQuery, FieldMap, NewActivityLog, NewActivityLogBuilder,
    DEFAULT_ACTIVITY_QUERY_LIMIT, MAX_ACTIVITY_QUERY_LIMIT,
};
pub use queries::{create_activity_log, list_activity_log};
pub use sink::{ActivitySink, Clock, FailedActivity, RecordedActivity, SystemClock, TracingSink};
pub use store::{ActivityStore, PgActivityStore};
