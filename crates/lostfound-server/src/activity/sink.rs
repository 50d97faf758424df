//! Clock and diagnostic-event collaborators of the activity logger

use chrono::{DateTime, Utc};
use http::Method;

use super::error::ActivityError;

/// Source of the `action_time` stamped on each record
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A record that was written
#[derive(Debug, Clone, Copy)]
pub struct RecordedActivity<'a> {
    pub log_id: i64,
    pub user_id: i64,
    /// Base phrase only; request data never reaches diagnostic output
    pub action: &'a str,
    pub path: &'a str,
    pub method: &'a Method,
}

/// A request whose record could not be written
#[derive(Debug, Clone, Copy)]
pub struct FailedActivity<'a> {
    pub error: &'a ActivityError,
    pub user_id: Option<i64>,
    pub path: &'a str,
    pub method: &'a Method,
}

/// Receives one event per logged or failed request
pub trait ActivitySink: Send + Sync {
    fn recorded(&self, event: &RecordedActivity<'_>);

    fn failed(&self, event: &FailedActivity<'_>);
}

/// Emits activity events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ActivitySink for TracingSink {
    fn recorded(&self, event: &RecordedActivity<'_>) {
        tracing::info!(
            log_id = event.log_id,
            user_id = event.user_id,
            action = %event.action,
            path = %event.path,
            method = %event.method,
            "Activity logged"
        );
    }

    fn failed(&self, event: &FailedActivity<'_>) {
        tracing::error!(
            error = %event.error,
            user_id = ?event.user_id,
            path = %event.path,
            method = %event.method,
            "Failed to log activity"
        );
    }
}
