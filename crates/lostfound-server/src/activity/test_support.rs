//! In-memory collaborators for exercising the activity logger

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use http::Method;

use super::context::RequestContext;
use super::error::ActivityError;
use super::identity::IdentityResolver;
use super::logger::ActivityLogger;
use super::models::{ActivityLog, NewActivityLog};
use super::sink::{ActivitySink, Clock, FailedActivity, RecordedActivity};
use super::store::ActivityStore;

/// Store that keeps records in memory, or fails every insert
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ActivityLog>>,
    next_id: AtomicI64,
    failing: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<ActivityLog> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn insert(&self, entry: NewActivityLog) -> Result<ActivityLog, ActivityError> {
        if self.failing {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        let now = Utc::now();
        let log = ActivityLog {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: Some(entry.user_id),
            action: entry.action,
            action_time: entry.action_time,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
            created_at: now,
            updated_at: now,
        };
        self.records.lock().unwrap().push(log.clone());
        Ok(log)
    }
}

/// Identity with scripted answers
pub enum ScriptedIdentity {
    /// Claims a session but cannot name the user
    AuthenticatedWithoutId,
    /// Fails every lookup
    Broken,
}

impl IdentityResolver for ScriptedIdentity {
    fn is_authenticated(&self, _request: &RequestContext) -> Result<bool, ActivityError> {
        match self {
            Self::AuthenticatedWithoutId => Ok(true),
            Self::Broken => Err(ActivityError::Identity("session store unavailable".into())),
        }
    }

    fn current_user_id(&self, _request: &RequestContext) -> Result<Option<i64>, ActivityError> {
        match self {
            Self::AuthenticatedWithoutId => Ok(None),
            Self::Broken => Err(ActivityError::Identity("session store unavailable".into())),
        }
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 16, 8, 54, 38).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Recorded {
        log_id: i64,
        user_id: i64,
        action: String,
        path: String,
        method: Method,
    },
    Failed {
        error: String,
        user_id: Option<i64>,
        path: String,
        method: Method,
    },
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ActivitySink for RecordingSink {
    fn recorded(&self, event: &RecordedActivity<'_>) {
        self.events.lock().unwrap().push(SinkEvent::Recorded {
            log_id: event.log_id,
            user_id: event.user_id,
            action: event.action.to_string(),
            path: event.path.to_string(),
            method: event.method.clone(),
        });
    }

    fn failed(&self, event: &FailedActivity<'_>) {
        self.events.lock().unwrap().push(SinkEvent::Failed {
            error: event.error.to_string(),
            user_id: event.user_id,
            path: event.path.to_string(),
            method: event.method.clone(),
        });
    }
}

/// Logger over the given store and identity with a fixed clock and a recording sink
pub fn logger_with(
    store: Arc<dyn ActivityStore>,
    identity: Arc<dyn IdentityResolver>,
) -> (ActivityLogger, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let logger = ActivityLogger::new(store, identity)
        .with_clock(Arc::new(FixedClock(fixed_time())))
        .with_sink(sink.clone());
    (logger, sink)
}
