//! The activity-logging interceptor

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use super::action::{Action, ActionVerb};
use super::context::RequestContext;
use super::error::ActivityError;
use super::identity::IdentityResolver;
use super::models::{ActivityLog, NewActivityLog};
use super::sink::{ActivitySink, Clock, FailedActivity, RecordedActivity, SystemClock, TracingSink};
use super::store::ActivityStore;

/// Path prefixes of tooling endpoints that are never logged
pub const DEFAULT_SKIP_PREFIXES: [&str; 3] = ["_debugbar", "livewire", "sanctum"];

/// Records one activity entry per authenticated request, then forwards it.
///
/// Logging is best-effort: whatever goes wrong while classifying or storing
/// the entry is reported to the sink and the request is forwarded anyway.
/// The entry is written before the request reaches its handler, so it exists
/// even when the handler fails.
#[derive(Clone)]
pub struct ActivityLogger {
    store: Arc<dyn ActivityStore>,
    identity: Arc<dyn IdentityResolver>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn ActivitySink>,
    skip_prefixes: Arc<[String]>,
}

impl ActivityLogger {
    pub fn new(store: Arc<dyn ActivityStore>, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            store,
            identity,
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ActivitySink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the skip list. Entries are matched case-sensitively, in order.
    pub fn with_skip_prefixes<I, P>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.skip_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn skip_prefixes(&self) -> &[String] {
        &self.skip_prefixes
    }

    /// Whether `path` belongs to a skipped tooling endpoint.
    ///
    /// A prefix matches the path as received or the path without its
    /// leading slash, so `livewire` and `/livewire` both skip `/livewire/x`.
    pub fn is_skipped(&self, path: &str) -> bool {
        let relative = path.strip_prefix('/').unwrap_or(path);
        self.skip_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()) || relative.starts_with(prefix.as_str()))
    }

    /// Whether `request` would be logged with request data, which is the only
    /// case where the body is worth reading.
    pub fn wants_request_data(&self, request: &RequestContext) -> bool {
        ActionVerb::from_method(request.method()).captures_data()
            && !self.is_skipped(request.path())
            && self.identity.is_authenticated(request).unwrap_or(false)
    }

    /// Write the entry for `request` if it should be logged.
    ///
    /// Returns `Ok(None)` for anonymous requests and skipped paths.
    pub async fn record(&self, request: &RequestContext) -> Result<Option<ActivityLog>, ActivityError> {
        if !self.identity.is_authenticated(request)? {
            return Ok(None);
        }
        if self.is_skipped(request.path()) {
            debug!(path = %request.path(), "Skipping activity log for tooling path");
            return Ok(None);
        }

        let user_id = self
            .identity
            .current_user_id(request)?
            .ok_or(ActivityError::MissingUserId)?;
        let action_time = self.clock.now();
        let action = Action::describe(request.method(), request.path(), request.fields())?;

        let entry = NewActivityLog::builder()
            .user_id(user_id)
            .action(action.to_string())
            .action_time(action_time)
            .ip_address(request.client_ip().map(|ip| ip.to_string()))
            .user_agent(request.user_agent().map(Cow::into_owned))
            .try_build()?;

        let log = self.store.insert(entry).await?;

        self.sink.recorded(&RecordedActivity {
            log_id: log.id,
            user_id,
            action: action.summary(),
            path: request.path(),
            method: request.method(),
        });

        Ok(Some(log))
    }

    /// Report a logging failure for `request` to the sink
    pub fn report_failure(&self, request: &RequestContext, error: &ActivityError) {
        let user_id = self.identity.current_user_id(request).ok().flatten();
        self.sink.failed(&FailedActivity {
            error,
            user_id,
            path: request.path(),
            method: request.method(),
        });
    }

    /// Log `request` and hand it to `next`, returning whatever `next` produces.
    ///
    /// `next` is called exactly once, after the logging attempt has finished,
    /// and its output is never altered.
    pub async fn intercept<Req, F, Fut>(&self, ctx: &RequestContext, request: Req, next: F) -> Fut::Output
    where
        F: FnOnce(Req) -> Fut,
        Fut: Future,
    {
        if let Err(error) = self.record(ctx).await {
            self.report_failure(ctx, &error);
        }
        next(request).await
    }
}

impl std::fmt::Debug for ActivityLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLogger")
            .field("skip_prefixes", &self.skip_prefixes)
            .finish_non_exhaustive()
    }
}
