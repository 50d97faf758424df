//! Tower layer that runs every request through the [`ActivityLogger`]
//!
//! - Reads the request body only when the request will be logged with data
//!   and the body is JSON or form-encoded
//! - Buffers at most [`DEFAULT_MAX_CAPTURED_BODY_BYTES`]; larger bodies are
//!   logged without data and streamed on unchanged
//! - Re-attaches the body byte-for-byte so handlers see the original request,
//!   including a read error if the client connection fails mid-body
//! - Writes the entry before the inner service runs
//! - Never changes the inner service's response

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::Request,
    http::{header, HeaderMap},
};
use futures::{stream, StreamExt};
use http_body_util::BodyExt;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, warn};

use super::context::{BodyKind, RequestContext};
use super::error::ActivityError;
use super::logger::ActivityLogger;

/// Largest request body buffered for logging, the same as axum's `DefaultBodyLimit`
pub const DEFAULT_MAX_CAPTURED_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Activity logging layer
#[derive(Debug, Clone)]
pub struct ActivityLayer {
    logger: ActivityLogger,
    trust_forwarded_for: bool,
    max_body_bytes: usize,
}

impl ActivityLayer {
    pub fn new(logger: ActivityLogger) -> Self {
        Self {
            logger,
            trust_forwarded_for: false,
            max_body_bytes: DEFAULT_MAX_CAPTURED_BODY_BYTES,
        }
    }

    /// Bodies larger than `max` are logged without their fields
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Take the client address from `X-Forwarded-For` when it parses.
    /// Only enable behind a proxy that sets the header.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}

impl<S> Layer<S> for ActivityLayer {
    type Service = ActivityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ActivityMiddleware {
            inner,
            logger: self.logger.clone(),
            trust_forwarded_for: self.trust_forwarded_for,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// Activity logging middleware service
#[derive(Debug, Clone)]
pub struct ActivityMiddleware<S> {
    inner: S,
    logger: ActivityLogger,
    trust_forwarded_for: bool,
    max_body_bytes: usize,
}

impl<S> Service<Request> for ActivityMiddleware<S>
where
    S: Service<Request> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // The clone is not guaranteed ready; keep the one poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let logger = self.logger.clone();
        let trust_forwarded_for = self.trust_forwarded_for;
        let max_body_bytes = self.max_body_bytes;

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let mut ctx = RequestContext::from_parts(&parts, trust_forwarded_for);

            let body = match BodyKind::from_headers(&parts.headers) {
                Some(kind) if logger.wants_request_data(&ctx) => {
                    match capture_body(&parts.headers, body, max_body_bytes).await {
                        Capture::Complete(bytes) => {
                            debug!(
                                method = %ctx.method(),
                                path = %ctx.path(),
                                body_size = bytes.len(),
                                "Captured request body"
                            );
                            ctx.merge_body_fields(kind.parse_fields(&bytes));
                            Body::from(bytes)
                        },
                        Capture::Oversized(body) => {
                            debug!(
                                method = %ctx.method(),
                                path = %ctx.path(),
                                limit = max_body_bytes,
                                "Request body too large to capture"
                            );
                            body
                        },
                        Capture::Failed { error, body } => {
                            warn!(
                                method = %ctx.method(),
                                path = %ctx.path(),
                                error = %error,
                                "Failed to capture request body"
                            );
                            logger.report_failure(&ctx, &ActivityError::RequestBody(error));
                            return inner.call(Request::from_parts(parts, body)).await;
                        },
                    }
                },
                _ => body,
            };

            let request = Request::from_parts(parts, body);
            logger.intercept(&ctx, request, |request| inner.call(request)).await
        })
    }
}

/// Outcome of buffering a request body for logging
enum Capture {
    /// The whole body, within the limit
    Complete(Bytes),
    /// Over the limit; yields the same bytes as the original body
    Oversized(Body),
    /// The body failed mid-read; yields the bytes read so far, then the error
    Failed { error: String, body: Body },
}

async fn capture_body(headers: &HeaderMap, mut body: Body, limit: usize) -> Capture {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());
    let limit_u64 = u64::try_from(limit).unwrap_or(u64::MAX);
    if declared.is_some_and(|len| len > limit_u64) || body.size_hint().lower() > limit_u64 {
        return Capture::Oversized(body);
    }

    let mut chunks: Vec<Bytes> = Vec::new();
    let mut read = 0usize;
    loop {
        match body.frame().await {
            None => return Capture::Complete(Bytes::from(chunks.concat())),
            Some(Ok(frame)) => {
                // trailers carry no form or JSON fields
                let Ok(data) = frame.into_data() else {
                    continue;
                };
                read = read.saturating_add(data.len());
                chunks.push(data);
                if read > limit {
                    let prefix = stream::iter(chunks.into_iter().map(Ok::<_, axum::Error>));
                    let rest = body.into_data_stream();
                    return Capture::Oversized(Body::from_stream(prefix.chain(rest)));
                }
            },
            Some(Err(error)) => {
                let message = error.to_string();
                let replay = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err::<Bytes, _>(error)));
                return Capture::Failed {
                    error: message,
                    body: Body::from_stream(stream::iter(replay)),
                };
            },
        }
    }
}
