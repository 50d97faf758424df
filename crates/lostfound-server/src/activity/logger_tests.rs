//! Tests for the activity logger

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::{header, HeaderMap, HeaderValue, Method};
use serde_json::json;

use super::context::RequestContext;
use super::identity::SessionIdentity;
use super::models::FieldMap;
use super::test_support::{fixed_time, logger_with, MemoryStore, ScriptedIdentity, SinkEvent};
use crate::auth::AuthenticatedUser;

fn fields(value: serde_json::Value) -> FieldMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn signed_in(method: Method, path: &str, user_id: i64) -> RequestContext {
    RequestContext::new(method, path).with_identity(AuthenticatedUser { id: user_id })
}

#[tokio::test]
async fn test_get_is_logged_without_data() {
    let store = Arc::new(MemoryStore::default());
    let (logger, sink) = logger_with(store.clone(), Arc::new(SessionIdentity));

    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
    let ctx = signed_in(Method::GET, "/items", 7)
        .with_headers(headers)
        .with_client_ip(IpAddr::from([10, 0, 0, 4]))
        .with_fields(fields(json!({"page": "2"})));

    let response = logger.intercept(&ctx, "request", |req| async move { format!("{req} handled") }).await;

    assert_eq!(response, "request handled");
    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id, Some(7));
    assert_eq!(records[0].action, "Viewed /items");
    assert_eq!(records[0].action_time, fixed_time());
    assert_eq!(records[0].ip_address.as_deref(), Some("10.0.0.4"));
    assert_eq!(records[0].user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(
        sink.events(),
        vec![SinkEvent::Recorded {
            log_id: records[0].id,
            user_id: 7,
            action: "Viewed /items".to_string(),
            path: "/items".to_string(),
            method: Method::GET,
        }]
    );
}

#[tokio::test]
async fn test_post_is_logged_with_redacted_data() {
    let store = Arc::new(MemoryStore::default());
    let (logger, sink) = logger_with(store.clone(), Arc::new(SessionIdentity));

    let ctx = signed_in(Method::POST, "/users", 1).with_fields(fields(json!({
        "name": "Alice",
        "email": "a@x.io",
        "password": "s3cret"
    })));

    logger.intercept(&ctx, (), |_| async {}).await;

    let records = store.records();
    assert_eq!(records[0].action, r#"Created new /users with data: {"name":"Alice","email":"a@x.io"}"#);
    assert!(!records[0].action.contains("s3cret"));

    // diagnostic output carries only the base phrase
    match &sink.events()[0] {
        SinkEvent::Recorded { action, .. } => assert_eq!(action, "Created new /users"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_without_fields() {
    let store = Arc::new(MemoryStore::default());
    let (logger, _sink) = logger_with(store.clone(), Arc::new(SessionIdentity));

    logger
        .intercept(&signed_in(Method::DELETE, "/claims/5", 3), (), |_| async {})
        .await;

    assert_eq!(store.records()[0].action, "Deleted /claims/5");
}

#[tokio::test]
async fn test_anonymous_request_is_forwarded_unlogged() {
    let store = Arc::new(MemoryStore::default());
    let (logger, sink) = logger_with(store.clone(), Arc::new(SessionIdentity));
    let calls = AtomicUsize::new(0);

    let ctx = RequestContext::new(Method::POST, "/login").with_fields(fields(json!({"email": "a@x.io"})));
    let status = logger
        .intercept(&ctx, (), |_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            204
        })
        .await;

    assert_eq!(status, 204);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(store.records().is_empty());
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn test_tooling_paths_are_skipped() {
    let store = Arc::new(MemoryStore::default());
    let (logger, sink) = logger_with(store.clone(), Arc::new(SessionIdentity));

    for path in ["/_debugbar/open", "/livewire/update", "/sanctum/csrf-cookie", "livewire"] {
        logger.intercept(&signed_in(Method::POST, path, 1), (), |_| async {}).await;
    }

    assert!(store.records().is_empty());
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn test_skip_matching_is_case_sensitive_prefix() {
    let store = Arc::new(MemoryStore::default());
    let (logger, _sink) = logger_with(store.clone(), Arc::new(SessionIdentity));

    for path in ["/Livewire/update", "/api/livewire", "/sanctumx"] {
        logger.intercept(&signed_in(Method::GET, path, 1), (), |_| async {}).await;
    }

    // "/sanctumx" still starts with "sanctum" once the slash is dropped
    let actions: Vec<String> = store.records().into_iter().map(|r| r.action).collect();
    assert_eq!(actions, ["Viewed /Livewire/update", "Viewed /api/livewire"]);
}

#[tokio::test]
async fn test_custom_skip_prefixes() {
    let store = Arc::new(MemoryStore::default());
    let (logger, _sink) = logger_with(store.clone(), Arc::new(SessionIdentity));
    let logger = logger.with_skip_prefixes(["/health", "metrics"]);

    assert!(logger.is_skipped("/health"));
    assert!(logger.is_skipped("/metrics/prometheus"));
    assert!(!logger.is_skipped("/livewire/update"));
    assert_eq!(logger.skip_prefixes(), ["/health".to_string(), "metrics".to_string()]);
}

#[tokio::test]
async fn test_store_failure_still_forwards() {
    let store = Arc::new(MemoryStore::failing());
    let (logger, sink) = logger_with(store, Arc::new(SessionIdentity));

    let response = logger
        .intercept(&signed_in(Method::PUT, "/items/4", 8), "req", |_| async { "ok" })
        .await;

    assert_eq!(response, "ok");
    match &sink.events()[..] {
        [SinkEvent::Failed { error, user_id, path, method }] => {
            assert!(error.contains("pool timed out"), "{error}");
            assert_eq!(*user_id, Some(8));
            assert_eq!(path, "/items/4");
            assert_eq!(*method, Method::PUT);
        },
        other => panic!("unexpected events: {other:?}"),
    }
}

#[tokio::test]
async fn test_authenticated_without_id_is_reported() {
    let store = Arc::new(MemoryStore::default());
    let (logger, sink) = logger_with(store.clone(), Arc::new(ScriptedIdentity::AuthenticatedWithoutId));

    let forwarded = logger
        .intercept(&RequestContext::new(Method::GET, "/items"), 1, |n| async move { n + 1 })
        .await;

    assert_eq!(forwarded, 2);
    assert!(store.records().is_empty());
    assert_eq!(
        sink.events(),
        vec![SinkEvent::Failed {
            error: "Authenticated session carries no user id".to_string(),
            user_id: None,
            path: "/items".to_string(),
            method: Method::GET,
        }]
    );
}

#[tokio::test]
async fn test_identity_failure_is_reported() {
    let store = Arc::new(MemoryStore::default());
    let (logger, sink) = logger_with(store.clone(), Arc::new(ScriptedIdentity::Broken));

    let forwarded = logger
        .intercept(&RequestContext::new(Method::GET, "/items"), (), |_| async { true })
        .await;

    assert!(forwarded);
    assert!(store.records().is_empty());
    assert!(matches!(&sink.events()[..], [SinkEvent::Failed { user_id: None, .. }]));
}

#[tokio::test]
async fn test_replayed_request_gets_distinct_records() {
    let store = Arc::new(MemoryStore::default());
    let (logger, _sink) = logger_with(store.clone(), Arc::new(SessionIdentity));
    let ctx = signed_in(Method::POST, "/claims", 2).with_fields(fields(json!({"found_item_id": 5})));

    let first = logger.record(&ctx).await.unwrap().unwrap();
    let second = logger.record(&ctx).await.unwrap().unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.action, second.action);
    assert_eq!(store.records().len(), 2);
}

#[tokio::test]
async fn test_other_methods_use_method_name() {
    let store = Arc::new(MemoryStore::default());
    let (logger, _sink) = logger_with(store.clone(), Arc::new(SessionIdentity));

    logger.intercept(&signed_in(Method::OPTIONS, "/items", 1), (), |_| async {}).await;

    assert_eq!(store.records()[0].action, "OPTIONS /items");
}

#[test]
fn test_wants_request_data() {
    let (logger, _sink) = logger_with(Arc::new(MemoryStore::default()), Arc::new(SessionIdentity));

    assert!(logger.wants_request_data(&signed_in(Method::POST, "/items", 1)));
    assert!(!logger.wants_request_data(&signed_in(Method::GET, "/items", 1)));
    assert!(!logger.wants_request_data(&signed_in(Method::POST, "/livewire/update", 1)));
    assert!(!logger.wants_request_data(&RequestContext::new(Method::POST, "/items")));
}
