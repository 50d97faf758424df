//! Shared helpers for the HTTP integration tests

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use lostfound_server::api::{create_router, AppState};
use lostfound_server::config::Config;

pub const CLIENT_ADDR: &str = "203.0.113.7:51234";

/// Router wired exactly as in production, with a cheap bcrypt cost
pub fn test_app(pool: PgPool) -> Router {
    let mut config = Config::default();
    config.security.bcrypt_cost = 4;
    let state = AppState::new(pool, &config);
    create_router(state, &config)
}

pub async fn insert_user(pool: &PgPool, name: &str, email: &str, role: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password, role) VALUES ($1, $2, 'hash', $3) RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn request(method: &str, uri: &str, actor: Option<i64>) -> axum::http::request::Builder {
    let addr: SocketAddr = CLIENT_ADDR.parse().unwrap();
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("user-agent", "integration-test")
        .extension(ConnectInfo(addr));
    if let Some(id) = actor {
        builder = builder.header("x-user-id", id.to_string());
    }
    builder
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str, actor: Option<i64>) -> (StatusCode, Value) {
    send(app, request("GET", uri, actor).body(Body::empty()).unwrap()).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    actor: Option<i64>,
    body: &Value,
) -> (StatusCode, Value) {
    let request = request("POST", uri, actor)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: &Router, uri: &str, actor: Option<i64>, body: &str) -> (StatusCode, Value) {
    let request = request("POST", uri, actor)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn activity_actions(pool: &PgPool) -> Vec<String> {
    sqlx::query_scalar("SELECT action FROM activity_log ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}
