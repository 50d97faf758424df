//! API integration tests for the Lost & Found server
//!
//! These drive the production router end to end: session header, activity
//! logging, handlers and the database.
//!
//! Run with: `cargo test --test api_tests -- --ignored`

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

mod helpers;

use helpers::{activity_actions, get, insert_user, post_form, post_json, test_app};

// ============================================================================
// Health
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_health_check(pool: PgPool) {
    let app = test_app(pool);

    let (status, body) = get(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_unknown_route_returns_json_404(pool: PgPool) {
    let app = test_app(pool);

    let (status, body) = get(&app, "/api/v1/nothing-here", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// ============================================================================
// Activity logging through the full stack
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_anonymous_requests_are_not_logged(pool: PgPool) {
    let app = test_app(pool.clone());

    let (status, _) = get(&app, "/api/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);

    assert!(activity_actions(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_authenticated_view_is_logged_with_client_details(pool: PgPool) {
    let admin = insert_user(&pool, "Admin", "admin@example.com", "admin").await;
    let app = test_app(pool.clone());

    let (status, _) = get(&app, "/api/v1/admin/dashboard?tab=users", Some(admin)).await;
    assert_eq!(status, StatusCode::OK);

    let row: (Option<i64>, String, Option<String>, Option<String>) = sqlx::query_as(
        "SELECT user_id, action, ip_address, user_agent FROM activity_log",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(row.0, Some(admin));
    assert_eq!(row.1, "Viewed /api/v1/admin/dashboard");
    assert_eq!(row.2.as_deref(), Some("203.0.113.7"));
    assert_eq!(row.3.as_deref(), Some("integration-test"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_skipped_prefixes_are_not_logged(pool: PgPool) {
    let admin = insert_user(&pool, "Admin", "admin@example.com", "admin").await;
    let app = test_app(pool.clone());

    let (status, _) = get(&app, "/sanctum/csrf-cookie", Some(admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/livewire/update", Some(admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(activity_actions(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_invalid_session_header_is_anonymous(pool: PgPool) {
    let app = test_app(pool.clone());

    let (status, _) = get(&app, "/api/v1/admin/me", Some(-4)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(activity_actions(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_form_body_is_logged_even_when_handler_rejects_it(pool: PgPool) {
    let admin = insert_user(&pool, "Admin", "admin@example.com", "admin").await;
    let app = test_app(pool.clone());

    let (status, _) = post_form(
        &app,
        "/api/v1/admin/users",
        Some(admin),
        "name=Bob&password=secret123&_token=abc",
    )
    .await;

    // The handler only accepts JSON
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        activity_actions(&pool).await,
        vec![r#"Created new /api/v1/admin/users with data: {"name":"Bob"}"#.to_string()]
    );
}

// ============================================================================
// Create user
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_create_user_success(pool: PgPool) {
    let admin = insert_user(&pool, "Admin", "admin@example.com", "admin").await;
    let app = test_app(pool.clone());

    let (status, body) = post_json(
        &app,
        "/api/v1/admin/users",
        Some(admin),
        &json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "correct horse",
            "role": "user"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password").is_none());

    let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE email = $1")
        .bind("alice@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(bcrypt::verify("correct horse", &stored).unwrap());

    assert_eq!(
        activity_actions(&pool).await,
        vec![
            r#"Created new /api/v1/admin/users with data: {"name":"Alice","email":"alice@example.com","role":"user"}"#
                .to_string()
        ]
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_create_user_validation_error(pool: PgPool) {
    let admin = insert_user(&pool, "Admin", "admin@example.com", "admin").await;
    let app = test_app(pool.clone());

    let (status, body) = post_json(
        &app,
        "/api/v1/admin/users",
        Some(admin),
        &json!({ "email": "bob@example.com", "password": "long enough", "role": "user" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"]["field"], "name");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_create_user_duplicate_email(pool: PgPool) {
    let admin = insert_user(&pool, "Admin", "admin@example.com", "admin").await;
    let app = test_app(pool.clone());

    let (status, body) = post_json(
        &app,
        "/api/v1/admin/users",
        Some(admin),
        &json!({
            "name": "Other Admin",
            "email": "admin@example.com",
            "password": "long enough",
            "role": "admin"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["field"], "email");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_create_user_requires_session(pool: PgPool) {
    let app = test_app(pool.clone());

    let (status, body) = post_json(
        &app,
        "/api/v1/admin/users",
        None,
        &json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "correct horse",
            "role": "user"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized. You must be logged in to create a user.");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ============================================================================
// Activity log listing
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_users_log_lists_newest_first(pool: PgPool) {
    let admin = insert_user(&pool, "Admin", "admin@example.com", "admin").await;
    let app = test_app(pool.clone());

    get(&app, "/api/v1/admin/users", Some(admin)).await;
    let (status, body) = get(&app, "/api/v1/admin/users-log", Some(admin)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let entries = body["activityLog"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // The listing request itself is logged before the handler runs
    assert_eq!(entries[0]["action"], "Viewed /api/v1/admin/users-log");
    assert_eq!(entries[1]["action"], "Viewed /api/v1/admin/users");
    assert_eq!(entries[0]["user"]["id"], admin);
    assert_eq!(entries[0]["user"]["name"], "Admin");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_users_log_filters_by_user(pool: PgPool) {
    let admin = insert_user(&pool, "Admin", "admin@example.com", "admin").await;
    let clerk = insert_user(&pool, "Clerk", "clerk@example.com", "user").await;
    let app = test_app(pool.clone());

    get(&app, "/api/v1/admin/reported-items", Some(clerk)).await;
    let uri = format!("/api/v1/admin/users-log?user_id={clerk}&limit=10");
    let (status, body) = get(&app, &uri, Some(admin)).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body["activityLog"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["user"]["name"], "Clerk");
    assert_eq!(entries[0]["action"], "Viewed /api/v1/admin/reported-items");
}

// ============================================================================
// Dashboard and current user
// ============================================================================

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_dashboard_counts(pool: PgPool) {
    let owner = insert_user(&pool, "Owner", "owner@example.com", "user").await;
    sqlx::query("INSERT INTO lost_items (user_id, item_name, description) VALUES ($1, 'Umbrella', 'Black')")
        .bind(owner)
        .execute(&pool)
        .await
        .unwrap();
    let app = test_app(pool);

    let (status, body) = get(&app, "/api/v1/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 1);
    assert_eq!(body["lostItems"], 1);
    assert_eq!(body["foundItems"], 0);
    assert_eq!(body["claims"], 0);
    assert_eq!(body["recentLostItems"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_current_user(pool: PgPool) {
    let admin = insert_user(&pool, "Admin", "admin@example.com", "admin").await;
    let app = test_app(pool);

    let (status, body) = get(&app, "/api/v1/admin/me", Some(admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], admin);

    let (status, body) = get(&app, "/api/v1/admin/me", Some(admin + 1000)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
