//! Admin API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/admin/dashboard` - Table counts
//! - `GET /api/v1/admin/users` - All users
//! - `POST /api/v1/admin/users` - Create a user (requires a session)
//! - `GET /api/v1/admin/users-log` - Activity log, newest first
//! - `GET /api/v1/admin/reported-items` - Lost and found reports
//! - `GET /api/v1/admin/me` - Id and last login of the signed-in user

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::{
    commands::{CreateUserCommand, CreateUserError},
    queries::{
        ActivityLogError, AdminStatisticsError, AdminStatisticsQuery, GetCurrentUserError,
        GetCurrentUserQuery, ListUsersError, ListUsersQuery, ReportedItemsError,
        ReportedItemsQuery,
    },
};
use crate::activity::ActivityQuery;
use crate::api::response::ErrorResponse;
use crate::auth::CurrentUser;
use crate::features::FeatureState;

pub fn admin_routes() -> Router<FeatureState> {
    Router::new()
        .route("/dashboard", get(admin_statistics))
        .route("/users", get(list_users).post(create_user))
        .route("/users-log", get(activity_log))
        .route("/reported-items", get(reported_items))
        .route("/me", get(current_user))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a user
///
/// - `201 Created` - `{ message, user }`
/// - `401 Unauthorized` - No session (checked after validation)
/// - `422 Unprocessable Entity` - Validation failure or email already taken
/// - `500 Internal Server Error` - Hashing or database failure
#[tracing::instrument(skip(state, actor, command), fields(email = %command.email))]
async fn create_user(
    State(state): State<FeatureState>,
    actor: Option<CurrentUser>,
    Json(command): Json<CreateUserCommand>,
) -> Result<Response, AdminApiError> {
    let actor = actor.map(|CurrentUser(user)| user);
    let response = super::commands::create_user::handle(state.db, state.hasher, actor, command).await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(state))]
async fn admin_statistics(State(state): State<FeatureState>) -> Result<Response, AdminApiError> {
    let stats = super::queries::statistics::handle(state.db, AdminStatisticsQuery::default()).await?;
    Ok(Json(stats).into_response())
}

#[tracing::instrument(skip(state))]
async fn list_users(State(state): State<FeatureState>) -> Result<Response, AdminApiError> {
    let users = super::queries::list_users::handle(state.db, ListUsersQuery::default()).await?;
    Ok(Json(users).into_response())
}

#[tracing::instrument(skip(state))]
async fn activity_log(
    State(state): State<FeatureState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Response, AdminApiError> {
    let log = super::queries::activity_log::handle(state.db, query).await?;
    Ok(Json(log).into_response())
}

#[tracing::instrument(skip(state))]
async fn reported_items(State(state): State<FeatureState>) -> Result<Response, AdminApiError> {
    let items = super::queries::reported_items::handle(state.db, ReportedItemsQuery::default()).await?;
    Ok(Json(items).into_response())
}

#[tracing::instrument(skip(state))]
async fn current_user(
    State(state): State<FeatureState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AdminApiError> {
    let me = super::queries::current_user::handle(state.db, GetCurrentUserQuery { user_id: user.id }).await?;
    Ok(Json(me).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
enum AdminApiError {
    #[error(transparent)]
    CreateUser(#[from] CreateUserError),
    #[error(transparent)]
    Statistics(#[from] AdminStatisticsError),
    #[error(transparent)]
    ListUsers(#[from] ListUsersError),
    #[error(transparent)]
    ActivityLog(#[from] ActivityLogError),
    #[error(transparent)]
    ReportedItems(#[from] ReportedItemsError),
    #[error(transparent)]
    CurrentUser(#[from] GetCurrentUserError),
}

fn internal_error(context: &str, err: &dyn std::fmt::Display) -> Response {
    tracing::error!(error = %err, "{}", context);
    let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> Response {
        match self {
            AdminApiError::CreateUser(CreateUserError::Validation(err)) => {
                let error = ErrorResponse::with_details(
                    "VALIDATION_ERROR",
                    err.to_string(),
                    json!({ "field": err.field() }),
                );
                (StatusCode::UNPROCESSABLE_ENTITY, Json(error)).into_response()
            },
            AdminApiError::CreateUser(err @ CreateUserError::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": err.to_string() }))).into_response()
            },
            AdminApiError::CreateUser(err) => {
                tracing::error!(error = %err, "Failed to create user");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create user. Please try again." })),
                )
                    .into_response()
            },
            AdminApiError::ActivityLog(err) => {
                tracing::error!(error = %err, "Error fetching activity log");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Error fetching activity log",
                        "error": err.to_string(),
                    })),
                )
                    .into_response()
            },
            AdminApiError::CurrentUser(GetCurrentUserError::NotFound(id)) => {
                let error = ErrorResponse::new("NOT_FOUND", format!("User '{}' not found", id));
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            AdminApiError::CurrentUser(err) => internal_error("Failed to fetch current user", &err),
            AdminApiError::Statistics(err) => internal_error("Failed to fetch admin statistics", &err),
            AdminApiError::ListUsers(err) => internal_error("Failed to list users", &err),
            AdminApiError::ReportedItems(err) => internal_error("Failed to fetch reported items", &err),
        }
    }
}
