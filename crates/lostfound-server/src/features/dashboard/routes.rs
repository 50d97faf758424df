//! Dashboard API routes
//!
//! - `GET /api/v1/dashboard` - Table counts and the five newest items and claims

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;

use super::queries::{DashboardOverviewError, DashboardOverviewQuery};

pub fn dashboard_routes() -> Router<PgPool> {
    Router::new().route("/", get(dashboard_overview))
}

#[tracing::instrument(skip(pool))]
async fn dashboard_overview(State(pool): State<PgPool>) -> Result<Response, DashboardApiError> {
    let overview = super::queries::overview::handle(pool, DashboardOverviewQuery::default()).await?;
    Ok((StatusCode::OK, Json(overview)).into_response())
}

#[derive(Debug)]
struct DashboardApiError(DashboardOverviewError);

impl From<DashboardOverviewError> for DashboardApiError {
    fn from(err: DashboardOverviewError) -> Self {
        Self(err)
    }
}

impl IntoResponse for DashboardApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Failed to fetch dashboard data");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch dashboard data" })),
        )
            .into_response()
    }
}
