//! HTTP surface: router assembly and server startup

pub mod response;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

use crate::activity::{ActivityLayer, ActivityLogger, PgActivityStore, SessionIdentity};
use crate::auth::{self, BcryptHasher, PasswordHasher};
use crate::config::Config;
use crate::db;
use crate::features;
use response::{ApiResult, AppError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl AppState {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            hasher: Arc::new(BcryptHasher::new(config.security.bcrypt_cost)),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_router(state: AppState, config: &Config) -> Router {
    let feature_state = features::FeatureState {
        db: state.db.clone(),
        hasher: state.hasher.clone(),
    };

    let logger = ActivityLogger::new(
        Arc::new(PgActivityStore::new(state.db.clone())),
        Arc::new(SessionIdentity),
    )
    .with_skip_prefixes(config.activity.skip_prefixes.iter().cloned());

    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/v1", features::router(feature_state))
        .fallback(not_found)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(ActivityLayer::new(logger).trust_forwarded_for(config.activity.trust_forwarded_for))
        .layer(from_fn(auth::session_layer))
        .layer(crate::middleware::cors_layer(&config.cors))
        .layer(crate::middleware::tracing_layer())
}

/// Bind, serve until a shutdown signal arrives, then drain
pub async fn serve(config: Config, db: PgPool) -> anyhow::Result<()> {
    let state = AppState::new(db, &config);
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> ApiResult<Response> {
    db::health_check(&state.db)
        .await
        .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "database": "connected"
        })),
    )
        .into_response())
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give ongoing requests time to complete
    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
