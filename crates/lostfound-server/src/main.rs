//! Lost & Found Server - Main entry point

use anyhow::Result;
use lostfound_common::logging::{init_logging, LogConfig};
use tracing::info;

use lostfound_server::{api, config::Config, db, ServerError};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with configuration from environment
    let log_config = LogConfig::builder()
        .log_file_prefix("lostfound-server".to_string())
        .filter_directives("lostfound_server=debug,tower_http=debug,sqlx=info".to_string())
        .build();

    // Environment variables take precedence
    let log_config = log_config.merge_env()?;

    init_logging(&log_config)?;

    info!("Starting Lost & Found server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let db_pool = db::create_pool(&config.database).await?;
    info!("Database connection pool established");

    sqlx::migrate!("../../migrations")
        .run(&db_pool)
        .await
        .map_err(ServerError::from)?;

    info!("Database migrations completed");

    api::serve(config, db_pool).await
}
