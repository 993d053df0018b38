//! # reqdoc-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from `configs.yml` (or
//! the file named by `REQDOC_CONFIG`) and the environment; see
//! [`reqdoc_api::config`].

use reqdoc_api::config::AppConfig;
use reqdoc_api::state::AppState;
use reqdoc_api::store::Repository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().map_err(|e| {
        tracing::error!("Configuration failed: {e}");
        e
    })?;
    tracing::info!(?config, "configuration loaded");

    // Database is optional; without it the API runs against memory.
    let repository = match config.database_url.as_deref() {
        Some(url) => {
            let pool = reqdoc_api::db::init_pool(url).await.map_err(|e| {
                tracing::error!("Database connection failed: {e}");
                e
            })?;
            reqdoc_api::db::run_migrations(&pool).await.map_err(|e| {
                tracing::error!("Database migration failed: {e}");
                e
            })?;
            Repository::postgres(pool)
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set, running in-memory only mode. \
                 Data will not survive restarts."
            );
            Repository::in_memory()
        }
    };

    let port = config.port;
    let app = reqdoc_api::app(AppState::new(config, repository));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("reqdoc API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
