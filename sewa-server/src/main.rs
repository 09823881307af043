//! sewa-server: rental reservation and order settlement service
//!
//! Long-running service that:
//! - Reserves date-ranged product stock and snapshots order prices
//! - Opens payment transactions with the Tripay gateway
//! - Settles orders from signed gateway callbacks, exactly once
//! - Serves order history and shop order management (JWT authenticated)

mod api;
mod auth;
mod config;
mod db;
mod error;
mod orders;
mod settlement;
mod state;
mod tripay;

#[cfg(test)]
mod test_support;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sewa_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting sewa-server (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;
    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("sewa-server HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("sewa-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
