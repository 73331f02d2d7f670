//! Process bootstrap: .env + tracing + config, then the axum server.
//!
//! Startup is strict about configuration — a missing API key is fatal
//! before the listener ever binds.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sahayak::api::{extraction_api_router, ApiContext};
use sahayak::config::{self, AppConfig};
use sahayak::pipeline::ondemand::OnDemandClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let app_config = match AppConfig::from_env() {
        Ok(app_config) => app_config,
        Err(err) => {
            tracing::error!("Configuration error: {err}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "{} server starting v{}",
        config::APP_NAME,
        config::APP_VERSION
    );

    let service = Arc::new(OnDemandClient::new(
        &app_config.base_url,
        &app_config.api_key,
    ));
    let app = extraction_api_router(ApiContext::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, "Failed to bind API server: {err}");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "API server started");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("API server error: {err}");
    }

    tracing::info!("API server stopped");
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
