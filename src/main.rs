mod charts;
mod config;
mod error;
mod models;
mod ranking;
mod routes;
mod upstream;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::AppConfig;
use routes::{AppState, build_router};
use upstream::StatsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bid_insight=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    let stats = StatsClient::new(&config.stats_api_url, config.stats_api_timeout)?;
    tracing::info!(
        stats_api = stats.base_url(),
        timeout_secs = config.stats_api_timeout.as_secs(),
        "Stats API client ready"
    );

    let app = build_router(AppState { stats }, config.cors_allow_any);

    // Run the server
    tracing::info!("Server running on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
