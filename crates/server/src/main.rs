use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tvsearch_catalog::TvMazeClient;
use tvsearch_server::config::ServerConfig;
use tvsearch_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env();
    info!(
        upstream = %config.catalog.base_url,
        timeout_secs = config.catalog.timeout.as_secs(),
        "configuring catalog client"
    );

    let catalog = TvMazeClient::new(config.catalog).context("failed to build catalog client")?;
    let app = tvsearch_server::routes::build_router(AppState::new(catalog));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %config.bind_addr, "server listening");
    info!("health check: GET /api/health");
    info!("search shows: GET /api/search/shows?q=banana");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
