/// Main application entry point
use debris_dashboard::clients::RiskApiClient;
use debris_dashboard::config::AppConfig;
use debris_dashboard::handlers::AppState;
use debris_dashboard::routes::build_router;
use debris_dashboard::services::Dashboard;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debris_dashboard=info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded ({})", config.environment.as_str());

    // Initialize client and dashboard
    let client = Arc::new(RiskApiClient::new(&config)?);
    info!("Remote API at {}", client.base_url());
    let dashboard = Arc::new(Dashboard::new(&config, client));

    // Probe the remote service once; the dashboard starts either way
    let health = dashboard.check_health().await;
    match (&health.data, &health.error) {
        (Some(status), _) => info!("Remote API reachable: {}", status.status),
        (None, Some(err)) => warn!("Remote API not reachable yet: {}", err.message),
        (None, None) => warn!("Remote API health check returned nothing"),
    }

    let state = AppState {
        dashboard: Arc::clone(&dashboard),
    };
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(
        "{} v{} listening on {}",
        config.app_name, config.app_version, config.listen_addr
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    dashboard.abandon_in_flight();
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
