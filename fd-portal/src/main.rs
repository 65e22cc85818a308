use dotenvy::dotenv;
use fd_portal::config::get_configuration;
use fd_portal::startup::build_router;
use fd_portal::AppState;
use service_core::observability::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "fd-portal",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    );

    let state = AppState::from_settings(&configuration).map_err(|e| {
        tracing::error!("Failed to build application state: {:#}", e);
        e
    })?;

    match state.session.init() {
        Ok(Some(session)) => info!(user_type = ?session.user_type(), "Resumed previous session"),
        Ok(None) => info!("Starting without a session"),
        Err(e) => tracing::error!(error = %e, "Failed to read persisted session storage"),
    }

    let session = state.session.clone();
    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting fd-portal on {}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            anyhow::anyhow!("Server error: {}", e)
        })?;

    session.teardown();
    info!("fd-portal stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
