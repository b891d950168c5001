use ticketgate::bootstrap;
use ticketgate::config::Config;
use ticketgate::infrastructure::http::router::build_router;
use ticketgate::infrastructure::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing and metrics
    let _guard = observability::init(&config)?;
    tracing::info!("Configuration loaded");

    // Build application state
    let state = bootstrap::build_app_state(&config)?;

    // Build router
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
