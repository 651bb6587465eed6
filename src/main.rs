use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qualificadora_api::api::{handlers::AppState, routes};
use qualificadora_api::config::Config;
use qualificadora_api::integrations::lead_source::lead_source_from_config;

/// Main entry point for the application.
///
/// Initializes tracing, loads the configuration and the lead source, then
/// serves the functions through the axum gateway.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qualificadora_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let leads = lead_source_from_config(&config)?;
    tracing::info!("Lead source initialized");

    let app_state = Arc::new(AppState {
        config: config.clone(),
        leads,
    });

    let app = routes::router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
