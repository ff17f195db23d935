use anyhow::Context;
use tracing_subscriber::EnvFilter;

use authserver::config::AppConfig;
use authserver::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    tracing::info!("🔧 Storage backend: {:?}", config.storage);

    let app_state = AppState::from_config(&config)
        .await
        .context("Failed to initialize services")?;
    tracing::info!("✅ Account and OTP services initialized");

    let app = build_router(app_state);
    start_server(app, &config.bind_address()).await
}

async fn start_server(app: axum::Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("🚀 Server starting on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
