mod config;
mod error;
mod models;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;
use services::orchestrator::Orchestrator;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env()?;
    for provider in &config.providers {
        tracing::info!(
            provider = %provider.id,
            model = %provider.model,
            available = provider.usable_api_key().is_some(),
            "provider configured"
        );
    }

    let app_state = AppState {
        orchestrator: Arc::new(Orchestrator::from_config(&config)),
    };
    let app = routes::router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
