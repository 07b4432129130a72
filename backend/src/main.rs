//! Backend entry-point: loads configuration, migrates the schema and serves
//! the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use social_events::inbound::http::health::HealthState;
use social_events::outbound::persistence::{DbPool, run_pending_migrations};
use social_events::settings::{AppConfig, Settings};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    if let Err(e) = color_eyre::install() {
        warn!(error = %e, "error report hook already installed");
    }

    let settings = Settings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let config = AppConfig::try_from(settings).map_err(std::io::Error::other)?;

    run_pending_migrations(config.pool().database_url())
        .await
        .map_err(std::io::Error::other)?;
    info!("database schema is current");

    let pool = DbPool::new(config.pool().clone())
        .await
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, ServerConfig::new(&config, pool))?.await
}
