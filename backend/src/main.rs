//! Main entry point for the token authentication backend.
//!
//! Loads configuration, opens the user store, wires the token service and
//! the authentication filter together by hand, and serves the router.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::auth::filter::JwtAuthenticationFilter;
use crate::services::user_service::UserIdentityLookup;
use crate::utils::jwt::JwtService;
use anyhow::Context;
use config::Config;
use database::Database;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "backend=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    let db = Database::new(&config).await?;
    let pool = db.pool().clone();

    let jwt_service = Arc::new(JwtService::new(&config.token_settings()));
    let identity_lookup = Arc::new(UserIdentityLookup::new(pool.clone()));
    let filter = JwtAuthenticationFilter::new(jwt_service.clone(), identity_lookup);

    let app = api::app_router(pool, jwt_service, filter);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
