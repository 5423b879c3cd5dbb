//! Blackbirds Roller - dice roller and shared roll log for a tabletop group
//!
//! The server:
//! - Rolls percentile, additive d10 and exploding d6 dice
//! - Records rolls in PocketBase (or in memory when none is configured)
//! - Announces each recorded roll on a Discord webhook

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blackbirds_roller=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Blackbirds Roller");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!(
        "  Record store: {}",
        config.store_url.as_deref().unwrap_or("in-memory")
    );
    tracing::info!(
        "  Discord webhook: {}",
        if config.discord_webhook_url.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    if let Some(seed) = config.rng_seed {
        tracing::info!("  Dice seeded with {}", seed);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));

    // Initialize application state
    let state = Arc::new(AppState::new(config));
    tracing::info!("Application state initialized");

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
