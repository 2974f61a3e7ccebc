//! # keymint-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the license service.
//! Binds to a configurable port (default 8080).

use keymint_api::auth::{SecretToken, DEV_SECRET_TOKEN};
use keymint_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let secret_token = match std::env::var("SECRET_TOKEN") {
        Ok(token) => SecretToken::new(token),
        Err(_) => {
            tracing::warn!(
                "SECRET_TOKEN not set — using the development default. \
                 Override it in any real deployment."
            );
            SecretToken::new(DEV_SECRET_TOKEN)
        }
    };

    let config = AppConfig { port, secret_token };

    // Initialize database pool (optional — absent means in-memory only).
    let db_pool = keymint_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let state = AppState::with_config(config, db_pool);

    // Hydrate the in-memory store from the database (if connected).
    state.hydrate_from_db().await.map_err(|e| {
        tracing::error!("Database hydration failed: {e}");
        e
    })?;

    let app = keymint_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("keymint API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
