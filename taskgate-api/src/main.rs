//! # Taskgate API Server
//!
//! Multi-tenant task API: companies own tasks, users act within the
//! companies they belong to, admins act across all of them.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=... cargo run -p taskgate-api
//! ```
//!
//! Without `DATABASE_URL` the server runs on the in-memory store.

use std::sync::Arc;

use taskgate_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskgate_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use taskgate_shared::store::MemoryStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // LOG_FORMAT=json switches to structured output
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskgate_api=debug,taskgate_shared=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(
        "Taskgate API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let bind_address = config.bind_address();

    let state = match config.database.clone() {
        Some(database) => {
            let pool = create_pool(DatabaseConfig {
                url: database.url,
                max_connections: database.max_connections,
                ..Default::default()
            })
            .await?;
            run_migrations(&pool).await?;
            AppState::with_database(pool, config)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store");
            AppState::new(Arc::new(MemoryStore::new()), config)
        }
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
