//! Campus Portal server: serves the frontend and the `/api` endpoints

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use campus_portal::config::Config;
use campus_portal::database::{seed, DatabaseManager};
use campus_portal::logging::{init_logging, log_startup};
use campus_portal::services::{SystemTimeProvider, TimeProvider};
use campus_portal::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;

    init_logging(&config);
    log_startup();
    config.log_config();

    let db = DatabaseManager::new(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
    db.migrate().await.context("Failed to create the schema")?;

    let clock: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider::new());

    if config.seed_demo_data {
        seed::seed_demo_data(&db, clock.as_ref(), config.tz())
            .await
            .context("Failed to seed demo data")?;
    }

    let addr = config.bind_address();
    let app = create_router(AppState::new(db.clone(), config, clock));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Campus Portal listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    tracing::info!("Campus Portal stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
