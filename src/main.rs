mod api;
mod config;
mod db;
mod events;
mod reading_cache;
mod seed;
mod sim;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    api::AppState, config::Config, events::EventsClient, reading_cache::ReadingCache,
    sim::Simulator,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (ignore error if file absent — env vars may be set externally)
    let _ = dotenvy::dotenv();

    // Initialise tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env()?;

    // Connect to DB and run migrations
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database ready");

    // Demo registry and per-kind default thresholds
    if config.seed_demo_devices {
        seed::seed_demo_devices(&pool).await?;
        seed::ensure_default_thresholds(&pool).await?;
    }

    // Shared in-memory cache of latest readings per device
    let cache = ReadingCache::new();

    // Outbound analytics notifications (best effort)
    let events = EventsClient::new(&config);

    // Spawn the reading simulation loop
    let simulator = Arc::new(Simulator::new(pool.clone(), cache.clone(), events.clone()));
    {
        let simulator = simulator.clone();
        let interval = Duration::from_secs(config.poll_interval_secs);
        tokio::spawn(simulator.run(interval));
    }

    // Start HTTP server
    let state = AppState {
        pool,
        cache,
        events,
        simulator,
    };
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
