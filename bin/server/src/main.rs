// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Wallet Ledger Authors

mod migrations;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use walletd_config::Config;
use walletd_http::AppState;
use walletd_ledger::Engine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::from_env()?;
    tracing::info!(app = %config.app_name, host = %config.host, port = config.port, "starting up");

    let pool = PgPoolOptions::new()
        .acquire_timeout(config.db_connect_timeout)
        .connect(&config.database_url)
        .await?;

    migrations::run(&pool).await?;
    tracing::info!("migrations applied");

    let engine = Engine::new(pool, config.system_wallet_id);
    let state = AppState { engine, jwt_settings: config.jwt_settings(), default_asset: config.default_asset.clone() };
    let app = walletd_http::router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// JSON-formatted structured logging, level controlled by `RUST_LOG`
/// (defaults to `info`) — matches the ambient stack's logging convention of
/// a single subscriber initialized once at startup.
fn init_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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

    tracing::info!("shutdown signal received, draining connections");

    // a short grace period so in-flight requests can finish their commit
    tokio::time::sleep(Duration::from_millis(50)).await;
}
