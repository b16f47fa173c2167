//! LinCheng Store dashboard backend
//!
//! Serves the order dashboard API: linked customer/shop order tabs,
//! inventory, the customer directory, statistics and image uploads,
//! behind a single account login.

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod pricing;
mod services;
mod state;

#[cfg(test)]
mod test;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads .env too, so it has to run before the log filter is built
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lincheng_dashboard=info,tower_http=info".into()),
        )
        .init();

    let pool = db::init_db_pool(&config.database_url, config.max_pool_size).await?;
    tracing::info!(database_url = %config.database_url, "database ready");

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let state = AppState::new(pool, &config);
    let app = handlers::router(state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("dashboard listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
