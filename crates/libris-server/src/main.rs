//! Libris API Server

use std::{future, process};

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use libris_db::DbManager;

use crate::{
    config::{ServerConfig, logging::LogFormat},
    state::AppState,
};

mod config;
mod error;
mod routes;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod validation;

/// Libris API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env, environment and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| e.exit());

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level));
    match config.logging.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).pretty().init(),
    }

    info!("Starting Libris server...");

    let db = match DbManager::connect(&config.database.to_db_config()).await {
        Ok(db) => db,
        Err(init_error) => {
            error!("failed to initialize database: {init_error}");

            process::exit(1);
        }
    };

    let shutdown_token = CancellationToken::new();

    let state = match AppState::new(
        db.client().clone(),
        config.auth.to_auth_config(),
        shutdown_token.clone(),
    ) {
        Ok(state) => state,
        Err(init_error) => {
            error!("invalid auth configuration: {init_error}");

            process::exit(1);
        }
    };

    let addr = config.socket_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(bind_error) => {
            error!("failed to bind {addr}: {bind_error}");

            process::exit(1);
        }
    };

    info!("Listening on {addr}");

    let serve = axum::serve(listener, routes::router(state)).with_graceful_shutdown(async move {
        if let Err(error) = shutdown::listen(shutdown_token).await {
            error!("failed to listen for shutdown signal: {error}");
            future::pending::<()>().await;
        }
    });

    if let Err(serve_error) = serve.await {
        error!("server error: {serve_error}");

        process::exit(1);
    }

    info!("Libris server stopped.");
}
