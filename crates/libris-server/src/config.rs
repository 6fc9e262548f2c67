//! Server configuration module

use clap::Parser;

use crate::config::{
    auth::AuthArgs, db::DatabaseArgs, logging::LoggingArgs, server::ServerRuntimeArgs,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod logging;
pub(crate) mod server;

/// Libris API server configuration
#[derive(Debug, Parser)]
#[command(name = "libris", about = "Libris API Server", long_about = None)]
pub(crate) struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Database settings.
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Token signing and password settings.
    #[command(flatten)]
    pub auth: AuthArgs,
}

impl ServerConfig {
    /// Load configuration from `.env`, the environment and CLI arguments.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // A missing .env file is fine.
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
