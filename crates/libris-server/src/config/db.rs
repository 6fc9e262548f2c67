//! Database Config

use clap::Args;
use libris_db::DbConfig;

/// Database settings.
#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// SurrealDB endpoint (`mem://`, `ws://host:port`)
    #[arg(long, env = "DATABASE_URL", default_value = "mem://")]
    pub database_url: String,

    /// SurrealDB namespace
    #[arg(long, env = "DATABASE_NAMESPACE", default_value = "libris")]
    pub database_namespace: String,

    /// SurrealDB database name
    #[arg(long, env = "DATABASE_NAME", default_value = "main")]
    pub database_name: String,

    /// Root user for remote engines
    #[arg(long, env = "DATABASE_USER", requires = "database_password")]
    pub database_user: Option<String>,

    /// Root password for remote engines
    #[arg(long, env = "DATABASE_PASSWORD", hide_env_values = true, requires = "database_user")]
    pub database_password: Option<String>,
}

impl DatabaseArgs {
    pub(crate) fn to_db_config(&self) -> DbConfig {
        DbConfig {
            url: self.database_url.clone(),
            namespace: self.database_namespace.clone(),
            database: self.database_name.clone(),
            credentials: self
                .database_user
                .clone()
                .zip(self.database_password.clone()),
        }
    }
}
