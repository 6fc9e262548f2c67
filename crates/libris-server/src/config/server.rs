//! Server Config

use clap::Args;

/// Server runtime network settings.
#[derive(Debug, Args)]
pub(crate) struct ServerRuntimeArgs {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "8080")]
    pub port: u16,
}

impl ServerRuntimeArgs {
    pub(crate) fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
