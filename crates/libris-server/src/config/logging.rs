//! Logging Config

use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    Json,
    Pretty,
}

/// Logging output settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingArgs {
    /// Log filter used when `RUST_LOG` is unset
    #[arg(short, long, default_value = "libris=info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}
