//! Auth Config

use clap::Args;
use libris_auth::AuthConfig;

/// Token signing and password settings.
#[derive(Debug, Args)]
pub(crate) struct AuthArgs {
    /// HS256 signing secret (at least 32 bytes)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Issuer written to and required in every token
    #[arg(long, env = "JWT_ISSUER", default_value = "libris")]
    pub jwt_issuer: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "ACCESS_TOKEN_LIFETIME_SECS", default_value_t = 3600)]
    pub access_token_lifetime_secs: u64,

    /// Refresh token lifetime in seconds
    #[arg(long, env = "REFRESH_TOKEN_LIFETIME_SECS", default_value_t = 604_800)]
    pub refresh_token_lifetime_secs: u64,

    /// Pepper prepended to passwords before hashing
    #[arg(long, env = "PASSWORD_PEPPER", hide_env_values = true)]
    pub password_pepper: Option<String>,

    /// Minimum password length accepted at registration
    #[arg(long, env = "MIN_PASSWORD_LENGTH", default_value_t = 8)]
    pub min_password_length: usize,
}

impl AuthArgs {
    pub(crate) fn to_auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            jwt_issuer: self.jwt_issuer.clone(),
            access_token_lifetime_secs: self.access_token_lifetime_secs,
            refresh_token_lifetime_secs: self.refresh_token_lifetime_secs,
            pepper: self.password_pepper.clone(),
            min_password_length: self.min_password_length,
        }
    }
}
