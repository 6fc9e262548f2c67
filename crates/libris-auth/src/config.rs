//! Authentication configuration.

use crate::error::AuthError;

/// Shortest accepted HS256 signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Configuration for the authentication service.
#[derive(Clone)]
pub struct AuthConfig {
    /// Symmetric HS256 signing secret.
    pub jwt_secret: String,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Access token lifetime in seconds (default: 3600 = 1 hour).
    pub access_token_lifetime_secs: u64,
    /// Refresh token lifetime in seconds (default: 604_800 = 7 days).
    pub refresh_token_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id verification.
    pub pepper: Option<String>,
    /// Minimum password length for registration.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: "libris".into(),
            access_token_lifetime_secs: 3600,
            refresh_token_lifetime_secs: 604_800,
            pepper: None,
            min_password_length: 8,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("access_token_lifetime_secs", &self.access_token_lifetime_secs)
            .field("refresh_token_lifetime_secs", &self.refresh_token_lifetime_secs)
            .field("pepper", &self.pepper.as_ref().map(|_| "<redacted>"))
            .field("min_password_length", &self.min_password_length)
            .finish()
    }
}

impl AuthConfig {
    /// Check the settings that would otherwise only fail at signing time.
    ///
    /// Called once at startup; a failure here is fatal.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AuthError::Config(format!(
                "JWT secret must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }
        if self.jwt_issuer.trim().is_empty() {
            return Err(AuthError::Config("JWT issuer must not be empty".into()));
        }
        if self.access_token_lifetime_secs == 0 || self.refresh_token_lifetime_secs == 0 {
            return Err(AuthError::Config("token lifetimes must be positive".into()));
        }
        if self.access_token_lifetime_secs > self.refresh_token_lifetime_secs {
            return Err(AuthError::Config(
                "access token lifetime must not exceed refresh token lifetime".into(),
            ));
        }
        if i64::try_from(self.refresh_token_lifetime_secs).is_err() {
            return Err(AuthError::Config("refresh token lifetime is too large".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AuthConfig {
        AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".into(),
            ..Default::default()
        }
    }

    #[test]
    fn default_lifetimes() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_lifetime_secs, 3600);
        assert_eq!(config.refresh_token_lifetime_secs, 604_800);
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn short_secret_is_rejected() {
        let config = AuthConfig {
            jwt_secret: "too-short".into(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn access_longer_than_refresh_is_rejected() {
        let config = AuthConfig {
            access_token_lifetime_secs: 10_000,
            refresh_token_lifetime_secs: 100,
            ..valid()
        };
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("0123456789abcdef"));
    }
}
