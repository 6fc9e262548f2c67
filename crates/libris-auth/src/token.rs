//! HS256 JWT issuance and verification for access and refresh tokens.
//!
//! Both token kinds carry the same claims. They differ in lifetime and in
//! the `typ` claim, which verification checks so that an access token can
//! never be presented as a refresh token (or the reverse). Only the `jti`
//! of refresh tokens is tracked server-side.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use libris_core::models::user::User;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// The only signing algorithm the codec issues or accepts.
const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Why a presented token was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("signature mismatch")]
    SignatureMismatch,

    #[error("token has expired")]
    Expired,

    #[error("unexpected signing algorithm")]
    AlgorithmMismatch,

    #[error("unexpected issuer")]
    IssuerMismatch,

    #[error("expected {expected} token, got {found} token")]
    WrongKind { expected: TokenKind, found: TokenKind },
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
            ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// The identity a token pair is minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// JWT claims embedded in every access and refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user ID.
    #[serde(rename = "sub")]
    pub user_id: Uuid,
    /// Display name.
    pub username: String,
    pub email: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID; for refresh tokens, the session identifier.
    pub jti: Uuid,
    /// Token kind.
    pub typ: TokenKind,
}

impl TokenClaims {
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// A freshly signed token together with the claims it encodes.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Signs and verifies tokens with the configured HS256 secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish_non_exhaustive()
    }
}

fn lifetime(secs: u64) -> Result<Duration, AuthError> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AuthError::Config(format!("token lifetime out of range: {secs}s")))
}

impl TokenCodec {
    /// Build a codec from validated configuration.
    ///
    /// Fails with [`AuthError::Config`] on a missing or weak secret; this is
    /// a startup error, never a per-request one.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        config.validate()?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            access_lifetime: lifetime(config.access_token_lifetime_secs)?,
            refresh_lifetime: lifetime(config.refresh_token_lifetime_secs)?,
        })
    }

    pub fn lifetime_of(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_lifetime,
            TokenKind::Refresh => self.refresh_lifetime,
        }
    }

    /// Issue a token of the given kind with a fresh random `jti`.
    pub fn issue(&self, principal: &Principal, kind: TokenKind) -> Result<IssuedToken, AuthError> {
        self.issue_at(principal, kind, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        principal: &Principal,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = now + self.lifetime_of(kind);
        let claims = TokenClaims {
            user_id: principal.user_id,
            username: principal.username.clone(),
            email: principal.email.clone(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            typ: kind,
        };

        let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))?;

        Ok(IssuedToken {
            token,
            claims,
            expires_at,
        })
    }

    /// Issue an access token and a refresh token for the same principal.
    pub fn issue_pair(&self, principal: &Principal) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        Ok(TokenPair {
            access: self.issue_at(principal, TokenKind::Access, now)?,
            refresh: self.issue_at(principal, TokenKind::Refresh, now)?,
        })
    }

    /// Verify signature, algorithm, issuer, expiry and kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, expected, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// A token is valid while `now < exp`; there is no leeway.
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);
        // Expiry is checked below against the caller's clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.typ != expected {
            return Err(TokenError::WrongKind {
                expected,
                found: claims.typ,
            });
        }

        Ok(claims)
    }
}
