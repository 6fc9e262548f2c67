//! Authentication service: login, refresh-token rotation and logout.
//!
//! Every user has at most one refresh session. Login creates it, each
//! successful refresh replaces it, and logout deletes it. A refresh token
//! is only accepted while its `jti` is the one stored in the session, so a
//! token that has already been rotated away is rejected as a replay even
//! though its signature and expiry are still valid.
//!
//! Two refreshes racing for the same user can both pass the replay check.
//! The session store serialises their upserts and the last one to commit
//! wins; the other caller's new refresh token is rejected as a replay on its
//! next use.
//!
//! Cancellation aborts lookups, but never a session write that has already
//! started: once a pair is minted and its upsert begins, the caller gets
//! the pair it stored.

use libris_core::error::LibrisError;
use libris_core::models::refresh_session::UpsertRefreshSession;
use libris_core::password::Passwords;
use libris_core::repository::{RefreshSessionRepository, UserRepository};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::token::{Principal, TokenClaims, TokenCodec, TokenKind};

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Input for the refresh token rotation flow.
#[derive(Debug)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// A freshly minted token pair.
#[derive(Debug)]
pub struct AuthTokens {
    /// Signed JWT access token.
    pub access_token: String,
    /// Signed JWT refresh token, tracked by the user's refresh session.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    /// Claims of the access token.
    pub claims: TokenClaims,
}

/// Race a read against cancellation of the caller's request.
///
/// An already cancelled token short-circuits before `fut` is polled. A
/// result that is ready on the same poll as the cancellation is kept.
async fn guard<T>(cancel: &CancellationToken, fut: impl Future<Output = T>) -> AuthResult<T> {
    if cancel.is_cancelled() {
        return Err(AuthError::OperationCanceled);
    }
    tokio::select! {
        biased;
        out = fut => Ok(out),
        () = cancel.cancelled() => Err(AuthError::OperationCanceled),
    }
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, S: RefreshSessionRepository> {
    user_repo: U,
    session_repo: S,
    codec: TokenCodec,
    passwords: Passwords,
    config: AuthConfig,
}

impl<U: UserRepository, S: RefreshSessionRepository> AuthService<U, S> {
    /// Fails on invalid signing configuration.
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> AuthResult<Self> {
        let codec = TokenCodec::new(&config)?;
        let passwords = Passwords::new(config.pepper.clone());
        Ok(Self {
            user_repo,
            session_repo,
            codec,
            passwords,
            config,
        })
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authenticate a user by email and password and start a new refresh
    /// session, replacing any previous one.
    pub async fn login(
        &self,
        input: LoginInput,
        cancel: &CancellationToken,
    ) -> AuthResult<AuthTokens> {
        // 1. Resolve the principal.
        let user = match guard(cancel, self.user_repo.get_by_email(&input.email)).await? {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                warn!("Login attempt for unknown email");
                return Err(AuthError::PrincipalNotFound);
            }
            Err(e) => return Err(AuthError::PersistenceUnavailable(e)),
        };

        // 2. Verify password.
        let valid = self
            .passwords
            .verify(&input.password, &user.password_hash)
            .map_err(|e| match e {
                LibrisError::Crypto(message) => AuthError::Crypto(message),
                other => AuthError::Crypto(other.to_string()),
            })?;
        if !valid {
            warn!(user_id = %user.id, "Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        // 3-4. Mint the pair and persist the session.
        let tokens = self.start_session(&Principal::from(&user), cancel).await?;

        info!(user_id = %user.id, "Login succeeded");
        Ok(tokens)
    }

    /// Exchange the current refresh token for a new token pair.
    pub async fn refresh(
        &self,
        input: RefreshInput,
        cancel: &CancellationToken,
    ) -> AuthResult<AuthTokens> {
        // 1. Signature, expiry and kind.
        let claims = self
            .codec
            .verify(&input.refresh_token, TokenKind::Refresh)
            .inspect_err(|e| warn!(error = %e, "Refresh rejected: bad token"))?;

        // 2. Current session.
        let session = match guard(cancel, self.session_repo.get_by_user(claims.user_id)).await? {
            Ok(session) => session,
            Err(e) if e.is_not_found() => {
                warn!(user_id = %claims.user_id, "Refresh rejected: no session");
                return Err(AuthError::NoSessionFound);
            }
            Err(e) => return Err(AuthError::PersistenceUnavailable(e)),
        };

        // 3. Replay check.
        if session.jti != claims.jti {
            warn!(
                user_id = %claims.user_id,
                presented_jti = %claims.jti,
                "Refresh token reuse detected"
            );
            return Err(AuthError::TokenReuseDetected);
        }

        // 4-5. Rotate.
        let tokens = self.start_session(&claims.principal(), cancel).await?;

        info!(user_id = %claims.user_id, "Refresh token rotated");
        Ok(tokens)
    }

    /// Verify an access token and return its claims.
    pub fn authenticate(&self, access_token: &str) -> AuthResult<TokenClaims> {
        Ok(self.codec.verify(access_token, TokenKind::Access)?)
    }

    /// End the user's refresh session. Any refresh token issued so far
    /// fails with [`AuthError::NoSessionFound`] afterwards.
    pub async fn logout(&self, user_id: Uuid, cancel: &CancellationToken) -> AuthResult<()> {
        guard(cancel, self.session_repo.delete_by_user(user_id))
            .await?
            .map_err(AuthError::PersistenceUnavailable)?;

        info!(user_id = %user_id, "Logged out");
        Ok(())
    }

    async fn start_session(
        &self,
        principal: &Principal,
        cancel: &CancellationToken,
    ) -> AuthResult<AuthTokens> {
        if cancel.is_cancelled() {
            return Err(AuthError::OperationCanceled);
        }

        let pair = self.codec.issue_pair(principal)?;

        // Not raced against `cancel`: a started write always reports its outcome.
        self.session_repo
            .upsert(UpsertRefreshSession {
                user_id: principal.user_id,
                jti: pair.refresh.claims.jti,
                expires_at: pair.refresh.expires_at,
            })
            .await
            .map_err(|e: LibrisError| {
                error!(
                    user_id = %principal.user_id,
                    error = %e,
                    "Failed to persist refresh session for minted tokens"
                );
                AuthError::PersistenceUnavailable(e)
            })?;

        Ok(AuthTokens {
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
            expires_in: self.config.access_token_lifetime_secs,
            claims: pair.access.claims,
        })
    }
}
