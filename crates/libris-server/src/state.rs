//! State

use std::sync::Arc;

use libris_auth::{AuthConfig, AuthResult, AuthService};
use libris_db::repository::{SurrealRefreshSessionRepository, SurrealUserRepository};
use surrealdb::{Surreal, engine::any::Any};
use tokio_util::sync::CancellationToken;

pub(crate) type UserStore = SurrealUserRepository<Any>;
pub(crate) type SessionStore = SurrealRefreshSessionRepository<Any>;
pub(crate) type Auth = AuthService<UserStore, SessionStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth: Arc<Auth>,
    pub(crate) users: Arc<UserStore>,
    /// Root token, cancelled on shutdown. Requests derive child tokens.
    pub(crate) shutdown: CancellationToken,
}

impl AppState {
    /// Wire the repositories and auth service over one database handle.
    ///
    /// Fails when the signing configuration is unusable.
    pub(crate) fn new(
        db: Surreal<Any>,
        config: AuthConfig,
        shutdown: CancellationToken,
    ) -> AuthResult<Self> {
        let users = match config.pepper.clone() {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
            None => SurrealUserRepository::new(db.clone()),
        };

        let auth = AuthService::new(
            SurrealUserRepository::new(db.clone()),
            SurrealRefreshSessionRepository::new(db),
            config,
        )?;

        Ok(Self {
            auth: Arc::new(auth),
            users: Arc::new(users),
            shutdown,
        })
    }

    /// Token for a single request, cancelled when the server shuts down.
    pub(crate) fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
