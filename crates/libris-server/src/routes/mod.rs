//! HTTP routes

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub(crate) mod auth;
pub(crate) mod healthcheck;
pub(crate) mod users;

/// Build the application router.
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck::handler))
        .route("/users", post(users::register))
        .route("/auth", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .with_state(state)
}
