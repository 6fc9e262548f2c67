//! User registration

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use libris_auth::AuthError;
use libris_core::{
    models::user::{CreateUser, User},
    repository::UserRepository,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    validation::validate_registration,
};

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// `POST /users`: create an account. Login is a separate call.
pub(crate) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(req) = payload?;

    let violations = validate_registration(
        &req.username,
        &req.email,
        &req.password,
        &req.password_confirmation,
        state.auth.config().min_password_length,
    );
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let cancel = state.request_token();
    let create = state.users.create(CreateUser {
        username: req.username,
        email: req.email,
        password: req.password,
    });
    let user = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(AuthError::OperationCanceled.into()),
        result = create => result?,
    };

    info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}
