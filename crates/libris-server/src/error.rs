//! API error responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use libris_auth::AuthError;
use libris_core::error::LibrisError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::FieldViolation;

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("request validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("missing bearer token")]
    MissingBearer,

    #[error("{entity} already exists")]
    Conflict { entity: String },

    #[error("internal error: {0}")]
    Internal(String),
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<LibrisError> for ApiError {
    fn from(err: LibrisError) -> Self {
        match err {
            LibrisError::AlreadyExists { entity } => ApiError::Conflict { entity },
            LibrisError::Validation { message } => ApiError::MalformedBody(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(err) => match err {
                AuthError::PrincipalNotFound | AuthError::NoSessionFound => StatusCode::NOT_FOUND,
                AuthError::InvalidCredentials
                | AuthError::InvalidOrExpiredToken(_)
                | AuthError::TokenReuseDetected => StatusCode::UNAUTHORIZED,
                AuthError::OperationCanceled => StatusCode::SERVICE_UNAVAILABLE,
                AuthError::PersistenceUnavailable(_)
                | AuthError::Crypto(_)
                | AuthError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Validation(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingBearer => StatusCode::UNAUTHORIZED,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Server-side failures are not detailed.
    fn public_message(&self) -> String {
        match self {
            ApiError::Auth(AuthError::InvalidOrExpiredToken(_)) => {
                "invalid or expired token".to_string()
            }
            ApiError::Auth(
                AuthError::PersistenceUnavailable(_) | AuthError::Crypto(_) | AuthError::Config(_),
            )
            | ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            error!(error = %self, "Request failed");
        }

        let body = match self {
            ApiError::Validation(violations) => json!({ "errors": violations }),
            other => json!({ "error": other.public_message() }),
        };

        (status, Json(body)).into_response()
    }
}
