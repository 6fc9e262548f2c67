//! Login, refresh-token rotation, logout and the bearer extractor.

use axum::{
    Json,
    extract::{FromRequestParts, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use libris_auth::{AuthTokens, LoginInput, RefreshInput, TokenClaims};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{validate_login, validate_refresh},
};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer",
            expires_in: tokens.expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MeResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    /// Access token expiry, seconds since the Unix epoch.
    pub expires_at: i64,
}

/// Claims of a verified access token from the `Authorization` header.
pub(crate) struct AuthenticatedUser(pub TokenClaims);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::MissingBearer)?;
        let claims = state.auth.authenticate(token)?;
        Ok(Self(claims))
    }
}

/// `POST /auth`: email and password login.
pub(crate) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = payload?;

    let violations = validate_login(&req.email, &req.password);
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let cancel = state.request_token();
    let tokens = state
        .auth
        .login(
            LoginInput {
                email: req.email,
                password: req.password,
            },
            &cancel,
        )
        .await?;

    Ok(Json(tokens.into()))
}

/// `POST /auth/refresh`: exchange the current refresh token for a new pair.
pub(crate) async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = payload?;

    let violations = validate_refresh(&req.refresh_token);
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let cancel = state.request_token();
    let tokens = state
        .auth
        .refresh(
            RefreshInput {
                refresh_token: req.refresh_token,
            },
            &cancel,
        )
        .await?;

    Ok(Json(tokens.into()))
}

/// `GET /auth/me`
pub(crate) async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: claims.user_id,
        username: claims.username,
        email: claims.email,
        expires_at: claims.exp,
    })
}

/// `POST /auth/logout`: end the caller's refresh session.
pub(crate) async fn logout(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> ApiResult<StatusCode> {
    let cancel = state.request_token();
    state.auth.logout(claims.user_id, &cancel).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use super::*;
    use crate::test_helpers::{
        JOHN_EMAIL, JOHN_PASSWORD, login_john, register_john, send, test_app,
    };

    fn token(body: &Value, field: &str) -> String {
        body[field].as_str().unwrap_or_default().to_string()
    }

    async fn refresh_with(
        router: &axum::Router,
        refresh_token: &str,
    ) -> TestResult<(StatusCode, Value)> {
        send(
            router,
            Method::POST,
            "/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await
    }

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer a.b.c".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("a.b.c"));
    }

    #[tokio::test]
    async fn login_returns_token_pair() -> TestResult {
        let app = test_app().await?;

        let body = login_john(&app.router).await?;

        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 3600);
        assert!(!token(&body, "access_token").is_empty());
        assert!(!token(&body, "refresh_token").is_empty());
        assert_ne!(token(&body, "access_token"), token(&body, "refresh_token"));

        Ok(())
    }

    #[tokio::test]
    async fn login_unknown_email_is_not_found() -> TestResult {
        let app = test_app().await?;

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/auth",
            None,
            Some(json!({ "email": "nobody@email.com", "password": JOHN_PASSWORD })),
        )
        .await?;

        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized() -> TestResult {
        let app = test_app().await?;
        register_john(&app.router).await?;

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/auth",
            None,
            Some(json!({ "email": JOHN_EMAIL, "password": "wrong-password" })),
        )
        .await?;

        assert_eq!(status, StatusCode::UNAUTHORIZED);

        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_malformed_input() -> TestResult {
        let app = test_app().await?;

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/auth",
            None,
            Some(json!({ "email": "johndoe", "password": "" })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "email");
        assert_eq!(body["errors"][1]["field"], "password");

        let (status, _) = send(&app.router, Method::POST, "/auth", None, None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn refresh_rotates_and_rejects_replay() -> TestResult {
        let app = test_app().await?;
        let login = login_john(&app.router).await?;
        let first = token(&login, "refresh_token");

        let (status, rotated) = refresh_with(&app.router, &first).await?;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(token(&rotated, "refresh_token"), first);

        let (status, _) = refresh_with(&app.router, &first).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = refresh_with(&app.router, &token(&rotated, "refresh_token")).await?;
        assert_eq!(status, StatusCode::OK);

        Ok(())
    }

    #[tokio::test]
    async fn refresh_rejects_access_token_and_garbage() -> TestResult {
        let app = test_app().await?;
        let login = login_john(&app.router).await?;

        let (status, _) = refresh_with(&app.router, &token(&login, "access_token")).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = refresh_with(&app.router, "not-a-token").await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = refresh_with(&app.router, "").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn me_returns_claims() -> TestResult {
        let app = test_app().await?;
        let login = login_john(&app.router).await?;

        let (status, body) = send(
            &app.router,
            Method::GET,
            "/auth/me",
            Some(&token(&login, "access_token")),
            None,
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "JohnDoe");
        assert_eq!(body["email"], JOHN_EMAIL);

        Ok(())
    }

    #[tokio::test]
    async fn me_requires_access_token() -> TestResult {
        let app = test_app().await?;
        let login = login_john(&app.router).await?;

        let (status, _) = send(&app.router, Method::GET, "/auth/me", None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app.router,
            Method::GET,
            "/auth/me",
            Some(&token(&login, "refresh_token")),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        Ok(())
    }

    #[tokio::test]
    async fn logout_ends_refresh_session() -> TestResult {
        let app = test_app().await?;
        let login = login_john(&app.router).await?;

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/auth/logout",
            Some(&token(&login, "access_token")),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = refresh_with(&app.router, &token(&login, "refresh_token")).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }

    #[tokio::test]
    async fn shutdown_cancels_auth_operations() -> TestResult {
        let app = test_app().await?;
        register_john(&app.router).await?;
        app.state.shutdown.cancel();

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/auth",
            None,
            Some(json!({ "email": JOHN_EMAIL, "password": JOHN_PASSWORD })),
        )
        .await?;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        Ok(())
    }
}
