//! Test helpers.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use libris_auth::AuthConfig;
use libris_db::{DbConfig, DbManager};
use serde_json::{Value, json};
use testresult::TestResult;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::{routes, state::AppState};

pub(crate) const TEST_SECRET: &str = "router-test-secret-router-test-secret";
pub(crate) const JOHN_EMAIL: &str = "johndoe@email.com";
pub(crate) const JOHN_PASSWORD: &str = "12345678";

pub(crate) struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub(crate) fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.into(),
        ..AuthConfig::default()
    }
}

/// Router over a fresh in-memory database.
pub(crate) async fn test_app() -> TestResult<TestApp> {
    let db = DbManager::connect(&DbConfig::default()).await?;
    let state = AppState::new(
        db.client().clone(),
        test_auth_config(),
        CancellationToken::new(),
    )?;

    Ok(TestApp {
        router: routes::router(state.clone()),
        state,
    })
}

/// Send one request and decode the JSON body (`Null` when empty).
pub(crate) async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> TestResult<(StatusCode, Value)> {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => request.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

pub(crate) async fn register_john(router: &Router) -> TestResult<(StatusCode, Value)> {
    send(
        router,
        Method::POST,
        "/users",
        None,
        Some(json!({
            "username": "JohnDoe",
            "email": JOHN_EMAIL,
            "password": JOHN_PASSWORD,
            "password_confirmation": JOHN_PASSWORD,
        })),
    )
    .await
}

/// Register John and log in, returning the token response body.
pub(crate) async fn login_john(router: &Router) -> TestResult<Value> {
    register_john(router).await?;
    let (status, body) = send(
        router,
        Method::POST,
        "/auth",
        None,
        Some(json!({ "email": JOHN_EMAIL, "password": JOHN_PASSWORD })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    Ok(body)
}
