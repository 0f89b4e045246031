// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session credential bridge.
//!
//! Runs in front of every dashboard route and turns the incoming credential
//! into one of two outcomes:
//!
//! ```text
//! HasCookie ──────────────────────────────► pass through (opened later by `Session`)
//! NoCredential ─► no bearer token ────────► Failed
//!              └► ValidatingToken ─► ok ──► Authenticated (cookie issued)
//!                                  └► err ─► Failed
//! ```
//!
//! `Failed` never short-circuits the request. The bridge marks it with the
//! `x-auth-failed` header and an [`AuthFailure`] extension and lets the
//! handler decide what to render.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, info, warn};

use super::cookie::CookiePolicy;
use crate::models::PhoneNumber;
use crate::state::AppState;

/// Header carrying the authentication failure signal.
pub const AUTH_FAILED_HEADER: &str = "x-auth-failed";

/// Why the bridge could not authenticate a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No cookie and no usable `Authorization: Bearer` header
    MissingCredential,
    /// The validation endpoint rejected the token or could not be reached
    InvalidCredential,
}

/// Identity the bridge resolved from a bearer token on this request.
#[derive(Debug, Clone)]
pub struct BridgedIdentity(pub PhoneNumber);

/// Session bridge middleware function.
///
/// Install with `axum::middleware::from_fn_with_state(state, session_bridge)`.
pub async fn session_bridge(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // The failure signal is ours to set; never trust a client-supplied one.
    request.headers_mut().remove(AUTH_FAILED_HEADER);

    if state.cookies.is_present(request.headers()) {
        debug!("session cookie present, skipping token validation");
        return next.run(request).await;
    }

    let Some(token) = bearer_token(request.headers()) else {
        debug!("no session cookie and no bearer token");
        return run_failed(request, next, AuthFailure::MissingCredential).await;
    };

    let phone = match state.validator.validate(&token).await {
        Ok(phone) => phone,
        Err(e) => {
            warn!(error = %e, "bearer token validation failed");
            return run_failed(request, next, AuthFailure::InvalidCredential).await;
        }
    };

    let sealed = match state.cipher.seal(&phone) {
        Ok(sealed) => sealed,
        Err(e) => {
            error!(error = %e, "failed to seal session cookie");
            return run_failed(request, next, AuthFailure::InvalidCredential).await;
        }
    };

    info!(phone = %phone.redacted(), "session established from bearer token");
    let cookie = state.cookies.issue(sealed);
    request.extensions_mut().insert(BridgedIdentity(phone));

    let mut response = next.run(request).await;
    CookiePolicy::append(response.headers_mut(), &cookie);
    response
}

async fn run_failed(mut request: Request, next: Next, failure: AuthFailure) -> Response {
    request
        .headers_mut()
        .insert(AUTH_FAILED_HEADER, HeaderValue::from_static("1"));
    request.extensions_mut().insert(failure);

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(AUTH_FAILED_HEADER, HeaderValue::from_static("1"));
    response
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;
    use crate::state::test_support::{test_state, CountingValidator};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn whoami(Session(phone): Session) -> String {
        phone.to_string()
    }

    fn app(validator: Arc<CountingValidator>) -> (Router, AppState) {
        let state = test_state(validator);
        let router = Router::new()
            .route("/whoami", get(whoami))
            .route_layer(from_fn_with_state(state.clone(), session_bridge))
            .with_state(state.clone());
        (router, state)
    }

    fn set_cookie_value(response: &Response) -> Option<String> {
        let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
        let cookie = cookie::Cookie::parse(raw.to_string()).ok()?;
        Some(cookie.value().to_string())
    }

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn accepted_token_issues_cookie_for_resolved_phone() {
        let validator = Arc::new(CountingValidator::accepting("0911111111"));
        let (app, state) = app(validator.clone());

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(validator.calls(), 1);
        assert!(response.headers().get(AUTH_FAILED_HEADER).is_none());

        let sealed = set_cookie_value(&response).expect("session cookie issued");
        assert_eq!(state.cipher.open(&sealed).unwrap().as_str(), "0911111111");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"0911111111");
    }

    #[tokio::test]
    async fn cookie_present_skips_validation() {
        let validator = Arc::new(CountingValidator::accepting("0911111111"));
        let (app, state) = app(validator.clone());
        let sealed = state
            .cipher
            .seal(&PhoneNumber::parse("0922222222").unwrap())
            .unwrap();

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(header::COOKIE, format!("user-phone={sealed}"))
                    .header(AUTHORIZATION, "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(validator.calls(), 0);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"0922222222");
    }

    #[tokio::test]
    async fn no_credential_marks_failure_without_outbound_call() {
        let validator = Arc::new(CountingValidator::accepting("0911111111"));
        let (app, _) = app(validator.clone());

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(validator.calls(), 0);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[AUTH_FAILED_HEADER], "1");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn rejected_token_marks_failure() {
        let validator = Arc::new(CountingValidator::rejecting());
        let (app, _) = app(validator.clone());

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, "Bearer expired")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(validator.calls(), 1);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[AUTH_FAILED_HEADER], "1");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["errorCode"], "invalid_credential");
    }

    #[tokio::test]
    async fn corrupt_cookie_is_cleared_and_not_revalidated() {
        let validator = Arc::new(CountingValidator::accepting("0911111111"));
        let (app, _) = app(validator.clone());

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(header::COOKIE, "user-phone=tampered-value")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(validator.calls(), 0);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(set_cookie_value(&response).as_deref(), Some(""));
    }

    #[tokio::test]
    async fn client_supplied_failure_header_is_ignored() {
        let validator = Arc::new(CountingValidator::accepting("0911111111"));
        let (app, _) = app(validator.clone());

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, "Bearer good-token")
                    .header(AUTH_FAILED_HEADER, "1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(AUTH_FAILED_HEADER).is_none());
    }
}
