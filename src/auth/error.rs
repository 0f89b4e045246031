// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! These are the "authentication failed" page of the dashboard: every
//! variant renders as 401 with the `x-auth-failed` header, and a corrupt
//! session additionally clears the cookie it came from.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cookie::Cookie;
use serde::Serialize;

use super::cookie::CookiePolicy;
use super::middleware::AUTH_FAILED_HEADER;

const FAILED_TITLE: &str = "Authentication Failed";
const FAILED_MESSAGE: &str =
    "Could not validate your token. Please ensure you have a valid session.";

/// Authentication error type.
#[derive(Debug)]
pub enum AuthError {
    /// Neither a session cookie nor a bearer token was presented
    MissingCredential,
    /// The bearer token was rejected or could not be checked
    InvalidCredential,
    /// The session cookie could not be opened; carries the clearing cookie
    CorruptSession(Cookie<'static>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthErrorBody {
    error: &'static str,
    message: &'static str,
    error_code: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::CorruptSession(_) => "corrupt_session",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredential => write!(f, "No session cookie or bearer token"),
            AuthError::InvalidCredential => write!(f, "Bearer token could not be validated"),
            AuthError::CorruptSession(_) => write!(f, "Session cookie could not be opened"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            error: FAILED_TITLE,
            message: FAILED_MESSAGE,
            error_code: self.error_code(),
        });
        let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
        response
            .headers_mut()
            .insert(AUTH_FAILED_HEADER, HeaderValue::from_static("1"));
        if let AuthError::CorruptSession(clear) = &self {
            CookiePolicy::append(response.headers_mut(), clear);
        }
        response
    }
}
