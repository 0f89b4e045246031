// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated session.
//!
//! Use the `Session` extractor in handlers to require an identity:
//!
//! ```rust,ignore
//! async fn my_handler(Session(phone): Session) -> impl IntoResponse {
//!     // phone is the caller's PhoneNumber
//! }
//! ```
//!
//! This is where the session cookie is actually opened; the bridge only
//! checks that it is present.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::middleware::{AuthFailure, BridgedIdentity};
use super::AuthError;
use crate::models::PhoneNumber;
use crate::state::AppState;

/// Extractor for the caller's identity.
///
/// Resolution order:
/// 1. identity the bridge resolved from a bearer token on this request
/// 2. failure signal set by the bridge
/// 3. the session cookie, opened with the service's [`SessionCipher`]
///
/// [`SessionCipher`]: super::SessionCipher
pub struct Session(pub PhoneNumber);

impl FromRequestParts<AppState> for Session {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(BridgedIdentity(phone)) = parts.extensions.get::<BridgedIdentity>() {
            return Ok(Session(phone.clone()));
        }

        if let Some(failure) = parts.extensions.get::<AuthFailure>() {
            return Err(match failure {
                AuthFailure::MissingCredential => AuthError::MissingCredential,
                AuthFailure::InvalidCredential => AuthError::InvalidCredential,
            });
        }

        let Some(value) = state.cookies.read(&parts.headers) else {
            return Err(AuthError::MissingCredential);
        };

        match state.cipher.open(&value) {
            Ok(phone) => Ok(Session(phone)),
            Err(e) => {
                warn!(error = %e, "discarding session cookie that failed to open");
                Err(AuthError::CorruptSession(state.cookies.clear()))
            }
        }
    }
}
