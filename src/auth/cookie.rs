// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie attributes, issuing and reading.

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time::Duration, Cookie, SameSite};

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "user-phone";

/// Lifetime of an issued session cookie (24 hours).
pub const SESSION_MAX_AGE: Duration = Duration::hours(24);

/// Attributes applied to every session cookie this service writes.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    name: String,
    secure: bool,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            name: SESSION_COOKIE_NAME.to_string(),
            secure: true,
        }
    }
}

impl CookiePolicy {
    /// `secure` is false only for local development over plain HTTP.
    pub fn new(secure: bool) -> Self {
        Self {
            secure,
            ..Self::default()
        }
    }

    /// Cookie carrying a freshly sealed identity.
    pub fn issue(&self, sealed: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), sealed))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(SESSION_MAX_AGE)
            .path("/")
            .build()
    }

    /// Cookie that makes the browser drop the session.
    pub fn clear(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), String::new()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(Duration::ZERO)
            .path("/")
            .build()
    }

    /// Value of the session cookie, if the request carries a non-empty one.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|c| c.name() == self.name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Whether the request carries the session cookie at all.
    pub fn is_present(&self, headers: &HeaderMap) -> bool {
        self.read(headers).is_some()
    }

    /// Append `cookie` to the response headers as `Set-Cookie`.
    pub fn append(headers: &mut HeaderMap, cookie: &Cookie<'_>) {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "session cookie is not a valid header value"),
        }
    }
}
