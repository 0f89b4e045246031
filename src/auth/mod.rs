// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session credential bridge for the card portal.
//!
//! ## Auth Flow
//!
//! 1. The embedding app opens the dashboard with `Authorization: Bearer <token>`
//! 2. The bridge validates the token once against the identity service,
//!    which answers with the caller's phone number
//! 3. The phone number is sealed into the `user-phone` cookie
//! 4. Later requests carry only the cookie; handlers open it through the
//!    `Session` extractor
//!
//! ## Security
//!
//! - No server-side session store; the cookie is the session
//! - Cookie is `HttpOnly`, `SameSite=Strict`, `Secure` outside development
//! - AES-256-GCM with a random nonce per cookie; tampering fails authentication
//! - A cookie that fails to open is cleared, never repaired

pub mod cipher;
pub mod cookie;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod validator;

pub use cipher::{CipherError, SessionCipher};
pub use self::cookie::{CookiePolicy, SESSION_COOKIE_NAME};
pub use error::AuthError;
pub use extractor::Session;
pub use middleware::{session_bridge, AuthFailure, BridgedIdentity, AUTH_FAILED_HEADER};
pub use validator::{HttpTokenValidator, TokenValidator, ValidationError};
