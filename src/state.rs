// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{CookiePolicy, SessionCipher, TokenValidator};
use crate::banking::BankingGateway;

/// Shared, read-only application state.
///
/// Everything here is built once at startup; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    pub cipher: Arc<SessionCipher>,
    pub cookies: CookiePolicy,
    pub validator: Arc<dyn TokenValidator>,
    pub banking: Arc<dyn BankingGateway>,
}

impl AppState {
    pub fn new(
        cipher: SessionCipher,
        validator: Arc<dyn TokenValidator>,
        banking: Arc<dyn BankingGateway>,
    ) -> Self {
        Self {
            cipher: Arc::new(cipher),
            cookies: CookiePolicy::default(),
            validator,
            banking,
        }
    }

    pub fn with_cookie_policy(mut self, cookies: CookiePolicy) -> Self {
        self.cookies = cookies;
        self
    }
}
