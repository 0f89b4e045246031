// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Banking Gateway
//!
//! One-shot calls to the downstream banking REST APIs: account lookup by
//! phone number, card list, transaction history, card limits, limit updates
//! and PIN changes. No caching and no retries; every call is a single
//! request bounded by the configured timeout.

pub mod client;
pub mod contract;
pub mod error;
pub mod types;

use async_trait::async_trait;

use crate::models::PhoneNumber;

pub use client::HttpBankingGateway;
pub use contract::ResponseContract;
pub use error::BankingError;
pub use types::{
    mask_card_number, ActionAck, CardRecord, LimitRecord, LimitUpdate, PageRange, PinChange,
    TransactionRecord,
};

/// Downstream banking operations used by the dashboard views.
#[async_trait]
pub trait BankingGateway: Send + Sync {
    /// Account number registered for a phone number; `None` when the caller
    /// has no account.
    async fn account_number(&self, phone: &PhoneNumber) -> Result<Option<String>, BankingError>;

    async fn list_cards(&self, account: &str) -> Result<Vec<CardRecord>, BankingError>;

    async fn list_transactions(
        &self,
        card_number: &str,
        page: PageRange,
    ) -> Result<Vec<TransactionRecord>, BankingError>;

    async fn list_limits(&self, card_number: &str) -> Result<Vec<LimitRecord>, BankingError>;

    async fn update_limit(&self, update: &LimitUpdate) -> Result<ActionAck, BankingError>;

    async fn change_pin(&self, change: &PinChange) -> Result<ActionAck, BankingError>;

    /// Names of the configuration values this gateway is still missing.
    fn missing_configuration(&self) -> Vec<&'static str> {
        Vec::new()
    }
}
