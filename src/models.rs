// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and view-model types returned by the dashboard API. View-model
//! fields serialize in camelCase, matching the field names the dashboard UI
//! consumes.
//!
//! ## Model Categories
//!
//! - **Identity**: [`PhoneNumber`], the identity carried by the session cookie
//! - **Cards**: [`CardDetails`], [`CardListView`]
//! - **Transactions**: [`TransactionView`], [`TransactionHistoryView`]
//! - **Limits**: [`Limit`], [`LimitEntry`], [`LimitSummaryRow`], [`LimitsView`]
//! - **Actions**: [`ChangePinRequest`], [`UpdateLimitRequest`], [`ActionOutcome`]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Identity
// =============================================================================

/// Phone number resolved from a bearer token.
///
/// Never empty; construct through [`PhoneNumber::parse`].
#[derive(Clone, Serialize, ToSchema, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Accept any non-blank string; the validation endpoint owns the format.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PhoneNumber(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for logs, e.g. `******1111`.
    pub fn redacted(&self) -> String {
        let visible: String = self
            .0
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let hidden = self.0.chars().count().saturating_sub(visible.chars().count());
        format!("{}{}", "*".repeat(hidden), visible)
    }
}

impl std::fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PhoneNumber({})", self.redacted())
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Response for GET /v1/session
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub authenticated: bool,
    pub phone_number: PhoneNumber,
}

// =============================================================================
// Cards
// =============================================================================

/// Card status as shown on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum CardStatus {
    Active,
    Inactive,
    Frozen,
}

/// A virtual card as shown in the card carousel.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub id: String,
    pub full_number: String,
    pub masked_number: String,
    pub expiry_date: String,
    pub cardholder_name: String,
    pub status: CardStatus,
    /// Card product type (e.g. `Visa`, `Mastercard`).
    #[serde(rename = "type")]
    pub card_type: String,
    /// Always 0; the downstream APIs expose no per-card balance.
    pub balance: f64,
    pub account_number: String,
    pub currency: String,
    pub card_type_network: String,
}

/// Card list view-model.
///
/// An empty `cards` with `error: None` means the user has no cards; any
/// failure sets `error`.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct CardListView {
    pub cards: Vec<CardDetails>,
    pub error: Option<String>,
}

// =============================================================================
// Transactions
// =============================================================================

/// Transaction status as shown in the history table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

/// A single row of the transaction history.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct TransactionView {
    /// Downstream reference number.
    pub id: String,
    /// US short date (`M/D/YYYY`) when parseable, otherwise the raw value.
    pub date: String,
    pub description: String,
    /// Negative for approved expenses, positive original amount otherwise.
    pub amount: f64,
    pub status: TransactionStatus,
}

/// Transaction history view-model.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct TransactionHistoryView {
    pub transactions: Vec<TransactionView>,
    /// Sum of approved amounts only.
    pub balance: f64,
    pub error: Option<String>,
}

/// Query parameters selecting a card.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CardQuery {
    /// Card number the request applies to.
    pub card_numb: Option<String>,
}

// =============================================================================
// Limits
// =============================================================================

/// Current and maximum limit for one channel.
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema, PartialEq)]
pub struct Limit {
    pub current: f64,
    pub max: f64,
}

/// One downstream limit record, normalized.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LimitEntry {
    pub channel: String,
    pub transaction_type: String,
    pub periodicity_id: String,
    pub limit: f64,
    pub max: Option<f64>,
}

/// Per transaction-type summary row of a channel.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LimitSummaryRow {
    pub transaction_type: String,
    pub periodicity_id: String,
    pub limit: f64,
}

/// Limits view-model.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LimitsView {
    pub pos_limit: Limit,
    pub atm_limit: Limit,
    pub atm_summary: Vec<LimitSummaryRow>,
    pub pos_summary: Vec<LimitSummaryRow>,
    pub all_limits: Vec<LimitEntry>,
    pub error: Option<String>,
}

// =============================================================================
// Actions
// =============================================================================

/// Request to change a card PIN.
#[derive(Clone, Deserialize, ToSchema)]
pub struct ChangePinRequest {
    pub card_numb: String,
    pub old_pin: String,
    pub new_pin: String,
    pub confirm_pin: String,
}

impl std::fmt::Debug for ChangePinRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePinRequest")
            .field("card_numb", &self.card_numb)
            .finish_non_exhaustive()
    }
}

/// Request to change one limit of a card.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateLimitRequest {
    pub card_numb: String,
    /// `ATM CHANNEL` or `POS CHANNEL`.
    pub channel: String,
    pub transaction_type: String,
    #[serde(default)]
    pub periodicity_id: Option<String>,
    pub new_limit: f64,
}

/// Outcome of a write action (PIN change, limit update).
#[derive(Debug, Clone, Default, Serialize, ToSchema, PartialEq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    /// Validation messages keyed by request field.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ActionOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: BTreeMap::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: BTreeMap::new(),
        }
    }

    pub fn invalid(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            success: false,
            message: "Please correct the highlighted fields.".to_string(),
            errors,
        }
    }
}
