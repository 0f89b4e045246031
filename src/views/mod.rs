// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Dashboard Views
//!
//! Reshape downstream banking records into the view-models the dashboard
//! renders. Downstream failures never escape as errors: they become a view
//! with empty data and a visible `error` message.

pub mod actions;
pub mod cards;
pub mod limits;
pub mod transactions;

use crate::banking::BankingError;

/// Message shown for a rejected card number.
pub const INVALID_CARD_NUMBER: &str = "Invalid card number provided.";

const MIN_CARD_DIGITS: usize = 12;
const MAX_CARD_DIGITS: usize = 19;

/// Validate a card number from a request: digits only, 12 to 19 of them.
pub fn parse_card_number(raw: Option<&str>) -> Result<String, &'static str> {
    let card = raw.map(str::trim).unwrap_or_default();
    let valid = (MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&card.len())
        && card.bytes().all(|b| b.is_ascii_digit());
    if valid {
        Ok(card.to_string())
    } else {
        Err(INVALID_CARD_NUMBER)
    }
}

/// User-facing message for a downstream failure.
pub fn describe(error: &BankingError) -> String {
    match error {
        BankingError::NotConfigured(_) => "Server configuration error.".to_string(),
        BankingError::Rejected { status } => format!("API error: {status}"),
        BankingError::Request(_) | BankingError::InvalidResponse(_) => {
            "An unexpected error occurred.".to_string()
        }
    }
}
