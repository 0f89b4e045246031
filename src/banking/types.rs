// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Downstream banking record types.
//!
//! Field names follow the banking APIs verbatim (including the spaced
//! transaction keys). Every field defaults so that a sparse record still
//! deserializes; the view layer decides what a missing value means.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A card as returned by the card list API.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub card: String,
    #[serde(deserialize_with = "lenient_string")]
    pub clearpan: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pan: String,
    #[serde(deserialize_with = "lenient_string")]
    pub expiry: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name_on_card: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cardstatus: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cardtype: String,
    #[serde(deserialize_with = "lenient_string")]
    pub accountnumber: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cardcurrency: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cardtypenetwork: String,
}

/// A transaction as returned by the transactions API.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransactionRecord {
    #[serde(rename = "transaction date", deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(rename = "transaction type name", deserialize_with = "lenient_string")]
    pub type_name: String,
    #[serde(rename = "Amount", deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(rename = "Status", deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(rename = "Reference number", deserialize_with = "lenient_string")]
    pub reference: String,
}

/// One limit of a card as returned by the limits API.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub channel: String,
    #[serde(deserialize_with = "lenient_string")]
    pub transaction_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub periodicity_id: String,
    #[serde(rename = "mnt_limite", deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(rename = "mnt_limite_max", deserialize_with = "lenient_optional_amount")]
    pub max_amount: Option<f64>,
}

/// Page of records to request (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl Default for PageRange {
    /// The most recent ten records.
    fn default() -> Self {
        Self { start: 1, end: 10 }
    }
}

/// A limit change to submit downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitUpdate {
    pub card_number: String,
    pub channel: String,
    pub transaction_type: String,
    pub periodicity_id: Option<String>,
    pub new_limit: f64,
}

/// A PIN change to submit downstream.
#[derive(Clone, PartialEq, Eq)]
pub struct PinChange {
    pub card_number: String,
    pub old_pin: String,
    pub new_pin: String,
}

impl std::fmt::Debug for PinChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinChange")
            .field("card_number", &mask_card_number(&self.card_number))
            .field("old_pin", &"****")
            .field("new_pin", &"****")
            .finish()
    }
}

/// Acknowledgement of a write call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionAck {
    pub message: Option<String>,
}

/// Last four digits of a card number, for logs.
pub fn mask_card_number(card_number: &str) -> String {
    let tail: String = card_number
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("...{tail}")
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        other => parse_amount(&other)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {other}"))),
    }
}

fn lenient_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        other => parse_amount(&other)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {other}"))),
    }
}

fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', "").parse().ok()?,
        _ => return None,
    };
    amount.is_finite().then_some(amount)
}
