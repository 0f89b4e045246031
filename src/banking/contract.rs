// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Versioned downstream response contract.
//!
//! The banking APIs have shipped several response shapes over time
//! (`response.body.cards`, `response.body.Transactions`, flatter variants).
//! Each record list is located through an ordered list of JSON pointers; the
//! first pointer that resolves to an array wins.

use serde_json::Value;

const DEFAULT_CARDS: &[&str] = &["/response/body/cards", "/body/cards", "/cards"];
const DEFAULT_TRANSACTIONS: &[&str] = &[
    "/response/body/Transactions",
    "/response/body/transactions",
    "/Transactions",
    "/transactions",
];
const DEFAULT_LIMITS: &[&str] = &["/response/body/limits", "/response/body/Limits", "/limits"];
const DEFAULT_ACCOUNT_NUMBER: &[&str] = &["/details/0/AccountNumber", "/details/0/accountNumber"];
const DEFAULT_MESSAGE: &[&str] = &["/response/header/message", "/message"];

/// JSON pointers locating each record list in downstream responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseContract {
    cards: Vec<String>,
    transactions: Vec<String>,
    limits: Vec<String>,
    account_number: Vec<String>,
    message: Vec<String>,
}

impl Default for ResponseContract {
    fn default() -> Self {
        Self {
            cards: owned(DEFAULT_CARDS),
            transactions: owned(DEFAULT_TRANSACTIONS),
            limits: owned(DEFAULT_LIMITS),
            account_number: owned(DEFAULT_ACCOUNT_NUMBER),
            message: owned(DEFAULT_MESSAGE),
        }
    }
}

impl ResponseContract {
    /// Replace the card list pointers. An empty list keeps the defaults.
    pub fn with_cards(mut self, pointers: Vec<String>) -> Self {
        if !pointers.is_empty() {
            self.cards = pointers;
        }
        self
    }

    pub fn with_transactions(mut self, pointers: Vec<String>) -> Self {
        if !pointers.is_empty() {
            self.transactions = pointers;
        }
        self
    }

    pub fn with_limits(mut self, pointers: Vec<String>) -> Self {
        if !pointers.is_empty() {
            self.limits = pointers;
        }
        self
    }

    pub fn card_list<'a>(&self, body: &'a Value) -> Option<&'a Vec<Value>> {
        first_array(body, &self.cards)
    }

    pub fn transaction_list<'a>(&self, body: &'a Value) -> Option<&'a Vec<Value>> {
        first_array(body, &self.transactions)
    }

    pub fn limit_list<'a>(&self, body: &'a Value) -> Option<&'a Vec<Value>> {
        first_array(body, &self.limits)
    }

    /// Account number from an accounts response; numbers are stringified.
    pub fn account_number(&self, body: &Value) -> Option<String> {
        self.account_number
            .iter()
            .filter_map(|p| body.pointer(p))
            .find_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// Human-readable message of an action response, if any.
    pub fn message(&self, body: &Value) -> Option<String> {
        self.message
            .iter()
            .filter_map(|p| body.pointer(p))
            .find_map(Value::as_str)
            .map(str::to_string)
    }
}

fn first_array<'a>(body: &'a Value, pointers: &[String]) -> Option<&'a Vec<Value>> {
    pointers
        .iter()
        .filter_map(|p| body.pointer(p))
        .find_map(Value::as_array)
}

fn owned(pointers: &[&str]) -> Vec<String> {
    pointers.iter().map(|p| p.to_string()).collect()
}
