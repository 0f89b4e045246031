// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction history view.
//!
//! Approved records are card expenses and display as negative amounts; every
//! other record shows its original (positive) amount. The balance is the sum
//! of approved amounts only.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use super::describe;
use crate::banking::{mask_card_number, BankingGateway, PageRange, TransactionRecord};
use crate::models::{TransactionHistoryView, TransactionStatus, TransactionView};

const APPROVED: &str = "Approval";
const PENDING: &str = "Pending";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y"];

/// Latest page of transactions for `card_number`.
pub async fn transaction_history(
    gateway: &dyn BankingGateway,
    card_number: &str,
) -> TransactionHistoryView {
    match gateway
        .list_transactions(card_number, PageRange::default())
        .await
    {
        Ok(records) => history_view(&records),
        Err(e) => {
            warn!(error = %e, card = %mask_card_number(card_number), "failed to load transactions");
            error_view(describe(&e))
        }
    }
}

pub fn error_view(message: impl Into<String>) -> TransactionHistoryView {
    TransactionHistoryView {
        transactions: Vec::new(),
        balance: 0.0,
        error: Some(message.into()),
    }
}

pub fn history_view(records: &[TransactionRecord]) -> TransactionHistoryView {
    let balance = records
        .iter()
        .filter(|r| is_approved(r))
        .map(|r| r.amount)
        .sum();

    TransactionHistoryView {
        transactions: records.iter().map(transaction_view).collect(),
        balance,
        error: None,
    }
}

fn transaction_view(record: &TransactionRecord) -> TransactionView {
    let (amount, status) = if is_approved(record) {
        (-record.amount, TransactionStatus::Completed)
    } else if record.status.trim() == PENDING {
        (record.amount, TransactionStatus::Pending)
    } else {
        (record.amount, TransactionStatus::Failed)
    };

    TransactionView {
        id: record.reference.clone(),
        date: format_date(&record.date),
        description: record.type_name.clone(),
        amount,
        status,
    }
}

fn is_approved(record: &TransactionRecord) -> bool {
    record.status.trim() == APPROVED
}

/// Render a downstream date as `M/D/YYYY`; unparseable values pass through.
///
/// Slash dates are read month first.
pub fn format_date(raw: &str) -> String {
    parse_date(raw.trim())
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::FakeGateway;

    fn tx(status: &str, amount: f64) -> TransactionRecord {
        TransactionRecord {
            date: "2024-05-01T10:15:00".to_string(),
            type_name: "POS Purchase".to_string(),
            amount,
            status: status.to_string(),
            reference: format!("ref-{status}-{amount}"),
        }
    }

    #[test]
    fn approved_records_are_expenses() {
        let view = history_view(&[tx("Approval", 40.0), tx("Approval", 2.5)]);
        assert_eq!(view.transactions[0].amount, -40.0);
        assert_eq!(view.transactions[0].status, TransactionStatus::Completed);
        assert_eq!(view.balance, 42.5);
        assert_eq!(view.error, None);
    }

    #[test]
    fn other_records_show_original_amount_and_skip_balance() {
        let view = history_view(&[
            tx("Approval", 10.0),
            tx("Decline", 99.0),
            tx("Pending", 5.0),
        ]);
        assert_eq!(view.transactions[1].amount, 99.0);
        assert_eq!(view.transactions[1].status, TransactionStatus::Failed);
        assert_eq!(view.transactions[2].amount, 5.0);
        assert_eq!(view.transactions[2].status, TransactionStatus::Pending);
        assert_eq!(view.balance, 10.0);
    }

    #[test]
    fn empty_history() {
        let view = history_view(&[]);
        assert!(view.transactions.is_empty());
        assert_eq!(view.balance, 0.0);
        assert_eq!(view.error, None);
    }

    #[test]
    fn dates_render_as_us_short_date() {
        assert_eq!(format_date("2024-05-01T10:15:00"), "5/1/2024");
        assert_eq!(format_date("2024-12-31 23:59:59"), "12/31/2024");
        assert_eq!(format_date("2024-03-09"), "3/9/2024");
        assert_eq!(format_date("2024-03-09T08:00:00+03:00"), "3/9/2024");
        assert_eq!(format_date("yesterday"), "yesterday");
        assert_eq!(format_date("31/12/2024"), "31/12/2024");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn slash_dates_are_month_first() {
        assert_eq!(format_date("03/04/2024"), "3/4/2024");
        assert_eq!(format_date("12/31/2024 08:30:00"), "12/31/2024");
    }

    #[tokio::test]
    async fn downstream_failure_degrades_to_error_view() {
        let gateway = FakeGateway::default();
        let view = transaction_history(&gateway, "4111111111111111").await;
        assert!(view.transactions.is_empty());
        assert_eq!(view.balance, 0.0);
        assert_eq!(view.error.as_deref(), Some("API error: 503"));
    }

    #[tokio::test]
    async fn loads_history_from_gateway() {
        let gateway = FakeGateway {
            transactions: Some(vec![tx("Approval", 12.0)]),
            ..FakeGateway::default()
        };
        let view = transaction_history(&gateway, "4111111111111111").await;
        assert_eq!(view.transactions.len(), 1);
        assert_eq!(view.balance, 12.0);
    }
}
