// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Card limits view.
//!
//! Limit records are split by channel. Each channel gets a summary with one
//! row per transaction type (first periodicity seen, smallest limit) and a
//! headline [`Limit`]: the smallest limit as `current`, the largest declared
//! maximum as `max`.

use tracing::warn;

use super::describe;
use crate::banking::{mask_card_number, BankingGateway, LimitRecord};
use crate::models::{Limit, LimitEntry, LimitSummaryRow, LimitsView};

pub const ATM_CHANNEL: &str = "ATM CHANNEL";
pub const POS_CHANNEL: &str = "POS CHANNEL";

/// Limits of `card_number`, grouped per channel.
pub async fn card_limits(gateway: &dyn BankingGateway, card_number: &str) -> LimitsView {
    match gateway.list_limits(card_number).await {
        Ok(records) => limits_view(&records),
        Err(e) => {
            warn!(error = %e, card = %mask_card_number(card_number), "failed to load card limits");
            error_view(describe(&e))
        }
    }
}

pub fn error_view(message: impl Into<String>) -> LimitsView {
    LimitsView {
        error: Some(message.into()),
        ..LimitsView::default()
    }
}

pub fn limits_view(records: &[LimitRecord]) -> LimitsView {
    let entries: Vec<LimitEntry> = records.iter().map(entry).collect();
    let atm: Vec<&LimitEntry> = entries.iter().filter(|e| e.channel == ATM_CHANNEL).collect();
    let pos: Vec<&LimitEntry> = entries.iter().filter(|e| e.channel == POS_CHANNEL).collect();

    LimitsView {
        pos_limit: channel_limit(&pos),
        atm_limit: channel_limit(&atm),
        atm_summary: summarize(&atm),
        pos_summary: summarize(&pos),
        all_limits: entries.clone(),
        error: None,
    }
}

fn entry(record: &LimitRecord) -> LimitEntry {
    LimitEntry {
        channel: record.channel.trim().to_string(),
        transaction_type: record.transaction_type.clone(),
        periodicity_id: record.periodicity_id.clone(),
        limit: record.amount,
        max: record.max_amount,
    }
}

/// One row per transaction type, in first-seen order.
pub fn summarize(entries: &[&LimitEntry]) -> Vec<LimitSummaryRow> {
    let mut rows: Vec<LimitSummaryRow> = Vec::new();
    for entry in entries {
        match rows
            .iter_mut()
            .find(|row| row.transaction_type == entry.transaction_type)
        {
            Some(row) => row.limit = row.limit.min(entry.limit),
            None => rows.push(LimitSummaryRow {
                transaction_type: entry.transaction_type.clone(),
                periodicity_id: entry.periodicity_id.clone(),
                limit: entry.limit,
            }),
        }
    }
    rows
}

pub fn channel_limit(entries: &[&LimitEntry]) -> Limit {
    if entries.is_empty() {
        return Limit::default();
    }

    let current = entries.iter().map(|e| e.limit).fold(f64::INFINITY, f64::min);
    let declared_max = entries
        .iter()
        .filter_map(|e| e.max)
        .fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))));
    let max = declared_max
        .unwrap_or_else(|| entries.iter().map(|e| e.limit).fold(f64::NEG_INFINITY, f64::max));

    Limit { current, max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::FakeGateway;

    fn limit(channel: &str, kind: &str, period: &str, amount: f64, max: Option<f64>) -> LimitRecord {
        LimitRecord {
            channel: channel.to_string(),
            transaction_type: kind.to_string(),
            periodicity_id: period.to_string(),
            amount,
            max_amount: max,
        }
    }

    fn sample() -> Vec<LimitRecord> {
        vec![
            limit(ATM_CHANNEL, "Withdrawal", "DAILY", 5000.0, Some(20000.0)),
            limit(ATM_CHANNEL, "Withdrawal", "MONTHLY", 3000.0, None),
            limit(ATM_CHANNEL, "Balance Inquiry", "DAILY", 10.0, Some(50.0)),
            limit(POS_CHANNEL, "Purchase", "DAILY", 8000.0, None),
            limit(POS_CHANNEL, "Purchase", "WEEKLY", 12000.0, None),
            limit("ECOM CHANNEL", "Purchase", "DAILY", 1.0, None),
        ]
    }

    #[test]
    fn summary_groups_by_transaction_type() {
        let view = limits_view(&sample());
        assert_eq!(
            view.atm_summary,
            vec![
                LimitSummaryRow {
                    transaction_type: "Withdrawal".into(),
                    periodicity_id: "DAILY".into(),
                    limit: 3000.0,
                },
                LimitSummaryRow {
                    transaction_type: "Balance Inquiry".into(),
                    periodicity_id: "DAILY".into(),
                    limit: 10.0,
                },
            ]
        );
        assert_eq!(view.pos_summary.len(), 1);
        assert_eq!(view.pos_summary[0].limit, 8000.0);
    }

    #[test]
    fn channel_limit_uses_min_and_declared_max() {
        let view = limits_view(&sample());
        assert_eq!(view.atm_limit, Limit { current: 10.0, max: 20000.0 });
    }

    #[test]
    fn channel_limit_falls_back_to_largest_limit() {
        let view = limits_view(&sample());
        assert_eq!(view.pos_limit, Limit { current: 8000.0, max: 12000.0 });
    }

    #[test]
    fn other_channels_only_appear_in_all_limits() {
        let view = limits_view(&sample());
        assert_eq!(view.all_limits.len(), 6);
        assert!(view
            .atm_summary
            .iter()
            .chain(&view.pos_summary)
            .all(|row| row.limit > 1.0));
    }

    #[test]
    fn empty_channel_has_zero_limit() {
        let view = limits_view(&[]);
        assert_eq!(view.atm_limit, Limit::default());
        assert!(view.pos_summary.is_empty());
        assert_eq!(view.error, None);
    }

    #[tokio::test]
    async fn downstream_failure_degrades_to_error_view() {
        let view = card_limits(&FakeGateway::default(), "4111111111111111").await;
        assert!(view.all_limits.is_empty());
        assert_eq!(view.atm_limit, Limit::default());
        assert_eq!(view.error.as_deref(), Some("API error: 503"));
    }
}
