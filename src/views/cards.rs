// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use tracing::{info, warn};

use super::describe;
use crate::banking::{BankingError, BankingGateway, CardRecord};
use crate::models::{CardDetails, CardListView, CardStatus, PhoneNumber};

/// Cards of the account registered for `phone`.
///
/// A caller without an account simply has no cards.
pub async fn load_cards(
    gateway: &dyn BankingGateway,
    phone: &PhoneNumber,
) -> Result<Vec<CardDetails>, BankingError> {
    let Some(account) = gateway.account_number(phone).await? else {
        return Ok(Vec::new());
    };

    let records = gateway.list_cards(&account).await?;
    info!(phone = %phone.redacted(), count = records.len(), "loaded cards");
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| card_details(index, record))
        .collect())
}

/// Card list view-model; failures become an empty list with an error.
pub async fn card_list_view(gateway: &dyn BankingGateway, phone: &PhoneNumber) -> CardListView {
    match load_cards(gateway, phone).await {
        Ok(cards) => CardListView { cards, error: None },
        Err(e) => {
            warn!(error = %e, phone = %phone.redacted(), "failed to load cards");
            CardListView {
                cards: Vec::new(),
                error: Some(describe(&e)),
            }
        }
    }
}

pub fn card_details(index: usize, record: CardRecord) -> CardDetails {
    let id = if record.card.trim().is_empty() {
        format!("card{}", index + 1)
    } else {
        record.card
    };

    CardDetails {
        id,
        status: card_status(&record.cardstatus),
        full_number: record.clearpan,
        masked_number: record.pan,
        expiry_date: record.expiry,
        cardholder_name: record.name_on_card,
        card_type: record.cardtype,
        balance: 0.0,
        account_number: record.accountnumber,
        currency: record.cardcurrency,
        card_type_network: record.cardtypenetwork,
    }
}

pub fn card_status(raw: &str) -> CardStatus {
    match raw.trim() {
        "Active" | "OK" => CardStatus::Active,
        "Frozen" | "Blocked" => CardStatus::Frozen,
        _ => CardStatus::Inactive,
    }
}
