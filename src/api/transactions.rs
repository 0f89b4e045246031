// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::auth::Session;
use crate::models::{CardQuery, TransactionHistoryView};
use crate::state::AppState;
use crate::views::{parse_card_number, transactions};

/// Latest transactions of a card.
#[utoipa::path(
    get,
    path = "/v1/transactions",
    tag = "Transactions",
    params(CardQuery),
    responses(
        (status = 200, description = "Transaction history view", body = TransactionHistoryView),
        (status = 400, description = "Invalid card number", body = TransactionHistoryView),
        (status = 401, description = "No valid session or bearer token")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Session(phone): Session,
    Query(query): Query<CardQuery>,
) -> (StatusCode, Json<TransactionHistoryView>) {
    let card_number = match parse_card_number(query.card_numb.as_deref()) {
        Ok(card_number) => card_number,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(transactions::error_view(message)),
            )
        }
    };

    debug!(phone = %phone.redacted(), "listing transactions");
    let view = transactions::transaction_history(state.banking.as_ref(), &card_number).await;
    (StatusCode::OK, Json(view))
}
