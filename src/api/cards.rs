// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::auth::Session;
use crate::models::{CardDetails, CardListView};
use crate::state::AppState;
use crate::views::{cards, describe};

/// Body of the legacy card route on success.
#[derive(Debug, Serialize, ToSchema)]
pub struct LegacyCardsResponse {
    pub cards: Vec<CardDetails>,
}

/// Body of the legacy card route on failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct LegacyCardsError {
    pub message: String,
}

/// Cards of the signed-in user.
///
/// Downstream failures are reported in `error` with HTTP 200.
#[utoipa::path(
    get,
    path = "/v1/cards",
    tag = "Cards",
    responses(
        (status = 200, description = "Card list view", body = CardListView),
        (status = 401, description = "No valid session or bearer token")
    )
)]
pub async fn list_cards(
    State(state): State<AppState>,
    Session(phone): Session,
) -> Json<CardListView> {
    debug!(phone = %phone.redacted(), "listing cards");
    Json(cards::card_list_view(state.banking.as_ref(), &phone).await)
}

/// Legacy card route: `{ cards }`, or HTTP 500 `{ message }` on failure.
#[utoipa::path(
    get,
    path = "/api/get-cards",
    tag = "Cards",
    responses(
        (status = 200, description = "Cards of the signed-in user", body = LegacyCardsResponse),
        (status = 401, description = "No valid session or bearer token"),
        (status = 500, description = "Cards could not be loaded", body = LegacyCardsError)
    )
)]
pub async fn legacy_get_cards(State(state): State<AppState>, Session(phone): Session) -> Response {
    match cards::load_cards(state.banking.as_ref(), &phone).await {
        Ok(cards) => Json(LegacyCardsResponse { cards }).into_response(),
        Err(e) => {
            warn!(error = %e, phone = %phone.redacted(), "legacy card route failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LegacyCardsError {
                    message: describe(&e),
                }),
            )
                .into_response()
        }
    }
}
