// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::auth::Session;
use crate::error::ApiError;
use crate::models::{ActionOutcome, CardQuery, LimitsView, UpdateLimitRequest};
use crate::state::AppState;
use crate::views::{actions, limits, parse_card_number};

/// Limits of a card, grouped per channel.
#[utoipa::path(
    get,
    path = "/v1/limits",
    tag = "Limits",
    params(CardQuery),
    responses(
        (status = 200, description = "Limits view", body = LimitsView),
        (status = 400, description = "Invalid card number", body = LimitsView),
        (status = 401, description = "No valid session or bearer token")
    )
)]
pub async fn get_limits(
    State(state): State<AppState>,
    Session(phone): Session,
    Query(query): Query<CardQuery>,
) -> (StatusCode, Json<LimitsView>) {
    let card_number = match parse_card_number(query.card_numb.as_deref()) {
        Ok(card_number) => card_number,
        Err(message) => return (StatusCode::BAD_REQUEST, Json(limits::error_view(message))),
    };

    debug!(phone = %phone.redacted(), "listing card limits");
    let view = limits::card_limits(state.banking.as_ref(), &card_number).await;
    (StatusCode::OK, Json(view))
}

/// Change one limit of a card.
#[utoipa::path(
    post,
    path = "/v1/limits",
    tag = "Limits",
    request_body = UpdateLimitRequest,
    responses(
        (status = 200, description = "Outcome of the update", body = ActionOutcome),
        (status = 400, description = "Invalid request", body = ActionOutcome),
        (status = 401, description = "No valid session or bearer token")
    )
)]
pub async fn update_limit(
    State(state): State<AppState>,
    Session(phone): Session,
    payload: Result<Json<UpdateLimitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionOutcome>), ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;

    let update = match actions::validate_limit_update(&request) {
        Ok(update) => update,
        Err(outcome) => return Ok((StatusCode::BAD_REQUEST, Json(outcome))),
    };

    debug!(phone = %phone.redacted(), channel = %update.channel, "updating card limit");
    let outcome = actions::update_limit(state.banking.as_ref(), &update).await;
    Ok((StatusCode::OK, Json(outcome)))
}
