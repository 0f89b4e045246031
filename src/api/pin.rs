// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::auth::Session;
use crate::error::ApiError;
use crate::models::{ActionOutcome, ChangePinRequest};
use crate::state::AppState;
use crate::views::actions;

/// Change the PIN of a card.
///
/// Field errors are keyed by request field (`old_pin`, `new_pin`,
/// `confirm_pin`, `card_numb`).
#[utoipa::path(
    post,
    path = "/v1/pin",
    tag = "Cards",
    request_body = ChangePinRequest,
    responses(
        (status = 200, description = "Outcome of the PIN change", body = ActionOutcome),
        (status = 400, description = "Invalid request", body = ActionOutcome),
        (status = 401, description = "No valid session or bearer token")
    )
)]
pub async fn change_pin(
    State(state): State<AppState>,
    Session(phone): Session,
    payload: Result<Json<ChangePinRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionOutcome>), ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;

    let change = match actions::validate_pin_change(&request) {
        Ok(change) => change,
        Err(outcome) => return Ok((StatusCode::BAD_REQUEST, Json(outcome))),
    };

    debug!(phone = %phone.redacted(), "changing card PIN");
    let outcome = actions::change_pin(state.banking.as_ref(), &change).await;
    Ok((StatusCode::OK, Json(outcome)))
}
