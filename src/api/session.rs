// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::auth::Session;
use crate::models::SessionView;

/// Identity of the current session.
#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "Session",
    responses(
        (status = 200, description = "Authenticated identity", body = SessionView),
        (status = 401, description = "No valid session or bearer token")
    )
)]
pub async fn get_session(Session(phone): Session) -> Json<SessionView> {
    Json(SessionView {
        authenticated: true,
        phone_number: phone,
    })
}
