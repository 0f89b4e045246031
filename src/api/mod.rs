// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::session_bridge,
    models::{
        ActionOutcome, CardDetails, CardListView, CardStatus, ChangePinRequest, Limit, LimitEntry,
        LimitSummaryRow, LimitsView, PhoneNumber, SessionView, TransactionHistoryView,
        TransactionStatus, TransactionView, UpdateLimitRequest,
    },
    state::AppState,
};

pub mod cards;
pub mod health;
pub mod limits;
pub mod pin;
pub mod session;
pub mod transactions;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/session", get(session::get_session))
        .route("/cards", get(cards::list_cards))
        .route("/transactions", get(transactions::list_transactions))
        .route("/limits", get(limits::get_limits).post(limits::update_limit))
        .route("/pin", post(pin::change_pin));

    let legacy_routes = Router::new().route("/get-cards", get(cards::legacy_get_cards));

    // Every dashboard route sits behind the session bridge; probes and docs do not.
    let dashboard = Router::new()
        .nest("/v1", v1_routes)
        .nest("/api", legacy_routes)
        .route_layer(from_fn_with_state(state.clone(), session_bridge));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(dashboard)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        session::get_session,
        cards::list_cards,
        cards::legacy_get_cards,
        transactions::list_transactions,
        limits::get_limits,
        limits::update_limit,
        pin::change_pin
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            PhoneNumber,
            SessionView,
            CardStatus,
            CardDetails,
            CardListView,
            cards::LegacyCardsResponse,
            cards::LegacyCardsError,
            TransactionStatus,
            TransactionView,
            TransactionHistoryView,
            Limit,
            LimitEntry,
            LimitSummaryRow,
            LimitsView,
            ChangePinRequest,
            UpdateLimitRequest,
            ActionOutcome
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Session", description = "Session identity"),
        (name = "Cards", description = "Virtual cards and PIN management"),
        (name = "Transactions", description = "Card transaction history"),
        (name = "Limits", description = "Card spending limits")
    )
)]
struct ApiDoc;
