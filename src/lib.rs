// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Card Portal - Virtual Card Dashboard Backend
//!
//! Serves the dashboard API for a bank's virtual cards. Callers arrive from
//! the embedding app with a bearer token; the session bridge validates it
//! once against the identity service and swaps it for an encrypted
//! `user-phone` cookie that carries the session from then on.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session credential bridge (token validation, sealed cookie)
//! - `banking` - Downstream banking REST APIs
//! - `views` - View-models rendered by the dashboard
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod banking;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod views;
