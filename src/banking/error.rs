// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

/// Failure of a downstream banking call.
#[derive(Debug, thiserror::Error)]
pub enum BankingError {
    #[error("banking endpoint not configured: {0}")]
    NotConfigured(&'static str),

    #[error("banking request failed: {0}")]
    Request(String),

    #[error("banking endpoint returned {status}")]
    Rejected { status: u16 },

    #[error("banking response was invalid: {0}")]
    InvalidResponse(String),
}
