// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Quota decision and error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a single quota check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDecision {
    /// Whether this request may proceed
    pub allowed: bool,
    /// Requests allowed per window
    pub limit: u64,
    /// Requests left in the current window
    pub remaining: u64,
}

impl QuotaDecision {
    /// Decision for the `count`-th request of a window holding `limit` requests
    pub fn from_count(count: u64, limit: u64) -> Self {
        Self {
            allowed: count <= limit,
            limit,
            remaining: limit.saturating_sub(count),
        }
    }
}

/// Errors from a quota backend
#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("Quota backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Quota backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Unexpected quota backend response: {0}")]
    InvalidResponse(String),
}
