// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Quota service trait definition

use async_trait::async_trait;

use super::types::{QuotaDecision, QuotaError};

/// Per-identifier request counter enforcing a maximum per time window
///
/// Every call counts as one request against `identifier`, whether or not it
/// is allowed.
#[async_trait]
pub trait QuotaService: Send + Sync {
    async fn limit(&self, identifier: &str) -> Result<QuotaDecision, QuotaError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
