// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed-window quota stored in Upstash Redis (REST API)
//!
//! Each window is one Redis key, `{prefix}:{identifier}:{window_index}`.
//! A check is a single `/pipeline` call running `INCR` followed by
//! `PEXPIRE ... NX`, so counters are shared by every node pointing at the
//! store and a window's TTL is set once, on its first request.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::provider::QuotaService;
use super::types::{QuotaDecision, QuotaError};

/// Key prefix compatible with counters written by `@upstash/ratelimit`
pub const DEFAULT_KEY_PREFIX: &str = "@upstash/ratelimit";

#[derive(Debug, Deserialize)]
struct PipelineEntry {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Upstash Redis REST quota backend
pub struct UpstashQuotaService {
    client: Client,
    rest_url: String,
    token: String,
    prefix: String,
    max_requests: u64,
    window: Duration,
}

impl UpstashQuotaService {
    /// Create a new backend
    ///
    /// # Arguments
    /// * `rest_url` - `UPSTASH_REDIS_REST_URL`
    /// * `token` - `UPSTASH_REDIS_REST_TOKEN`
    /// * `max_requests` - Requests allowed per window
    /// * `window` - Window length
    pub fn new(
        rest_url: &str,
        token: &str,
        max_requests: u64,
        window: Duration,
    ) -> Result<Self, QuotaError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            client,
            rest_url: rest_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            max_requests,
            window,
        })
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    fn window_ms(&self) -> u64 {
        u64::try_from(self.window.as_millis())
            .unwrap_or(u64::MAX)
            .max(1)
    }

    /// Redis key for `identifier` in the window containing `now_ms`
    pub fn window_key(&self, identifier: &str, now_ms: u64) -> String {
        format!("{}:{}:{}", self.prefix, identifier, now_ms / self.window_ms())
    }
}

#[async_trait]
impl QuotaService for UpstashQuotaService {
    async fn limit(&self, identifier: &str) -> Result<QuotaDecision, QuotaError> {
        let now_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let key = self.window_key(identifier, now_ms);
        let window_ms = self.window_ms().to_string();

        let commands = serde_json::json!([
            ["INCR", key],
            ["PEXPIRE", key, window_ms, "NX"],
        ]);

        let response = self
            .client
            .post(format!("{}/pipeline", self.rest_url))
            .bearer_auth(&self.token)
            .json(&commands)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QuotaError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let entries: Vec<PipelineEntry> = response
            .json()
            .await
            .map_err(|e| QuotaError::InvalidResponse(e.to_string()))?;

        let incr = entries
            .into_iter()
            .next()
            .ok_or_else(|| QuotaError::InvalidResponse("empty pipeline response".to_string()))?;

        if let Some(err) = incr.error {
            return Err(QuotaError::InvalidResponse(err));
        }

        let count = incr
            .result
            .as_ref()
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                QuotaError::InvalidResponse(format!("INCR returned {:?}", incr.result))
            })?;

        debug!("Quota key {} at {}/{}", key, count, self.max_requests);

        Ok(QuotaDecision::from_count(count, self.max_requests))
    }

    fn name(&self) -> &'static str {
        "upstash"
    }
}
