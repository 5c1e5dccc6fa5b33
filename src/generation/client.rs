// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for a Replicate-compatible predictions API

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info};

use super::provider::GenerationService;
use super::types::{GenerationError, Prediction, PredictionRequest};

pub const DEFAULT_API_BASE: &str = "https://api.replicate.com/v1";

/// Restoration model version submitted with every job
pub const DEFAULT_MODEL_VERSION: &str =
    "854e8727697a057c525cdb45ab037f64ecca770a1769cc52287c2e56472a247b";

/// HTTP client for the predictions API
pub struct ReplicateClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl ReplicateClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_base` - Base URL, e.g. `https://api.replicate.com/v1`
    /// * `api_key` - Bearer credential
    /// * `request_timeout` - Per-call HTTP timeout
    pub fn new(
        api_base: &str,
        api_key: &str,
        request_timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        let api_base = api_base.trim_end_matches('/').to_string();
        info!("Generation client configured: api_base={}", api_base);

        Ok(Self {
            client,
            api_base,
            api_key: api_key.to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn predictions_endpoint(&self) -> String {
        format!("{}/predictions", self.api_base)
    }

    async fn decode(response: Response) -> Result<Prediction, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GenerationError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl GenerationService for ReplicateClient {
    async fn submit(&self, request: &PredictionRequest) -> Result<Prediction, GenerationError> {
        let url = self.predictions_endpoint();
        debug!("Generation submit POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn get_status(&self, status_url: &str) -> Result<Prediction, GenerationError> {
        let response = self
            .client
            .get(status_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        Self::decode(response).await
    }

    fn name(&self) -> &'static str {
        "replicate"
    }
}
