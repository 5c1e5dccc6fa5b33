// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Restoration request orchestration
//!
//! quota check -> imageUrl validation -> job submission -> status polling -> outcome

use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use url::Url;

use crate::config::ServiceConfig;
use crate::generation::{
    poll_until_terminal, GenerationError, GenerationOutcome, GenerationService, PollPolicy,
    PredictionInput, PredictionRequest, ReplicateClient,
};
use crate::quota::{QuotaDecision, QuotaError, QuotaGate};

/// A restoration to perform
#[derive(Debug, Clone, PartialEq)]
pub struct RestorationJob {
    pub image_url: String,
    pub theme: String,
    pub room: String,
}

impl RestorationJob {
    /// Check that `image_url` is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.image_url)
            .map_err(|e| format!("imageUrl is not a valid URL: {}", e))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "imageUrl must use http or https, got '{}'",
                url.scheme()
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RestorationError {
    /// Caller has used up its quota for the current window
    #[error("Quota exceeded ({} of {} remaining)", .0.remaining, .0.limit)]
    QuotaExceeded(QuotaDecision),

    #[error("Invalid request: {0}")]
    InvalidImageUrl(String),

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Runs one restoration per call; holds no per-request state
pub struct RestorationService {
    generator: Arc<dyn GenerationService>,
    quota: QuotaGate,
    model_version: String,
    poll_policy: PollPolicy,
    shutdown: CancellationToken,
}

impl RestorationService {
    pub fn new(
        generator: Arc<dyn GenerationService>,
        quota: QuotaGate,
        model_version: &str,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            generator,
            quota,
            model_version: model_version.to_string(),
            poll_policy,
            shutdown: CancellationToken::new(),
        }
    }

    /// Wire up the Replicate client and quota backend described by `config`
    pub fn from_config(config: &ServiceConfig) -> Result<Self, RestorationError> {
        let generation = &config.generation;
        let client = ReplicateClient::new(
            &generation.api_base,
            &generation.api_key,
            generation.request_timeout,
        )?;
        let quota = QuotaGate::from_config(&config.quota)?;

        Ok(Self::new(
            Arc::new(client),
            quota,
            &generation.model_version,
            generation.poll.clone(),
        ))
    }

    /// Cancel in-flight polls when `token` fires
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn quota_enabled(&self) -> bool {
        self.quota.is_enabled()
    }

    /// Build the submission payload for `job`
    pub fn prediction_request(&self, job: &RestorationJob) -> PredictionRequest {
        PredictionRequest::new(
            &self.model_version,
            PredictionInput::from_parts(&job.image_url, &job.theme, &job.room),
        )
    }

    /// Handle one restoration for `client_id` (empty when unidentified)
    ///
    /// The quota is counted before anything else, so a rejected request
    /// reports 429 even when its body is also invalid.
    pub async fn handle(
        &self,
        job: &RestorationJob,
        client_id: &str,
    ) -> Result<GenerationOutcome, RestorationError> {
        if let Some(decision) = self
            .quota
            .check(client_id)
            .instrument(info_span!("quota_check", client = client_id))
            .await?
        {
            debug!(
                "Quota for '{}': allowed={}, remaining={}/{}",
                client_id, decision.allowed, decision.remaining, decision.limit
            );
            if !decision.allowed {
                warn!("Quota exceeded for '{}'", client_id);
                return Err(RestorationError::QuotaExceeded(decision));
            }
        }

        job.validate().map_err(RestorationError::InvalidImageUrl)?;

        let request = self.prediction_request(job);
        debug!(
            "Submitting restoration: image={}, prompt='{}'",
            job.image_url, request.input.prompt
        );

        let prediction = self
            .generator
            .submit(&request)
            .instrument(info_span!("submit", provider = self.generator.name()))
            .await?;
        let status_url = prediction
            .status_url()
            .ok_or(GenerationError::MissingStatusUrl)?;
        info!(
            "Job {} submitted ({}), polling {}",
            prediction.id.as_deref().unwrap_or("?"),
            prediction.status,
            status_url
        );

        let outcome = poll_until_terminal(
            self.generator.as_ref(),
            status_url,
            &self.poll_policy,
            &self.shutdown,
        )
        .instrument(info_span!("poll", url = status_url))
        .await?;

        info!("Restoration finished: success={}", outcome.is_success());
        Ok(outcome)
    }
}
