// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation service trait definition

use async_trait::async_trait;

use super::types::{GenerationError, Prediction, PredictionRequest};

/// Remote asynchronous job system that runs image synthesis
///
/// Implementations submit a job and report its status; they never retry.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Create a job and return its descriptor (including the status URL)
    async fn submit(&self, request: &PredictionRequest) -> Result<Prediction, GenerationError>;

    /// Fetch the current state of a job from its status URL
    async fn get_status(&self, status_url: &str) -> Result<Prediction, GenerationError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
