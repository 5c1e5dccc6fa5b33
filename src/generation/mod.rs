// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Room restoration jobs on a remote prediction API

pub mod client;
pub mod poller;
pub mod prompt;
pub mod provider;
pub mod types;

pub use client::{ReplicateClient, DEFAULT_API_BASE, DEFAULT_MODEL_VERSION};
pub use poller::{poll_until_terminal, PollPolicy};
pub use prompt::build_prompt;
pub use provider::GenerationService;
pub use types::{
    GenerationError, GenerationOutcome, JobStatus, Prediction, PredictionInput,
    PredictionRequest, PredictionUrls,
};
