// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod generation;
pub mod quota;
pub mod restoration;
pub mod version;

pub use api::{create_app, start_server, AppState};
pub use config::{GenerationConfig, QuotaBackend, QuotaConfig, ServiceConfig};
pub use generation::{
    GenerationError, GenerationOutcome, GenerationService, JobStatus, PollPolicy,
    ReplicateClient,
};
pub use quota::{QuotaDecision, QuotaError, QuotaGate, QuotaService};
pub use restoration::{RestorationError, RestorationJob, RestorationService};
