// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-client request quota

pub mod fixed_window;
pub mod provider;
pub mod types;
pub mod upstash;

use std::sync::Arc;
use tracing::info;

pub use fixed_window::FixedWindowLimiter;
pub use provider::QuotaService;
pub use types::{QuotaDecision, QuotaError};
pub use upstash::UpstashQuotaService;

use crate::config::{QuotaBackend, QuotaConfig};

/// Quota policy resolved once at startup
#[derive(Clone)]
pub enum QuotaGate {
    /// No backend configured; checks are skipped entirely
    Disabled,
    Enforced(Arc<dyn QuotaService>),
}

impl QuotaGate {
    /// Build the gate described by `config`
    pub fn from_config(config: &QuotaConfig) -> Result<Self, QuotaError> {
        let gate = match config.backend {
            QuotaBackend::None => QuotaGate::Disabled,
            QuotaBackend::Memory => QuotaGate::Enforced(Arc::new(FixedWindowLimiter::new(
                config.max_requests,
                config.window,
            ))),
            QuotaBackend::Upstash => {
                let url = config.upstash_url.as_deref().unwrap_or_default();
                let token = config.upstash_token.as_deref().unwrap_or_default();
                let service =
                    UpstashQuotaService::new(url, token, config.max_requests, config.window)?
                        .with_prefix(&config.key_prefix);
                QuotaGate::Enforced(Arc::new(service))
            }
        };

        match &gate {
            QuotaGate::Disabled => info!("Request quota disabled"),
            QuotaGate::Enforced(svc) => info!(
                "Request quota enabled: backend={}, {} per {:?}",
                svc.name(),
                config.max_requests,
                config.window
            ),
        }

        Ok(gate)
    }

    pub fn enforced(service: Arc<dyn QuotaService>) -> Self {
        QuotaGate::Enforced(service)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, QuotaGate::Enforced(_))
    }

    /// Count a request for `identifier`; `None` when quotas are disabled
    pub async fn check(&self, identifier: &str) -> Result<Option<QuotaDecision>, QuotaError> {
        match self {
            QuotaGate::Disabled => Ok(None),
            QuotaGate::Enforced(service) => service.limit(identifier).await.map(Some),
        }
    }
}
