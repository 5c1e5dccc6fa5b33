// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the restoration node, read from environment variables

use std::env;
use std::time::Duration;

use crate::generation::{PollPolicy, DEFAULT_API_BASE, DEFAULT_MODEL_VERSION};
use crate::quota::upstash::DEFAULT_KEY_PREFIX;

/// Top-level service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub generation: GenerationConfig,
    pub quota: QuotaConfig,
}

/// Generation API settings
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Predictions API base URL
    pub api_base: String,
    /// Bearer credential
    pub api_key: String,
    /// Model version submitted with each job
    pub model_version: String,
    /// Per-call HTTP timeout
    pub request_timeout: Duration,
    /// Status polling bounds
    pub poll: PollPolicy,
}

/// Which quota backend to construct at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaBackend {
    None,
    Memory,
    Upstash,
}

impl QuotaBackend {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" | "disabled" => Ok(QuotaBackend::None),
            "memory" => Ok(QuotaBackend::Memory),
            "upstash" | "redis" => Ok(QuotaBackend::Upstash),
            other => Err(format!(
                "unknown quota backend '{}'; expected upstash, memory or none",
                other
            )),
        }
    }
}

/// Request quota settings
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    pub backend: QuotaBackend,
    /// Requests allowed per window
    pub max_requests: u64,
    /// Window length
    pub window: Duration,
    pub upstash_url: Option<String>,
    pub upstash_token: Option<String>,
    pub key_prefix: String,
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_timeout_secs: u64 = parse_or(lookup("POLL_TIMEOUT_SECS"), 300);
        let poll = PollPolicy {
            interval: Duration::from_millis(parse_or(lookup("POLL_INTERVAL_MS"), 1000)),
            // 0 keeps polling until the job finishes
            timeout: (poll_timeout_secs > 0).then(|| Duration::from_secs(poll_timeout_secs)),
            max_attempts: lookup("POLL_MAX_ATTEMPTS").and_then(|v| v.trim().parse().ok()),
        };

        let generation = GenerationConfig {
            api_base: non_empty(lookup("REPLICATE_API_BASE"))
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: non_empty(lookup("REPLICATE_API_KEY"))
                .or_else(|| non_empty(lookup("REPLICATE_API_TOKEN")))
                .unwrap_or_default(),
            model_version: non_empty(lookup("REPLICATE_MODEL_VERSION"))
                .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string()),
            request_timeout: Duration::from_secs(parse_or(
                lookup("GENERATION_REQUEST_TIMEOUT_SECS"),
                30,
            )),
            poll,
        };

        let upstash_url = non_empty(lookup("UPSTASH_REDIS_REST_URL"));
        let upstash_token = non_empty(lookup("UPSTASH_REDIS_REST_TOKEN"));
        let backend = match non_empty(lookup("QUOTA_BACKEND")) {
            Some(raw) => QuotaBackend::parse(&raw)?,
            // Enforce quotas whenever a store is configured
            None if upstash_url.is_some() && upstash_token.is_some() => QuotaBackend::Upstash,
            None => QuotaBackend::None,
        };

        let window_minutes: u64 = parse_or(lookup("QUOTA_WINDOW_MINUTES"), 1440);
        let window_secs = window_minutes
            .checked_mul(60)
            .ok_or_else(|| format!("QUOTA_WINDOW_MINUTES is too large: {}", window_minutes))?;

        let quota = QuotaConfig {
            backend,
            max_requests: parse_or(lookup("QUOTA_MAX_REQUESTS"), 5),
            window: Duration::from_secs(window_secs),
            upstash_url,
            upstash_token,
            key_prefix: non_empty(lookup("QUOTA_KEY_PREFIX"))
                .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
        };

        Ok(Self { generation, quota })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.generation.api_key.is_empty() {
            return Err("REPLICATE_API_KEY must be set".to_string());
        }
        if self.generation.poll.interval.is_zero() {
            return Err("Poll interval must be greater than 0".to_string());
        }
        if self.quota.backend != QuotaBackend::None {
            if self.quota.max_requests == 0 {
                return Err("Quota limit must be greater than 0".to_string());
            }
            if self.quota.window.is_zero() {
                return Err("Quota window must be greater than 0".to_string());
            }
        }
        if self.quota.backend == QuotaBackend::Upstash
            && (self.quota.upstash_url.is_none() || self.quota.upstash_token.is_none())
        {
            return Err(
                "Upstash quota requires UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                api_base: DEFAULT_API_BASE.to_string(),
                api_key: String::new(),
                model_version: DEFAULT_MODEL_VERSION.to_string(),
                request_timeout: Duration::from_secs(30),
                poll: PollPolicy::default(),
            },
            quota: QuotaConfig {
                backend: QuotaBackend::None,
                max_requests: 5,
                window: Duration::from_secs(1440 * 60),
                upstash_url: None,
                upstash_token: None,
                key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            },
        }
    }
}
