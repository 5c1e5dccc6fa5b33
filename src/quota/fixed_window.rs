// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-process fixed-window quota (single node deployments and tests)

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::provider::QuotaService;
use super::types::{QuotaDecision, QuotaError};

struct Window {
    started: Instant,
    count: u64,
}

/// Per-identifier fixed-window counter held in memory
pub struct FixedWindowLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    max_requests: u64,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of identifiers currently tracked
    pub async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}

#[async_trait]
impl QuotaService for FixedWindowLimiter {
    async fn limit(&self, identifier: &str) -> Result<QuotaDecision, QuotaError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        // Drop expired windows while we hold the lock
        windows.retain(|_, w| now.duration_since(w.started) < self.window);

        let entry = windows.entry(identifier.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        entry.count += 1;

        Ok(QuotaDecision::from_count(entry.count, self.max_requests))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
