// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Status polling for submitted generation jobs

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::provider::GenerationService;
use super::types::{GenerationError, GenerationOutcome, JobStatus};

/// Bounds on how long a job may stay pending
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Wait between status calls
    pub interval: Duration,
    /// Maximum total time spent polling (`None` = unbounded)
    pub timeout: Option<Duration>,
    /// Maximum number of status calls (`None` = unbounded)
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Some(Duration::from_secs(300)),
            max_attempts: None,
        }
    }
}

impl PollPolicy {
    fn exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
            || self.timeout.is_some_and(|t| elapsed >= t)
    }
}

/// Poll `status_url` until the job reaches a terminal status.
///
/// Stops on the first `succeeded` or `failed`. Any other status waits one
/// `policy.interval` and polls again. Status-call errors end the loop.
pub async fn poll_until_terminal(
    service: &dyn GenerationService,
    status_url: &str,
    policy: &PollPolicy,
    shutdown: &CancellationToken,
) -> Result<GenerationOutcome, GenerationError> {
    let start = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        if shutdown.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        let prediction = service.get_status(status_url).await?;
        attempts += 1;
        debug!(
            "Poll #{} for {}: status={}",
            attempts, status_url, prediction.status
        );

        match prediction.status {
            JobStatus::Succeeded => {
                return Ok(match prediction.output {
                    Some(output) if !output.is_null() => {
                        info!("Job succeeded after {} polls", attempts);
                        GenerationOutcome::Success { output }
                    }
                    _ => {
                        warn!("Job succeeded without output after {} polls", attempts);
                        GenerationOutcome::Failure
                    }
                });
            }
            JobStatus::Failed => {
                warn!(
                    "Job failed after {} polls: {:?}",
                    attempts, prediction.error
                );
                return Ok(GenerationOutcome::Failure);
            }
            status => {
                let elapsed = start.elapsed();
                if policy.exhausted(attempts, elapsed) {
                    warn!(
                        "Giving up on {} after {} polls ({:?}), last status {}",
                        status_url, attempts, elapsed, status
                    );
                    return Err(GenerationError::Timeout {
                        attempts,
                        elapsed,
                        last_status: status,
                    });
                }
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => return Err(GenerationError::Cancelled),
            _ = tokio::time::sleep(policy.interval) => {}
        }
    }
}
