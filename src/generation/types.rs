// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wire types for the prediction API and the outcome of a restoration job

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Job submission payload (`POST /predictions`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Model version identifier
    pub version: String,
    /// Model input parameters
    pub input: PredictionInput,
}

/// Input block of a restoration prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Source image URL
    pub image: String,
    /// Scene prompt
    pub prompt: String,
    /// Quality-boosting prompt
    pub a_prompt: String,
    /// Negative prompt
    pub n_prompt: String,
}

/// Job descriptor returned by both submission and status calls
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionUrls {
    /// Status polling endpoint
    #[serde(default)]
    pub get: Option<String>,
    #[serde(default)]
    pub cancel: Option<String>,
}

impl Prediction {
    /// The status-polling URL, if the service supplied one
    pub fn status_url(&self) -> Option<&str> {
        self.urls
            .as_ref()
            .and_then(|u| u.get.as_deref())
            .filter(|u| !u.is_empty())
    }
}

/// Job status as reported by the generation service.
///
/// Only `Succeeded` and `Failed` are terminal; every other value, including
/// ones this crate does not know about, means the job is still running.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Starting,
    Processing,
    Succeeded,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Starting => "starting",
            JobStatus::Processing => "processing",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Other(s) => s.as_str(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        match s {
            "starting" => JobStatus::Starting,
            "processing" => JobStatus::Processing,
            "succeeded" => JobStatus::Succeeded,
            "failed" => JobStatus::Failed,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for JobStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(JobStatus::from).unwrap_or_default())
    }
}

/// Result of a restoration job once polling has stopped
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum GenerationOutcome {
    /// Job succeeded; `output` is whatever the service returned
    #[serde(rename = "succeeded")]
    Success { output: serde_json::Value },
    /// Job reported `failed`, or succeeded without an output
    #[serde(rename = "failed")]
    Failure,
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { .. })
    }
}

/// Errors raised while talking to the generation service
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network or TLS failure
    #[error("Generation transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Generation API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be understood
    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),

    /// Submission succeeded but carried no status URL
    #[error("Generation job has no status URL")]
    MissingStatusUrl,

    /// Poll policy exhausted before a terminal status
    #[error("Generation job still {last_status} after {attempts} polls ({elapsed:?})")]
    Timeout {
        attempts: u32,
        elapsed: Duration,
        last_status: JobStatus,
    },

    /// Service shutting down while the job was pending
    #[error("Generation polling cancelled")]
    Cancelled,
}
