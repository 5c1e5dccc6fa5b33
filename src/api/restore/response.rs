// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Restoration response bodies

use serde::{Deserialize, Serialize};

use crate::generation::GenerationOutcome;

/// Body sent by POST /generate when the job did not produce an image
pub const RESTORE_FAILED_MESSAGE: &str = "Failed to restore image";

/// Body for POST /generate: the raw output on success, the failure string otherwise
pub fn legacy_body(outcome: GenerationOutcome) -> serde_json::Value {
    match outcome {
        GenerationOutcome::Success { output } => output,
        GenerationOutcome::Failure => serde_json::Value::String(RESTORE_FAILED_MESSAGE.to_string()),
    }
}

/// Body for POST /v1/restorations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestorationResponse {
    /// "succeeded" or "failed"
    pub status: String,
    /// Image reference(s) from the generation service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    pub request_id: String,
}

impl RestorationResponse {
    pub fn from_outcome(outcome: GenerationOutcome, request_id: String) -> Self {
        match outcome {
            GenerationOutcome::Success { output } => Self {
                status: "succeeded".to_string(),
                output: Some(output),
                request_id,
            },
            GenerationOutcome::Failure => Self {
                status: "failed".to_string(),
                output: None,
                request_id,
            },
        }
    }
}
