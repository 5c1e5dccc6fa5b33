// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Restoration request types and validation

use serde::{Deserialize, Serialize};

use crate::restoration::RestorationJob;

/// Request body for POST /generate and POST /v1/restorations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
    /// URL of the source room photo
    pub image_url: String,

    /// Style label, e.g. "Modern"
    pub theme: String,

    /// Room type label, e.g. "Living Room"
    pub room: String,
}

impl RestoreRequest {
    pub fn into_job(self) -> RestorationJob {
        RestorationJob {
            image_url: self.image_url.trim().to_string(),
            theme: self.theme,
            room: self.room,
        }
    }
}
