// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt construction for room restoration jobs

use super::types::{PredictionInput, PredictionRequest};

/// Room label that replaces the themed prompt with a fixed description
pub const GAMING_ROOM: &str = "Gaming Room";

/// Prompt used whenever `room` is exactly [`GAMING_ROOM`]
pub const GAMING_ROOM_PROMPT: &str =
    "a room for gaming with gaming computers, gaming consoles, and gaming chairs";

/// Quality-boosting prompt attached to every job
pub const QUALITY_PROMPT: &str = "best quality, extremely detailed, photo from Pinterest, interior, cinematic photo, ultra-detailed, ultra-realistic, award-winning";

/// Defects the model is steered away from
pub const NEGATIVE_PROMPT: &str = "longbody, lowres, bad anatomy, bad hands, missing fingers, extra digit, fewer digits, cropped, worst quality, low quality";

/// Build the scene prompt for a theme/room pair.
///
/// Theme is ignored when the room is exactly "Gaming Room" (case-sensitive).
pub fn build_prompt(theme: &str, room: &str) -> String {
    if room == GAMING_ROOM {
        return GAMING_ROOM_PROMPT.to_string();
    }
    format!("a {} {}", theme.to_lowercase(), room.to_lowercase())
}

impl PredictionInput {
    /// Assemble the model input for a restoration of `image_url`
    pub fn from_parts(image_url: &str, theme: &str, room: &str) -> Self {
        Self {
            image: image_url.to_string(),
            prompt: build_prompt(theme, room),
            a_prompt: QUALITY_PROMPT.to_string(),
            n_prompt: NEGATIVE_PROMPT.to_string(),
        }
    }
}

impl PredictionRequest {
    pub fn new(model_version: &str, input: PredictionInput) -> Self {
        Self {
            version: model_version.to_string(),
            input,
        }
    }
}
