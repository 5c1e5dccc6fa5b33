// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::generation::GenerationError;
use crate::restoration::RestorationError;

/// Plain-text body returned with a 429
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "Too many uploads in 1 day. Please try again in a 24 hours.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    RateLimitExceeded { limit: u64, remaining: u64 },
    ServiceUnavailable(String),
    InternalError(String),
    Timeout { attempts: u32 },
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::RateLimitExceeded { limit, remaining } => {
                let mut details = HashMap::new();
                details.insert("limit".to_string(), serde_json::Value::from(*limit));
                details.insert("remaining".to_string(), serde_json::Value::from(*remaining));
                (
                    "rate_limit_exceeded",
                    QUOTA_EXCEEDED_MESSAGE.to_string(),
                    Some(details),
                )
            }
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
            ApiError::Timeout { attempts } => {
                let mut details = HashMap::new();
                details.insert("attempts".to_string(), serde_json::Value::from(*attempts));
                (
                    "timeout",
                    "Image restoration timed out".to_string(),
                    Some(details),
                )
            }
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            request_id,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::RateLimitExceeded { .. } => 429,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::InternalError(_) => 500,
            ApiError::Timeout { .. } => 504,
        }
    }

    /// Render as an HTTP response tagged with `request_id`
    pub fn into_response_with_id(self, request_id: Option<String>) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if let ApiError::RateLimitExceeded { limit, remaining } = self {
            let mut response = (status, QUOTA_EXCEEDED_MESSAGE).into_response();
            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", HeaderValue::from(limit));
            headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
            return response;
        }

        (status, Json(self.to_response(request_id))).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with_id(None)
    }
}

impl From<RestorationError> for ApiError {
    fn from(err: RestorationError) -> Self {
        match err {
            RestorationError::QuotaExceeded(decision) => ApiError::RateLimitExceeded {
                limit: decision.limit,
                remaining: decision.remaining,
            },
            RestorationError::InvalidImageUrl(msg) => ApiError::InvalidRequest(msg),
            RestorationError::Quota(e) => ApiError::InternalError(e.to_string()),
            RestorationError::Generation(GenerationError::Timeout { attempts, .. }) => {
                ApiError::Timeout { attempts }
            }
            RestorationError::Generation(GenerationError::Cancelled) => {
                ApiError::ServiceUnavailable("Service is shutting down".to_string())
            }
            RestorationError::Generation(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::RateLimitExceeded { limit, remaining } => write!(
                f,
                "Rate limit exceeded ({} of {} remaining)",
                remaining, limit
            ),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Timeout { attempts } => {
                write!(f, "Request timed out after {} polls", attempts)
            }
        }
    }
}

impl std::error::Error for ApiError {}
