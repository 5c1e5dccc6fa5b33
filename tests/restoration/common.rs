// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures: a local stand-in for the predictions API and scripted quota backends

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use restoration_node::generation::{PollPolicy, ReplicateClient};
use restoration_node::quota::{QuotaDecision, QuotaError, QuotaGate, QuotaService};
use restoration_node::restoration::RestorationService;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_API_KEY: &str = "r8_test_key";
pub const TEST_MODEL_VERSION: &str = "test-version-123";

/// Behaviour of the fake predictions API
pub struct MockApiState {
    base_url: String,
    /// Status bodies served in order; the last one repeats
    statuses: Mutex<VecDeque<Value>>,
    /// Every submission body received
    pub submissions: Mutex<Vec<Value>>,
    /// Authorization headers seen on any call
    pub auth_headers: Mutex<Vec<String>>,
    pub polls: AtomicU32,
    /// Submission response override (status code, body)
    submit_reply: Mutex<Option<(u16, Value)>>,
}

pub struct MockGenerationApi {
    pub base_url: String,
    pub state: Arc<MockApiState>,
}

impl MockGenerationApi {
    /// Start a server that walks through `statuses` on successive polls
    pub async fn start(statuses: Vec<Value>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/v1", addr);

        let state = Arc::new(MockApiState {
            base_url: base_url.clone(),
            statuses: Mutex::new(statuses.into()),
            submissions: Mutex::new(Vec::new()),
            auth_headers: Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
            submit_reply: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/predictions", post(create_prediction))
            .route("/v1/predictions/:id", get(get_prediction))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, state }
    }

    /// Make the next submissions answer with `status` and `body`
    pub fn reply_to_submit_with(&self, status: u16, body: Value) {
        *self.state.submit_reply.lock().unwrap() = Some((status, body));
    }

    pub fn polls(&self) -> u32 {
        self.state.polls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<Value> {
        self.state.submissions.lock().unwrap().clone()
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.state.auth_headers.lock().unwrap().clone()
    }

    pub fn client(&self) -> ReplicateClient {
        ReplicateClient::new(&self.base_url, TEST_API_KEY, Duration::from_secs(5)).unwrap()
    }
}

fn record_auth(state: &MockApiState, headers: &HeaderMap) {
    if let Some(v) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.auth_headers.lock().unwrap().push(v.to_string());
    }
}

async fn create_prediction(
    State(state): State<Arc<MockApiState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_auth(&state, &headers);
    let n = {
        let mut subs = state.submissions.lock().unwrap();
        subs.push(body);
        subs.len()
    };

    let override_reply = state.submit_reply.lock().unwrap().clone();
    if let Some((status, reply)) = override_reply {
        let code = StatusCode::from_u16(status).unwrap();
        return (code, Json(reply)).into_response();
    }

    let id = format!("pred-{}", n);
    (
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "status": "starting",
            "urls": {
                "get": format!("{}/predictions/{}", state.base_url, id),
                "cancel": format!("{}/predictions/{}/cancel", state.base_url, id),
            },
            "output": null
        })),
    )
        .into_response()
}

async fn get_prediction(
    State(state): State<Arc<MockApiState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record_auth(&state, &headers);
    state.polls.fetch_add(1, Ordering::SeqCst);

    let mut statuses = state.statuses.lock().unwrap();
    let mut body = if statuses.len() > 1 {
        statuses.pop_front().unwrap()
    } else {
        statuses.front().cloned().unwrap_or_else(|| json!({"status": "processing"}))
    };
    body["id"] = json!(id);

    Json(body).into_response()
}

pub fn processing() -> Value {
    json!({"status": "processing", "output": null})
}

pub fn succeeded(output: Value) -> Value {
    json!({"status": "succeeded", "output": output})
}

pub fn failed() -> Value {
    json!({"status": "failed", "output": null, "error": "CUDA out of memory"})
}

pub fn fast_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(10),
        timeout: Some(Duration::from_secs(10)),
        max_attempts: None,
    }
}

/// Quota backend returning a fixed decision and recording identifiers
pub struct ScriptedQuota {
    decision: QuotaDecision,
    pub identifiers: Mutex<Vec<String>>,
}

impl ScriptedQuota {
    pub fn new(allowed: bool, limit: u64, remaining: u64) -> Arc<Self> {
        Arc::new(Self {
            decision: QuotaDecision {
                allowed,
                limit,
                remaining,
            },
            identifiers: Mutex::new(Vec::new()),
        })
    }

    pub fn identifiers(&self) -> Vec<String> {
        self.identifiers.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuotaService for ScriptedQuota {
    async fn limit(&self, identifier: &str) -> Result<QuotaDecision, QuotaError> {
        self.identifiers
            .lock()
            .unwrap()
            .push(identifier.to_string());
        Ok(self.decision)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Quota backend that is always down
pub struct BrokenQuota;

#[async_trait]
impl QuotaService for BrokenQuota {
    async fn limit(&self, _identifier: &str) -> Result<QuotaDecision, QuotaError> {
        Err(QuotaError::Backend {
            status: 500,
            message: "store offline".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

pub fn service(api: &MockGenerationApi, quota: QuotaGate) -> RestorationService {
    RestorationService::new(
        Arc::new(api.client()),
        quota,
        TEST_MODEL_VERSION,
        fast_policy(),
    )
}
