// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for the status polling loop

use restoration_node::generation::{
    poll_until_terminal, GenerationError, GenerationOutcome, JobStatus, PollPolicy,
};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::common::{failed, fast_policy, processing, succeeded, MockGenerationApi};

fn status_url(api: &MockGenerationApi) -> String {
    format!("{}/predictions/pred-1", api.base_url)
}

#[tokio::test]
async fn test_stops_on_first_succeeded() {
    let api = MockGenerationApi::start(vec![succeeded(json!("http://x/result.png"))]).await;
    let client = api.client();

    let outcome = poll_until_terminal(
        &client,
        &status_url(&api),
        &fast_policy(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        outcome,
        GenerationOutcome::Success {
            output: json!("http://x/result.png")
        }
    );
    assert_eq!(api.polls(), 1);
}

#[tokio::test]
async fn test_stops_on_failed_without_result() {
    let api = MockGenerationApi::start(vec![processing(), failed()]).await;
    let client = api.client();

    let outcome = poll_until_terminal(
        &client,
        &status_url(&api),
        &fast_policy(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, GenerationOutcome::Failure);
    assert_eq!(api.polls(), 2);
}

#[tokio::test]
async fn test_keeps_polling_through_non_terminal_statuses() {
    let api = MockGenerationApi::start(vec![
        json!({"status": "starting"}),
        processing(),
        json!({"status": "queued"}),
        json!({"status": "canceled"}),
        succeeded(json!(["http://x/a.png", "http://x/b.png"])),
    ])
    .await;
    let client = api.client();

    let start = Instant::now();
    let outcome = poll_until_terminal(
        &client,
        &status_url(&api),
        &fast_policy(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(outcome.is_success());
    assert_eq!(api.polls(), 5);
    // four waits of 10ms between five polls
    assert!(start.elapsed() >= Duration::from_millis(40));
}

#[tokio::test]
async fn test_succeeded_without_output_is_failure() {
    let api = MockGenerationApi::start(vec![json!({"status": "succeeded", "output": null})]).await;
    let client = api.client();

    let outcome = poll_until_terminal(
        &client,
        &status_url(&api),
        &fast_policy(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, GenerationOutcome::Failure);
}

#[tokio::test]
async fn test_attempt_cap_yields_timeout() {
    let api = MockGenerationApi::start(vec![processing()]).await;
    let client = api.client();
    let policy = PollPolicy {
        interval: Duration::from_millis(5),
        timeout: None,
        max_attempts: Some(4),
    };

    let err = poll_until_terminal(&client, &status_url(&api), &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        GenerationError::Timeout {
            attempts,
            last_status,
            ..
        } => {
            assert_eq!(attempts, 4);
            assert_eq!(last_status, JobStatus::Processing);
        }
        other => panic!("expected Timeout, got {:?}", other),
    }
    assert_eq!(api.polls(), 4);
}

#[tokio::test]
async fn test_elapsed_timeout_yields_timeout() {
    let api = MockGenerationApi::start(vec![processing()]).await;
    let client = api.client();
    let policy = PollPolicy {
        interval: Duration::from_millis(20),
        timeout: Some(Duration::from_millis(100)),
        max_attempts: None,
    };

    let err = poll_until_terminal(&client, &status_url(&api), &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Timeout { .. }));
    assert!(api.polls() >= 2);
}

#[tokio::test]
async fn test_shutdown_cancels_wait() {
    let api = MockGenerationApi::start(vec![processing()]).await;
    let client = api.client();
    let policy = PollPolicy {
        interval: Duration::from_secs(60),
        timeout: None,
        max_attempts: None,
    };
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = poll_until_terminal(&client, &status_url(&api), &policy, &token)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(api.polls(), 1);
}

#[tokio::test]
async fn test_already_cancelled_does_not_poll() {
    let api = MockGenerationApi::start(vec![processing()]).await;
    let client = api.client();
    let token = CancellationToken::new();
    token.cancel();

    let err = poll_until_terminal(&client, &status_url(&api), &fast_policy(), &token)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Cancelled));
    assert_eq!(api.polls(), 0);
}
