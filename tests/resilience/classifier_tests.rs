// Error classification and rate-limit helper tests

use logwarden_core::config::RetryConfig;
use logwarden_core::resilience::{ErrorKind, RetryPolicy, classify, retry_rate_limited};
use logwarden_core::transport::TransportError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

const RATE_LIMIT: &[&str] = &[
    "too many requests",
    "throttling",
    "throttled",
    "rate exceeded",
    "serviceunavailableexception",
];

const TOOL_MISMATCH: &[&str] = &["toolresult blocks", "tooluse blocks", "exceeds the number"];

fn variants(marker: &str) -> Vec<String> {
    vec![
        marker.to_string(),
        marker.to_uppercase(),
        format!("An error occurred: {marker} (request id 42)"),
        format!("prefix-{}-suffix", marker.to_uppercase()),
    ]
}

#[test]
fn every_rate_limit_marker_in_any_case() {
    for marker in RATE_LIMIT {
        for text in variants(marker) {
            assert_eq!(classify(&text), ErrorKind::RateLimited, "{text}");
        }
    }
}

#[test]
fn every_tool_mismatch_marker_in_any_case() {
    for marker in TOOL_MISMATCH {
        for text in variants(marker) {
            assert_eq!(classify(&text), ErrorKind::ToolMismatch, "{text}");
        }
    }
}

#[test]
fn tool_mismatch_dominates_combined_text() {
    for rate in RATE_LIMIT {
        for mismatch in TOOL_MISMATCH {
            let text = format!("{rate}; {mismatch}");
            assert_eq!(classify(&text), ErrorKind::ToolMismatch, "{text}");
        }
    }
}

#[test]
fn unrelated_errors_are_fatal() {
    for text in [
        "ValidationException: model identifier is invalid",
        "ResourceNotFoundException: log group does not exist",
        "connection reset by peer",
    ] {
        assert_eq!(classify(text), ErrorKind::Fatal, "{text}");
    }
}

#[tokio::test(start_paused = true)]
async fn helper_retries_only_rate_limited_failures() {
    let policy = RetryPolicy::new(RetryConfig::default().with_jitter(false)).expect("policy");
    let calls = Arc::new(AtomicU32::new(0));

    let result = retry_rate_limited(&policy, || {
        let calls = calls.clone();
        async move {
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 => Err(TransportError::new("Too Many Requests")),
                1 => Err(TransportError::new("ResourceNotFoundException")),
                _ => Ok(()),
            }
        }
    })
    .await;

    assert_eq!(
        result.expect_err("fatal propagates").message(),
        "ResourceNotFoundException"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
