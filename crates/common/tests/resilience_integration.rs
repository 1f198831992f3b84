//! Integration tests for resilience module
//!
//! Drives a hand-rolled retry loop with `RetryConfig` and `RetryPolicy` the
//! way the request pipeline does, and checks single-flight coalescing under
//! concurrent load.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use envase_common::resilience::policies::PredicateRetry;
use envase_common::{RetryConfig, RetryDecision, RetryPolicy, SingleFlight};

#[derive(Debug, Clone, PartialEq)]
struct StatusError(u16);

async fn run_with_retries<F>(
    config: RetryConfig,
    policy: &dyn RetryPolicy<StatusError>,
    mut op: F,
) -> (Result<&'static str, StatusError>, u32)
where
    F: FnMut(u32) -> Result<&'static str, StatusError>,
{
    let mut retries = 0;
    loop {
        match op(retries) {
            Ok(value) => return (Ok(value), retries + 1),
            Err(err) => {
                let retry = config.allows_retry(retries)
                    && policy.should_retry(&err, retries) == RetryDecision::Retry;
                if !retry {
                    return (Err(err), retries + 1);
                }
                retries += 1;
                tokio::time::sleep(config.delay_for(retries)).await;
            }
        }
    }
}

fn is_transient(err: &StatusError) -> bool {
    err.0 == 0 || err.0 == 429 || err.0 >= 500
}

/// Two transient failures then success: three attempts, with the backoff
/// schedule base + 2 * base between them.
#[tokio::test]
async fn recovers_after_transient_failures() {
    let config = RetryConfig::new(3, Duration::from_millis(20));
    let policy = PredicateRetry::new(is_transient);
    let started = Instant::now();

    let (result, attempts) = run_with_retries(config, &policy, |n| {
        if n < 2 {
            Err(StatusError(500))
        } else {
            Ok("done")
        }
    })
    .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(attempts, 3);
    assert!(started.elapsed() >= Duration::from_millis(60));
}

/// Persistent failures stop after max_retries + 1 attempts.
#[tokio::test]
async fn stops_when_budget_exhausted() {
    let config = RetryConfig::new(2, Duration::from_millis(1));
    let policy = PredicateRetry::new(is_transient);

    let (result, attempts) = run_with_retries(config, &policy, |_| Err(StatusError(503))).await;

    assert_eq!(result, Err(StatusError(503)));
    assert_eq!(attempts, config.max_attempts());
}

/// Non-transient failures are never retried.
#[tokio::test]
async fn client_errors_fail_fast() {
    let config = RetryConfig::new(5, Duration::from_millis(1));
    let policy = PredicateRetry::new(is_transient);

    let (result, attempts) = run_with_retries(config, &policy, |_| Err(StatusError(404))).await;

    assert_eq!(result, Err(StatusError(404)));
    assert_eq!(attempts, 1);
}

/// A burst of callers produces exactly one underlying execution and every
/// caller sees its result.
#[tokio::test]
async fn single_flight_under_burst() {
    let flight = Arc::new(SingleFlight::<Result<String, String>>::new());
    let executions = Arc::new(AtomicU32::new(0));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let flight = Arc::clone(&flight);
        let executions = Arc::clone(&executions);
        handles.push(tokio::spawn(async move {
            flight
                .run(move || async move {
                    executions.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok::<_, String>("fresh-token".to_string())
                })
                .await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok("fresh-token".to_string()));
    }
    assert_eq!(executions.load(Ordering::SeqCst), 1);
}
