//! Completion polling.
//!
//! Three fixed-interval retry loops with distinct triggers:
//!
//! * [`poll_until_terminal`] re-issues a status check while the payload
//!   reports a non-terminal status,
//! * [`retry_on_rate_limit`] repeats a call that failed with 429,
//! * [`wait_for_success`] repeats a slow operation until it stops failing.
//!
//! Each takes its own [`RetryPolicy`]; budgets are never shared.

use std::{future::Future, time::Duration};

use backon::{ConstantBuilder, Retryable};
use serde_json::Value;

use super::{
    errors::ClientError,
    response::OperationResult,
    types::{PollOutcome, PollState, PollTarget},
};
use crate::{config::RetryPolicy, version::ApiVersion};

enum Status {
    InProgress(Value),
    Finished(ClientError),
}

const fn is_in_progress(status: &Status) -> bool {
    match status {
        Status::InProgress(_) => true,
        Status::Finished(_) => false,
    }
}

fn constant(policy: &RetryPolicy) -> ConstantBuilder {
    ConstantBuilder::default()
        .with_delay(policy.interval)
        .with_max_times(policy.retries())
}

/// Re-issues `check` until `target` reaches a terminal status or the
/// policy's attempts run out.
///
/// # Errors
///
/// Errors from `check` are returned unchanged, as is `Unsupported` for a
/// target the version cannot poll. Exhaustion is reported as
/// [`PollOutcome::Exhausted`].
pub async fn poll_until_terminal<F, Fut>(
    policy: &RetryPolicy,
    version: ApiVersion,
    target: &PollTarget,
    mut check: F,
) -> Result<PollOutcome, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<OperationResult, ClientError>>,
{
    target.status_pointer(version)?;

    let fetch = || {
        let call = check();
        async move {
            let payload = call.await.map_err(Status::Finished)?.to_value();

            match target.classify(version, &payload).map_err(Status::Finished)? {
                PollState::Ready => Ok(PollOutcome::Ready(payload)),
                PollState::Failed => Ok(PollOutcome::Failed(payload)),
                state @ PollState::Pending(_) => {
                    log::debug!("{target}: {state}");
                    Err(Status::InProgress(payload))
                }
            }
        }
    };

    let result = fetch
        .retry(constant(policy))
        .sleep(tokio::time::sleep)
        .when(is_in_progress)
        .notify(|_: &Status, dur: Duration| {
            log::debug!("{target} didn't finish, checking again in {dur:?}");
        })
        .await;

    match result {
        Ok(outcome) => {
            log::info!(
                "{target} finished: {}",
                if outcome.is_ready() { "ready" } else { "failed" }
            );
            Ok(outcome)
        }
        Err(Status::InProgress(last)) => {
            log::info!(
                "{target} still pending after {} attempts",
                policy.max_attempts.max(1)
            );
            Ok(PollOutcome::Exhausted(Some(last)))
        }
        Err(Status::Finished(e)) => Err(e),
    }
}

/// Repeats `call` after `policy.interval` whenever it fails with 429.
///
/// `call` is re-invoked as-is, so the request is resent unchanged.
///
/// # Errors
///
/// Any non-429 error straight away; the last 429 once attempts run out.
pub async fn retry_on_rate_limit<T, F, Fut>(policy: &RetryPolicy, call: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    call.retry(constant(policy))
        .sleep(tokio::time::sleep)
        .when(ClientError::is_rate_limited)
        .notify(|_: &ClientError, dur: Duration| {
            log::warn!("Rate limited, retrying in {dur:?}");
        })
        .await
}

/// Repeats `call` until it succeeds, sleeping `policy.interval` between
/// attempts.
///
/// Every failure whose status is not exactly 200 is retried, whatever its
/// payload says. Meant for rare operations that tolerate long waits.
///
/// # Errors
///
/// The last failure once attempts run out.
pub async fn wait_for_success<T, F, Fut>(policy: &RetryPolicy, call: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    call.retry(constant(policy))
        .sleep(tokio::time::sleep)
        .when(|e: &ClientError| e.status() != Some(200))
        .notify(|e: &ClientError, dur: Duration| {
            log::warn!("Still waiting ({e}), retrying in {dur:?}");
        })
        .await
}
