#![allow(clippy::unwrap_used)]

mod common;

use common::{client_for, manifest, mount_status_sequence, requests_to, SKILL_ID, VENDOR_ID};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use smapi::api::{ClientError, PollOutcome, WithdrawReason};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_rate_limited_request_is_resent_unchanged() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v1");

    Mock::given(method("POST"))
        .and(path("/v1/skills"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "message": "slow down" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/skills"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "skillId": SKILL_ID })))
        .mount(&server)
        .await;

    let created = client.skills().create(VENDOR_ID, manifest()).await.unwrap();
    assert_eq!(created.get("skillId"), Some(json!(SKILL_ID)));

    let requests = requests_to(&server, "/v1/skills").await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, requests[1].url);
    assert_eq!(
        requests[0].body_json::<Value>().unwrap(),
        requests[1].body_json::<Value>().unwrap()
    );
}

#[tokio::test]
async fn test_rate_limit_retry_waits_for_the_interval() {
    let server = MockServer::start().await;
    let mut client = client_for(&server, "v1");
    let mut retry = client.retry_settings().clone();
    retry.rate_limit.interval = Duration::from_millis(150);
    client.set_retry_settings(retry);

    Mock::given(method("GET"))
        .and(path("/v1/vendors"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/vendors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vendors": [] })))
        .mount(&server)
        .await;

    let started = Instant::now();
    client.vendors().list().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(150));
    assert_eq!(requests_to(&server, "/v1/vendors").await.len(), 2);
}

#[tokio::test]
async fn test_rate_limit_budget_is_bounded() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v1");

    Mock::given(method("GET"))
        .and(path("/v1/vendors"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let error = client.vendors().list().await.unwrap_err();
    assert_eq!(error.status(), Some(429));
    assert!(error.is_rate_limited());

    let attempts = client.retry_settings().rate_limit.max_attempts;
    assert_eq!(requests_to(&server, "/v1/vendors").await.len(), attempts);
}

#[tokio::test]
async fn test_other_failures_are_not_retried() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v1");

    Mock::given(method("GET"))
        .and(path("/v1/vendors"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client.vendors().list().await.unwrap_err();
    let operation = error.as_operation().unwrap();
    assert_eq!(operation.status, 500);
    assert_eq!(operation.data, json!("upstream exploded"));
}

#[tokio::test]
async fn test_poll_stops_at_budget_with_last_payload() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v1");
    let status_path = format!("/v1/skills/{SKILL_ID}/status");
    let pending = common::skill_status("v1", "IN_PROGRESS");

    mount_status_sequence(&server, &status_path, 0, Value::Null, pending.clone()).await;

    let outcome = client.wait_for_skill(SKILL_ID).await.unwrap();
    assert_eq!(outcome, PollOutcome::Exhausted(Some(pending)));

    let attempts = client.retry_settings().build.max_attempts;
    assert_eq!(requests_to(&server, &status_path).await.len(), attempts);
}

#[tokio::test]
async fn test_poll_treats_missing_status_as_pending() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v1");
    let status_path = format!("/v1/skills/{SKILL_ID}/status");

    mount_status_sequence(
        &server,
        &status_path,
        2,
        json!({ "manifest": {} }),
        common::skill_status("v1", "SUCCEEDED"),
    )
    .await;

    let outcome = client.wait_for_skill(SKILL_ID).await.unwrap();
    assert!(outcome.is_ready());
    assert_eq!(requests_to(&server, &status_path).await.len(), 3);
}

#[tokio::test]
async fn test_poll_settles_on_first_terminal_status() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v1");
    let status_path = format!("/v1/skills/{SKILL_ID}/status");
    let succeeded = common::skill_status("v1", "SUCCEEDED");

    Mock::given(method("GET"))
        .and(path(status_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded.clone()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(status_path.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::skill_status("v1", "IN_PROGRESS")),
        )
        .mount(&server)
        .await;

    let outcome = client.wait_for_skill(SKILL_ID).await.unwrap();
    assert_eq!(outcome, PollOutcome::Ready(succeeded));
    assert_eq!(requests_to(&server, &status_path).await.len(), 1);
}

#[tokio::test]
async fn test_poll_stops_on_failed_build() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v0");
    let status_path = format!("/v0/skills/{SKILL_ID}/status");
    let failed = common::skill_status("v0", "FAILED");

    mount_status_sequence(&server, &status_path, 0, Value::Null, failed.clone()).await;

    let outcome = client.wait_for_skill(SKILL_ID).await.unwrap();
    assert_eq!(outcome, PollOutcome::Failed(failed));
    assert_eq!(requests_to(&server, &status_path).await.len(), 1);
}

#[tokio::test]
async fn test_poll_propagates_status_errors() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v1");
    let status_path = format!("/v1/skills/{SKILL_ID}/status");

    Mock::given(method("GET"))
        .and(path(status_path.as_str()))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden" })))
        .expect(1)
        .mount(&server)
        .await;

    let error = client.wait_for_skill(SKILL_ID).await.unwrap_err();
    assert!(matches!(error, ClientError::Operation(ref e) if e.status == 403));
}

#[tokio::test]
async fn test_rate_limits_during_poll_do_not_consume_build_attempts() {
    let server = MockServer::start().await;
    let mut client = client_for(&server, "v1");
    let mut retry = client.retry_settings().clone();
    retry.build.max_attempts = 1;
    client.set_retry_settings(retry);

    let status_path = format!("/v1/skills/{SKILL_ID}/status");
    Mock::given(method("GET"))
        .and(path(status_path.as_str()))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_status_sequence(
        &server,
        &status_path,
        0,
        Value::Null,
        common::skill_status("v1", "SUCCEEDED"),
    )
    .await;

    let outcome = client.wait_for_skill(SKILL_ID).await.unwrap();
    assert!(outcome.is_ready());
    assert_eq!(requests_to(&server, &status_path).await.len(), 3);
}

#[tokio::test]
async fn test_withdraw_waits_until_accepted() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v1");
    let withdraw_path = format!("/v1/skills/{SKILL_ID}/withdraw");

    Mock::given(method("POST"))
        .and(path(withdraw_path.as_str()))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Skill is in certification" })),
        )
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(withdraw_path.as_str()))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client
        .skill_certification()
        .withdraw_and_wait(SKILL_ID, WithdrawReason::Other, "found a bug")
        .await
        .unwrap();
    assert!(result.is_empty());

    let requests = requests_to(&server, &withdraw_path).await;
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[2].body_json::<Value>().unwrap(),
        json!({ "reason": "OTHER", "message": "found a bug" })
    );
}

#[tokio::test]
async fn test_withdraw_gives_up_after_long_wait_budget() {
    let server = MockServer::start().await;
    let client = client_for(&server, "v1");
    let withdraw_path = format!("/v1/skills/{SKILL_ID}/withdraw");

    Mock::given(method("POST"))
        .and(path(withdraw_path.as_str()))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let error = client
        .skill_certification()
        .withdraw_and_wait(SKILL_ID, WithdrawReason::TestSkill, "test build")
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(409));

    let attempts = client.retry_settings().long_wait.max_attempts;
    assert_eq!(requests_to(&server, &withdraw_path).await.len(), attempts);
}
