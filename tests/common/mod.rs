#![allow(dead_code)]

use serde_json::{json, Value};
use smapi::{api::Client, ClientConfig, RetrySettings};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TOKEN: &str = "Atza|conformance-token";
pub const VENDOR_ID: &str = "vendor-1";
pub const SKILL_ID: &str = "amzn1.ask.skill.conformance";
pub const LOCALE: &str = "en-US";

/// Retry policies with millisecond intervals and small budgets.
pub fn fast_retry() -> RetrySettings {
    let mut retry = RetrySettings::default().with_interval(Duration::from_millis(5));
    retry.build.max_attempts = 5;
    retry.rate_limit.max_attempts = 3;
    retry.long_wait.max_attempts = 5;
    retry
}

pub fn client_for(server: &MockServer, version: &str) -> Client {
    Client::new(ClientConfig {
        version: Some(version.to_owned()),
        base_url: Some(server.uri()),
        token_url: format!("{}/auth/o2/token", server.uri()),
        access_token: Some(TOKEN.to_owned()),
        retry: fast_retry(),
        ..ClientConfig::default()
    })
    .unwrap()
}

pub fn manifest() -> Value {
    json!({
        "publishingInformation": {
            "locales": { LOCALE: { "name": "Conformance" } }
        },
        "apis": { "custom": {} }
    })
}

pub fn skill_status(version: &str, status: &str) -> Value {
    match version {
        "v0" => json!({ "manifest": { "lastModified": { "status": status } } }),
        _ => json!({ "manifest": { "lastUpdateRequest": { "status": status } } }),
    }
}

/// Serves `pending` non-terminal statuses, then `terminal` for good.
pub async fn mount_status_sequence(
    server: &MockServer,
    route: &str,
    pending: u64,
    pending_body: Value,
    terminal_body: Value,
) {
    if pending > 0 {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(pending_body))
            .up_to_n_times(pending)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(terminal_body))
        .mount(server)
        .await;
}

pub async fn requests_to(server: &MockServer, route: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == route)
        .collect()
}
