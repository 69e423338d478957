//! End-to-end tests for the login / fetch / refresh flow against a mock API

use std::time::Duration;

use clap::Parser;
use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use glucocare_load_test::api::client::ApiClient;
use glucocare_load_test::api::types::TokenPair;
use glucocare_load_test::api::ApiError;
use glucocare_load_test::cli::{Cli, Scenario};
use glucocare_load_test::metrics::collector::MetricsCollector;
use glucocare_load_test::scenarios;
use glucocare_load_test::vu::VirtualUser;

const EMAIL: &str = "user@example.com";
const PASSWORD: &str = "secret-pass";

fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn token_pair(access: &str, refresh: &str) -> TokenPair {
    TokenPair {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }
}

fn test_vu(server: &MockServer, tokens: TokenPair, collector: MetricsCollector) -> VirtualUser {
    VirtualUser::new(
        0,
        api_client(server),
        tokens,
        1,
        Duration::ZERO,
        Duration::ZERO,
        collector,
    )
}

async fn mount_login(server: &MockServer, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/api/members/login"))
        .and(body_json(
            serde_json::json!({"email": EMAIL, "password": PASSWORD}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessToken": access,
            "refreshToken": refresh,
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_returns_token_pair() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;

    let client = api_client(&server);
    let tokens = client.login(EMAIL, PASSWORD).await.unwrap();

    assert_eq!(tokens.access_token, "access-1");
    assert_eq!(tokens.refresh_token, "refresh-1");
}

#[tokio::test]
async fn login_with_bad_credentials_is_a_setup_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/members/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = api_client(&server);
    let err = client.login(EMAIL, "wrong").await.unwrap_err();

    match err {
        ApiError::Status { endpoint, status } => {
            assert_eq!(endpoint, "login");
            assert_eq!(status.as_u16(), 401);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn malformed_login_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/members/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not-json"))
        .mount(&server)
        .await;

    let client = api_client(&server);
    let err = client.login(EMAIL, PASSWORD).await.unwrap_err();

    match err {
        ApiError::Decode { endpoint, .. } => assert_eq!(endpoint, "login"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn refresh_keeps_old_refresh_token_when_not_rotated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/members/refresh-token"))
        .and(body_json(serde_json::json!({"token": "refresh-1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"accessToken": "access-2"})),
        )
        .mount(&server)
        .await;

    let client = api_client(&server);
    let refreshed = client
        .refresh(&token_pair("stale", "refresh-1"))
        .await
        .unwrap();

    assert_eq!(refreshed.access_token, "access-2");
    assert_eq!(refreshed.refresh_token, "refresh-1");
}

#[tokio::test]
async fn fetch_with_valid_token_passes_the_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/patients/1/glucose-histories"))
        .and(bearer_token("access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let collector = MetricsCollector::new();
    let mut vu = test_vu(&server, token_pair("access-1", "refresh-1"), collector.clone());
    vu.run_iteration().await;

    let snapshot = collector.get_snapshot();
    assert_eq!(snapshot.request.started, 1);
    assert_eq!(snapshot.request.completed, 1);
    assert_eq!(snapshot.check.passed, 1);
    assert_eq!(snapshot.check.failed, 0);
    assert_eq!(snapshot.refresh.started, 0);
}

#[tokio::test]
async fn expired_token_refreshes_and_retries_exactly_once() {
    let server = MockServer::start().await;

    // Stale token is rejected, fresh token is accepted.
    Mock::given(method("GET"))
        .and(path("/api/patients/1/glucose-histories"))
        .and(bearer_token("stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/patients/1/glucose-histories"))
        .and(bearer_token("fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/members/refresh-token"))
        .and(body_json(serde_json::json!({"token": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessToken": "fresh",
            "refreshToken": "refresh-2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let collector = MetricsCollector::new();
    let mut vu = test_vu(&server, token_pair("stale", "refresh-1"), collector.clone());
    vu.run_iteration().await;

    let snapshot = collector.get_snapshot();
    // Two GETs: the rejected one and the authenticated retry.
    assert_eq!(snapshot.request.started, 2);
    assert_eq!(snapshot.request.completed, 2);
    assert_eq!(snapshot.refresh.started, 1);
    assert_eq!(snapshot.refresh.completed, 1);
    assert_eq!(snapshot.check.passed, 1);
    assert_eq!(snapshot.check.failed, 0);

    // The refreshed tokens stick for the next iteration.
    vu.run_iteration().await;
    let snapshot = collector.get_snapshot();
    assert_eq!(snapshot.refresh.started, 1);
    assert_eq!(snapshot.check.passed, 2);
}

#[tokio::test]
async fn failed_refresh_records_check_failure_without_retrying() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/patients/1/glucose-histories"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/members/refresh-token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let collector = MetricsCollector::new();
    let mut vu = test_vu(&server, token_pair("stale", "refresh-1"), collector.clone());
    vu.run_iteration().await;

    let snapshot = collector.get_snapshot();
    // No retry GET after the refresh fails.
    assert_eq!(snapshot.request.started, 1);
    assert_eq!(snapshot.refresh.started, 1);
    assert_eq!(snapshot.refresh.failed, 1);
    assert_eq!(snapshot.check.passed, 0);
    assert_eq!(snapshot.check.failed, 1);
}

#[tokio::test]
async fn smoke_scenario_runs_end_to_end() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    Mock::given(method("GET"))
        .and(path("/api/patients/1/glucose-histories"))
        .and(bearer_token("access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let cli = Cli::try_parse_from([
        "load-test",
        "--base-url",
        &server.uri(),
        "--email",
        EMAIL,
        "--password",
        PASSWORD,
        "--think-time-ms",
        "0",
        "smoke",
        "--iterations",
        "3",
    ])
    .unwrap();

    let args = match cli.scenario.clone() {
        Scenario::Smoke(args) => args,
        other => panic!("unexpected scenario: {:?}", other),
    };

    let summary = scenarios::smoke::run(cli, args).await.unwrap();
    assert_eq!(summary.checks_passed, 3);
    assert_eq!(summary.checks_failed, 0);
    assert!((summary.success_rate - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn smoke_scenario_fails_setup_on_bad_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/members/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let cli = Cli::try_parse_from([
        "load-test",
        "--base-url",
        &server.uri(),
        "smoke",
    ])
    .unwrap();

    let args = match cli.scenario.clone() {
        Scenario::Smoke(args) => args,
        other => panic!("unexpected scenario: {:?}", other),
    };

    let err = scenarios::smoke::run(cli, args).await.unwrap_err();
    assert!(err.to_string().contains("setup login failed"));
}
