mod common;

use std::net::TcpListener;

use serde_json::json;
use voiceprobe::cli::security::{connect_targets, PlannedTarget};
use voiceprobe::config::{HarnessConfig, TransportKind};
use voiceprobe::errors::HarnessError;
use voiceprobe::reporting::Reporter;
use voiceprobe::scenarios::{security, OutcomeStatus, RunLog, Runner};
use voiceprobe::scoring::{Grade, Scorecard, SecurityCategory};
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Listings and the basic synthesis succeed; `attack` answers everything else
/// and `burst` answers the rate-limit burst.
async fn mount_target(server: &MockServer, attack: ResponseTemplate, burst: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/narrators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"narrators": ["Miyamai Moca"]})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/emotions/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"emotions": ["honwaka", "angry"]})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/synthesize"))
        .and(body_string_contains("レート制限テスト"))
        .respond_with(burst)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/synthesize"))
        .and(body_string_contains("これはテスト音声です。"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(common::wav(), "audio/wav"))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/synthesize"))
        .respond_with(attack)
        .mount(server)
        .await;
}

async fn run_security(server: &MockServer, config: &HarnessConfig) -> (Scorecard, RunLog) {
    let client = common::direct_client(&server.uri());
    let mut runner = Runner::new(&client, config, None, Reporter::new(true));
    let card = security::run(&mut runner).await;
    (card, runner.into_log())
}

fn too_many_requests() -> ResponseTemplate {
    ResponseTemplate::new(429).set_body_json(json!({"error": "rate_limit", "message": "リクエスト制限を超えました"}))
}

#[tokio::test]
async fn test_hardened_target_scores_outstanding() {
    let server = MockServer::start().await;
    mount_target(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_input"})),
        too_many_requests(),
    )
    .await;

    let config = common::config_for(&server.uri());
    let (card, log) = run_security(&server, &config).await;

    for tally in card.tallies() {
        assert_eq!(tally.passed, tally.expected, "{}", tally.category);
    }
    assert_eq!(card.total_expected(), 29);
    assert_eq!(card.overall_percentage(), 100.0);
    assert_eq!(card.grade(), Grade::Outstanding);
    assert_eq!(log.find("rate limit burst").unwrap().detail, "10/10 requests rate limited");
}

#[tokio::test]
async fn test_rate_limit_credit_is_capped() {
    let server = MockServer::start().await;
    mount_target(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_input"})),
        too_many_requests(),
    )
    .await;

    let mut config = common::config_for(&server.uri());
    config.scoring.burst_size = 25;
    let (card, _) = run_security(&server, &config).await;

    let tally = card.tally(SecurityCategory::RateLimiting).unwrap();
    assert_eq!(tally.passed, 3);
    assert_eq!(tally.percentage(), 100.0);
}

#[tokio::test]
async fn test_accepting_target_fails_every_attack() {
    let server = MockServer::start().await;
    let wav = || ResponseTemplate::new(200).set_body_raw(common::wav(), "audio/wav");
    mount_target(&server, wav(), wav()).await;

    let config = common::config_for(&server.uri());
    let (card, log) = run_security(&server, &config).await;

    assert_eq!(card.tally(SecurityCategory::BasicFunctionality).unwrap().passed, 3);
    assert_eq!(card.total_passed(), 3);
    assert_eq!(card.grade(), Grade::NeedsImprovement);
    assert_eq!(log.find("rate limit burst").unwrap().status, OutcomeStatus::Failed);
    assert!(log
        .outcomes()
        .iter()
        .filter(|o| o.name.starts_with("xss_attacks"))
        .all(|o| o.detail.contains("payload accepted")));
}

#[tokio::test]
async fn test_rate_limited_attacks_follow_policy() {
    let server = MockServer::start().await;
    mount_target(&server, too_many_requests(), too_many_requests()).await;

    let config = common::config_for(&server.uri());
    let (counted, _) = run_security(&server, &config).await;
    assert_eq!(counted.overall_percentage(), 100.0);

    let mut strict = common::config_for(&server.uri());
    strict.scoring.rate_limit_counts_as_pass = false;
    let (card, log) = run_security(&server, &strict).await;

    let injection = card.tally(SecurityCategory::InjectionAttacks).unwrap();
    assert_eq!(injection.passed, 0);
    assert_eq!(injection.rate_limited, 8);
    // basic 3 + rate limiting 3 out of 29
    assert_eq!(card.total_passed(), 6);
    assert_eq!(card.grade(), Grade::NeedsImprovement);
    assert!(log
        .outcomes()
        .iter()
        .filter(|o| o.name.starts_with("injection_attacks"))
        .all(|o| o.rate_limited && o.status == OutcomeStatus::Failed));
}

#[tokio::test]
async fn test_status_without_json_still_counts_as_rejection() {
    let server = MockServer::start().await;
    mount_target(
        &server,
        ResponseTemplate::new(422).set_body_string("Unprocessable"),
        ResponseTemplate::new(200).set_body_raw(common::wav(), "audio/wav"),
    )
    .await;

    let config = common::config_for(&server.uri());
    let (card, _) = run_security(&server, &config).await;

    assert_eq!(card.tally(SecurityCategory::NumericAttacks).unwrap().passed, 4);
    assert_eq!(card.tally(SecurityCategory::RateLimiting).unwrap().passed, 0);
    // 26 of 29
    assert_eq!(card.grade(), Grade::Excellent);
}

fn direct_target(url: String) -> PlannedTarget {
    PlannedTarget { url, transport: TransportKind::Direct }
}

#[tokio::test]
async fn test_dead_second_target_stops_before_any_suite() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/narrators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"narrators": ["Miyamai Moca"]})))
        .mount(&server)
        .await;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    drop(listener);

    let config = common::config_for(&server.uri());
    let targets = vec![direct_target(server.uri()), direct_target(dead)];
    let err = connect_targets(&targets, &config).await.unwrap_err();
    assert!(matches!(err, HarnessError::Connectivity(_)), "{:?}", err);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/api/narrators");
}

#[tokio::test]
async fn test_every_live_target_gets_a_client() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    for server in [&first, &second] {
        Mock::given(method("GET"))
            .and(path("/api/narrators"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(server)
            .await;
    }

    let config = common::config_for(&first.uri());
    let targets = vec![direct_target(first.uri()), direct_target(second.uri())];
    let clients = connect_targets(&targets, &config).await.unwrap();

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[1].transport_name(), "direct");
}
