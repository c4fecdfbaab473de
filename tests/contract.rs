mod common;

use serde_json::json;
use voiceprobe::reporting::Reporter;
use voiceprobe::scenarios::{contract, body_variants, OutcomeStatus, RunLog, Runner};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn unprocessable(loc: serde_json::Value, msg: &str) -> ResponseTemplate {
    ResponseTemplate::new(422).set_body_json(json!({
        "detail": [{"loc": loc, "msg": msg, "type": "value_error"}]
    }))
}

async fn mount_common(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/speakers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Moca", "speaker_uuid": "u1", "styles": [{"id": 1, "name": "normal"}]}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(server)
        .await;
}

async fn run_contract(server: &MockServer) -> RunLog {
    let config = common::config_for(&server.uri());
    let client = common::direct_client(&server.uri());
    let mut runner = Runner::new(&client, &config, None, Reporter::new(true));
    contract::run(&mut runner).await;
    runner.into_log()
}

#[tokio::test]
async fn test_structured_422_contract_passes() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    Mock::given(method("POST"))
        .and(path("/audio_query"))
        .and(query_param("speaker", "99999"))
        .respond_with(unprocessable(json!(["query", "speaker"]), "Speaker not found"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/audio_query"))
        .respond_with(unprocessable(json!(["query", "text"]), "Field required"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/synthesis"))
        .respond_with(unprocessable(json!(["body", "accent_phrases"]), "Input should be a valid list"))
        .mount(&server)
        .await;

    let log = run_contract(&server).await;

    assert_eq!(log.len(), 5);
    assert_eq!(log.count(OutcomeStatus::Passed), 5, "{:?}", log.outcomes());
}

#[tokio::test]
async fn test_unstructured_rejection_fails_contract() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    Mock::given(method("POST"))
        .and(path("/audio_query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad request"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/synthesis"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": []})))
        .mount(&server)
        .await;

    let log = run_contract(&server).await;

    let missing_text = log.find("audio_query without text → 422").unwrap();
    assert_eq!(missing_text.status, OutcomeStatus::Failed);
    assert!(missing_text.detail.contains("expected HTTP 422, got 400"));
    let synthesis = log.find("synthesis unknown speaker → 422").unwrap();
    assert_eq!(synthesis.status, OutcomeStatus::Failed);
    assert!(synthesis.detail.contains("empty"));
    assert_eq!(log.find("docs/ reachable").unwrap().status, OutcomeStatus::Passed);
}

#[tokio::test]
async fn test_body_variants_record_each_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio_query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"outputSamplingRate": 44100})))
        .expect(3)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri());
    let client = common::direct_client(&server.uri());
    let mut runner = Runner::new(&client, &config, None, Reporter::new(true));
    body_variants::run(&mut runner).await;
    let log = runner.into_log();

    assert_eq!(log.len(), 3);
    assert!(log.outcomes().iter().all(|o| o.detail == "HTTP 200, sampling rate 44100Hz"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, b"null");
    assert!(requests[1].body.is_empty());
    assert_eq!(
        requests[1].headers.get("content-type").map(|v| v.to_str().unwrap()),
        Some("application/json")
    );
    assert!(requests[2].headers.get("content-type").is_none());
}
