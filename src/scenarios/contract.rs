//! Error contract of the compat endpoints: rejected input must come back as
//! 422 with a structured `detail` list.

use serde_json::json;

use crate::probe::compat::{docs_request, SpeakerList, AUDIO_QUERY_PATH, SYNTHESIS_PATH};
use crate::probe::ProbeRequest;
use crate::scoring::StructuredErrorMatcher;
use super::outcome::ScenarioOutcome;
use super::runner::Runner;

/// A speaker id no engine ships.
pub const UNKNOWN_SPEAKER: i64 = 99999;

pub async fn run(runner: &mut Runner<'_>) {
    runner.started("contract");
    runner.reporter().section("Compat error contract");

    match runner.probe(&SpeakerList::request()).await {
        Ok(result) => match SpeakerList::from_result(&result) {
            Ok(list) => runner.record(ScenarioOutcome::passed(
                "speakers is a JSON array",
                format!("{} speakers", list.speakers.len()),
            )),
            Err(e) => runner.record(ScenarioOutcome::failed("speakers is a JSON array", e.to_string())),
        },
        Err(e) => runner.record(ScenarioOutcome::failed("speakers is a JSON array", e.to_string())),
    }

    let cases = [
        (
            "audio_query without text → 422",
            ProbeRequest::post(AUDIO_QUERY_PATH).query("speaker", 0).form(&[]),
        ),
        (
            "audio_query unknown speaker → 422",
            ProbeRequest::post(AUDIO_QUERY_PATH)
                .query("speaker", UNKNOWN_SPEAKER)
                .form(&[("text", "test")]),
        ),
        (
            "synthesis unknown speaker → 422",
            ProbeRequest::post(SYNTHESIS_PATH)
                .query("speaker", UNKNOWN_SPEAKER)
                .json_value(json!({"accent_phrases": "invalid"})),
        ),
    ];
    for (name, request) in cases {
        runner.check(name, &request, &StructuredErrorMatcher).await;
    }

    match runner.probe(&docs_request(true)).await {
        Ok(result) if result.status() == 200 => {
            runner.record(ScenarioOutcome::passed("docs/ reachable", "HTTP 200"))
        }
        Ok(result) => runner.record(ScenarioOutcome::failed(
            "docs/ reachable",
            format!("HTTP {}", result.status()),
        )),
        Err(e) => runner.record(ScenarioOutcome::failed("docs/ reachable", e.to_string())),
    }
}
