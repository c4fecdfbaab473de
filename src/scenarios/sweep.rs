//! One paced request per endpoint so each shows up in the server log.

use serde_json::json;

use crate::probe::compat::{AudioQuery, SpeakerList, SYNTHESIS_PATH};
use crate::probe::legacy::NarratorList;
use crate::probe::ProbeRequest;
use crate::utils::formatting::{format_bytes, format_duration};
use super::outcome::ScenarioOutcome;
use super::runner::Runner;

pub async fn run(runner: &mut Runner<'_>) {
    runner.started("sweep");
    runner.reporter().section("Endpoint sweep");
    runner.reporter().note("check the server log for one entry per request");

    let text = runner.config().compat.sample_text.clone();
    let speaker = runner.config().compat.probe_speaker;
    let steps = [
        ("sweep speakers", SpeakerList::request()),
        ("sweep audio_query", AudioQuery::request(&text, speaker)),
        ("sweep narrators", NarratorList::request(&runner.legacy_paths())),
        (
            "sweep synthesis",
            ProbeRequest::post(SYNTHESIS_PATH)
                .query("speaker", speaker)
                .json_value(json!({"text": "テスト", "speed": 100, "pitch": 0})),
        ),
    ];

    for (index, (name, request)) in steps.iter().enumerate() {
        if index > 0 {
            runner.pace(runner.config().pacing.sweep()).await;
        }
        let outcome = match runner.probe(request).await {
            Ok(result) => {
                let detail = format!(
                    "HTTP {}, {}, {} in {}",
                    result.status(),
                    if result.content_type().is_empty() { "no content type" } else { result.content_type() },
                    format_bytes(result.bytes().len()),
                    format_duration(result.elapsed_ms()),
                );
                if result.is_success() {
                    ScenarioOutcome::passed(*name, detail)
                } else {
                    ScenarioOutcome::failed(*name, detail)
                }
            }
            Err(e) => ScenarioOutcome::failed(*name, e.to_string()),
        };
        runner.record(outcome);
    }
}
