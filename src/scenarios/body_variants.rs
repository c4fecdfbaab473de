//! `/audio_query` with the body shapes browser clients send alongside the
//! query parameters: a literal `null`, an empty JSON body, and no body.

use crate::probe::compat::AudioQuery;
use crate::probe::ProbeResult;
use super::outcome::ScenarioOutcome;
use super::runner::Runner;

const JSON: &str = "application/json";

pub async fn run(runner: &mut Runner<'_>) {
    runner.started("body-variants");
    runner.reporter().section("audio_query body variants");

    let text = runner.config().compat.sample_text.clone();
    let speaker = runner.config().compat.probe_speaker;
    let base = AudioQuery::request(&text, speaker);

    let variants = [
        ("null JSON body", base.clone().raw("null", Some(JSON))),
        ("empty JSON body", base.clone().raw("", Some(JSON))),
        ("no body", base),
    ];

    for (index, (name, request)) in variants.iter().enumerate() {
        if index > 0 {
            runner.pace(runner.config().pacing.sweep()).await;
        }
        let outcome = match runner.probe(request).await {
            Ok(result) => variant_outcome(name, &result),
            Err(e) => ScenarioOutcome::failed(*name, e.to_string()),
        };
        runner.record(outcome);
    }
}

fn variant_outcome(name: &str, result: &ProbeResult) -> ScenarioOutcome {
    if !result.is_success() {
        return ScenarioOutcome::failed(name, format!("HTTP {}: {}", result.status(), result.snippet()));
    }
    match AudioQuery::from_result(result) {
        Ok(query) => ScenarioOutcome::passed(
            name,
            format!(
                "HTTP {}, sampling rate {}",
                result.status(),
                query.output_sampling_rate().map_or("unknown".to_string(), |r| format!("{}Hz", r)),
            ),
        ),
        Err(e) => ScenarioOutcome::failed(name, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::OutcomeStatus;

    #[test]
    fn test_variant_outcome_reports_sampling_rate() {
        let result = ProbeResult::new(200, JSON, br#"{"outputSamplingRate":24000}"#.to_vec(), 1);
        let outcome = variant_outcome("null JSON body", &result);
        assert_eq!(outcome.status, OutcomeStatus::Passed);
        assert_eq!(outcome.detail, "HTTP 200, sampling rate 24000Hz");
    }

    #[test]
    fn test_variant_outcome_rejection() {
        let result = ProbeResult::new(422, JSON, br#"{"detail":[]}"#.to_vec(), 1);
        assert_eq!(variant_outcome("no body", &result).status, OutcomeStatus::Failed);
    }
}
