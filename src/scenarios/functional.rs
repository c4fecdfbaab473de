//! Legacy-contract functional run: listings, synthesis variants, error cases.

use crate::payloads::MAX_TEXT_CHARS;
use crate::probe::legacy::{EmotionList, NarratorList, SynthesisRequest};
use crate::reporting::renderer::render_list;
use crate::scoring::ClientErrorMatcher;
use super::outcome::ScenarioOutcome;
use super::runner::Runner;

const LISTING_PREVIEW: usize = 5;

/// Fetch `{prefix}/narrators` and record the step. Empty lists fail.
pub async fn list_narrators(runner: &mut Runner<'_>, step: &str) -> Vec<String> {
    let request = NarratorList::request(&runner.legacy_paths());
    let result = match runner.probe(&request).await {
        Ok(result) => result,
        Err(e) => {
            runner.record(ScenarioOutcome::failed(step, e.to_string()));
            return Vec::new();
        }
    };
    match NarratorList::from_result(&result) {
        Ok(list) if list.narrators.is_empty() => {
            runner.record(ScenarioOutcome::failed(step, "no narrators listed"));
            Vec::new()
        }
        Ok(list) => {
            runner.record(ScenarioOutcome::passed(step, format!("{} narrators", list.narrators.len())));
            runner.reporter().note(render_list(&list.narrators, LISTING_PREVIEW));
            list.narrators
        }
        Err(e) => {
            runner.record(ScenarioOutcome::failed(step, e.to_string()));
            Vec::new()
        }
    }
}

/// Fetch `{prefix}/emotions` for the default narrator and record the step.
pub async fn list_emotions(runner: &mut Runner<'_>, step: &str) -> Vec<String> {
    let request = EmotionList::request(&runner.legacy_paths(), None);
    let result = match runner.probe(&request).await {
        Ok(result) => result,
        Err(e) => {
            runner.record(ScenarioOutcome::failed(step, e.to_string()));
            return Vec::new();
        }
    };
    match EmotionList::from_result(&result) {
        Ok(list) if list.emotions.is_empty() => {
            runner.record(ScenarioOutcome::failed(step, "no emotions listed"));
            Vec::new()
        }
        Ok(list) => {
            runner.record(ScenarioOutcome::passed(step, format!("{} emotions", list.emotions.len())));
            runner.reporter().note(render_list(&list.emotions, LISTING_PREVIEW));
            list.emotions
        }
        Err(e) => {
            runner.record(ScenarioOutcome::failed(step, e.to_string()));
            Vec::new()
        }
    }
}

pub async fn run(runner: &mut Runner<'_>) {
    runner.started("functional");

    runner.reporter().section("Listings");
    list_narrators(runner, "narrators").await;
    let emotions = list_emotions(runner, "emotions").await;

    runner.reporter().section("Synthesis");
    let sample = runner.config().legacy.sample_text.clone();
    if let Some(request) = runner.synthesis_probe("basic synthesis", SynthesisRequest::text(sample)) {
        runner.check_audio("basic synthesis", &request, "test_basic.wav").await;
    }

    // The emotion comes from the fetched list, never a literal
    match emotions.first() {
        Some(emotion) => {
            let body = SynthesisRequest::text(format!("今度は{}の感情でテストします", emotion)).with_emotion(emotion.as_str());
            if let Some(request) = runner.synthesis_probe("emotion synthesis", body) {
                let artifact = format!("test_emotion_{}.wav", emotion);
                runner.check_audio("emotion synthesis", &request, &artifact).await;
            }
        }
        None => runner.record(ScenarioOutcome::skipped("emotion synthesis", "no emotions available")),
    }

    let body = SynthesisRequest::text("今度は音声オプションを指定してテストします")
        .with_speed(120)
        .with_pitch(-30);
    if let Some(request) = runner.synthesis_probe("option synthesis", body) {
        runner.check_audio("option synthesis", &request, "test_options.wav").await;
    }

    runner.reporter().section("Error cases");
    let error_cases = [
        ("error: empty text", SynthesisRequest::text("")),
        (
            "error: text over limit",
            SynthesisRequest::text("あ".repeat(MAX_TEXT_CHARS + 1)),
        ),
        (
            "error: unknown emotion",
            SynthesisRequest::text("無効な感情でテストします").with_emotion("invalid_emotion_name"),
        ),
    ];
    for (name, body) in error_cases {
        if let Some(request) = runner.synthesis_probe(name, body) {
            runner.check(name, &request, &ClientErrorMatcher).await;
        }
    }
}
