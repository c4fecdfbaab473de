//! Both contracts side by side: legacy listing and synthesis, then the
//! speakers → audio_query → synthesis chain and the docs page.

use crate::probe::compat::{docs_request, AudioQuery, SpeakerList};
use crate::probe::legacy::SynthesisRequest;
use crate::scoring::AudioMatcher;
use super::functional::{list_emotions, list_narrators};
use super::outcome::ScenarioOutcome;
use super::runner::Runner;

/// Which halves of the compatibility run to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompatMode {
    #[default]
    Both,
    LegacyOnly,
    CompatOnly,
}

pub async fn run(runner: &mut Runner<'_>, mode: CompatMode) {
    runner.started("compat");

    if mode != CompatMode::CompatOnly {
        run_legacy(runner).await;
    }
    if mode != CompatMode::LegacyOnly {
        run_compat(runner).await;
        runner.reporter().section("Docs");
        let request = docs_request(false);
        match runner.probe(&request).await {
            Ok(result) if result.status() == 200 => {
                let kind = if result.is_html() { "HTML page" } else { result.content_type() };
                runner.record(ScenarioOutcome::passed("docs", format!("HTTP 200 ({})", kind)));
            }
            Ok(result) => runner.record(ScenarioOutcome::failed("docs", format!("HTTP {}", result.status()))),
            Err(e) => runner.record(ScenarioOutcome::failed("docs", e.to_string())),
        }
    }
}

async fn run_legacy(runner: &mut Runner<'_>) {
    runner.reporter().section("Legacy contract");
    list_narrators(runner, "legacy narrators").await;
    list_emotions(runner, "legacy emotions").await;

    let legacy = runner.config().legacy.clone();
    let body = SynthesisRequest::text("こんにちは")
        .with_narrator(legacy.narrator)
        .with_emotion(legacy.emotion)
        .with_speed(100)
        .with_pitch(0);
    if let Some(request) = runner.synthesis_probe("legacy synthesis", body) {
        runner.check("legacy synthesis", &request, &AudioMatcher).await;
    }
}

async fn run_compat(runner: &mut Runner<'_>) {
    runner.reporter().section("Compat contract");

    let speakers = match runner.probe(&SpeakerList::request()).await {
        Ok(result) if result.status() == 503 => {
            let reason = result
                .json_opt()
                .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| "HTTP 503".to_string());
            runner.record(ScenarioOutcome::skipped("speakers", format!("compat engine disabled: {}", reason)));
            skip_chain(runner, "compat engine disabled");
            return;
        }
        Ok(result) => match SpeakerList::from_result(&result) {
            Ok(list) => {
                runner.record(ScenarioOutcome::passed("speakers", format!("{} speakers", list.speakers.len())));
                if let Some(first) = list.speakers.first() {
                    runner.reporter().note(format!("sample: {} (uuid {})", first.name, first.speaker_uuid));
                }
                list
            }
            Err(e) => {
                runner.record(ScenarioOutcome::failed("speakers", e.to_string()));
                skip_chain(runner, "speaker list unavailable");
                return;
            }
        },
        Err(e) => {
            runner.record(ScenarioOutcome::failed("speakers", e.to_string()));
            skip_chain(runner, "speaker list unavailable");
            return;
        }
    };

    let speaker = speakers
        .first_style()
        .map(|(_, style)| style.id)
        .unwrap_or(runner.config().compat.default_speaker);

    let text = runner.config().compat.sample_text.clone();
    let query = match runner.probe(&AudioQuery::request(&text, speaker)).await {
        Ok(result) => match AudioQuery::from_result(&result) {
            Ok(query) => {
                let detail = format!(
                    "speaker {}, sampling rate {}, speed scale {}, {} accent phrases",
                    speaker,
                    query.output_sampling_rate().map_or("n/a".to_string(), |r| r.to_string()),
                    query.speed_scale().map_or("n/a".to_string(), |s| s.to_string()),
                    query.accent_phrase_count().unwrap_or(0),
                );
                runner.record(ScenarioOutcome::passed("audio query", detail));
                let missing = query.missing_fields();
                if !missing.is_empty() {
                    runner.reporter().note(format!("query lacks {}", missing.join(", ")));
                }
                Some(query)
            }
            Err(e) => {
                runner.record(ScenarioOutcome::failed("audio query", e.to_string()));
                None
            }
        },
        Err(e) => {
            runner.record(ScenarioOutcome::failed("audio query", e.to_string()));
            None
        }
    };

    match query {
        Some(query) => {
            let request = query.synthesis_request(speaker);
            let artifact = format!("compat_synthesis_{}.wav", speaker);
            runner.check_audio("compat synthesis", &request, &artifact).await;
        }
        None => runner.record(ScenarioOutcome::skipped("compat synthesis", "audio query failed")),
    }
}

fn skip_chain(runner: &mut Runner<'_>, reason: &str) {
    runner.record(ScenarioOutcome::skipped("audio query", reason));
    runner.record(ScenarioOutcome::skipped("compat synthesis", reason));
}
