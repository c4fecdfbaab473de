//! Weighted security suite: basic functionality, four attack categories and
//! a rate-limit burst, folded into one [`Scorecard`].

use crate::payloads::{AttackPayload, PayloadCatalog};
use crate::probe::legacy::{EmotionList, NarratorList, SynthesisRequest};
use crate::reporting::renderer::render_event;
use crate::reporting::{BurstProgress, RunEvent};
use crate::scoring::matcher::is_rate_limited;
use crate::scoring::{
    AudioMatcher, IndicatorMatcher, JsonFieldMatcher, Scorecard, SecurityCategory, Verdict,
};
use crate::utils::truncation::truncate_chars;
use super::outcome::ScenarioOutcome;
use super::runner::Runner;

/// Statuses that count as a rejection of hostile input.
pub const REJECTION_STATUSES: [u16; 2] = [400, 422];

const ATTACK_CATEGORIES: [SecurityCategory; 4] = [
    SecurityCategory::InjectionAttacks,
    SecurityCategory::XssAttacks,
    SecurityCategory::InputValidation,
    SecurityCategory::NumericAttacks,
];

/// Add one verdict to the card under the run's rate-limit policy.
fn score(card: Scorecard, category: SecurityCategory, verdict: Option<&Verdict>, rate_limit_counts_as_pass: bool) -> Scorecard {
    let Some(verdict) = verdict else {
        return card;
    };
    let card = if verdict.is_rate_limited() {
        card.record_rate_limited(category)
    } else {
        card
    };
    if verdict.counts(rate_limit_counts_as_pass) {
        card.record_pass(category)
    } else {
        card
    }
}

pub async fn run(runner: &mut Runner<'_>) -> Scorecard {
    runner.started("security");
    let config = runner.config().clone();
    let policy = config.scoring.rate_limit_counts_as_pass;
    let mut card = Scorecard::new(&config.scoring.expected_totals);

    card = run_basic(runner, card, policy).await;

    let catalog = PayloadCatalog::standard(&config.legacy.narrator, &config.legacy.emotion);
    for category in ATTACK_CATEGORIES {
        runner.reporter().section(category.display_name());
        for (index, payload) in catalog.for_category(category).enumerate() {
            let verdict = run_payload(runner, index + 1, payload).await;
            card = score(card, category, verdict.as_ref(), policy);
            runner.pace(config.pacing.attack()).await;
        }
    }

    run_burst(runner, card).await
}

async fn run_basic(runner: &mut Runner<'_>, mut card: Scorecard, policy: bool) -> Scorecard {
    let category = SecurityCategory::BasicFunctionality;
    let legacy = runner.config().legacy.clone();
    let pause = runner.config().pacing.basic();
    let paths = runner.legacy_paths();
    runner.reporter().section(category.display_name());

    let listings = [
        ("narrator list", NarratorList::request(&paths), JsonFieldMatcher::new("narrators")),
        (
            "emotion list",
            EmotionList::request(&paths, Some(legacy.narrator.as_str())),
            JsonFieldMatcher::new("emotions"),
        ),
    ];
    for (name, request, matcher) in listings {
        let verdict = runner.check(name, &request, &matcher).await;
        card = score(card, category, verdict.as_ref(), policy);
        runner.pace(pause).await;
    }

    let body = SynthesisRequest::text("これはテスト音声です。")
        .with_narrator(legacy.narrator.as_str())
        .with_emotion(legacy.emotion.as_str())
        .with_speed(100)
        .with_pitch(0);
    if let Some(request) = runner.synthesis_probe("synthesis returns WAV", body) {
        let verdict = runner.check("synthesis returns WAV", &request, &AudioMatcher).await;
        card = score(card, category, verdict.as_ref(), policy);
    }
    runner.pace(pause).await;

    card
}

async fn run_payload(runner: &mut Runner<'_>, index: usize, payload: &AttackPayload) -> Option<Verdict> {
    let name = format!(
        "{} #{}: {}",
        payload.category.as_str(),
        index,
        truncate_chars(&payload.description, 60)
    );
    let matcher = IndicatorMatcher::new(&payload.signals, &REJECTION_STATUSES)
        .require_client_error(runner.config().scoring.require_client_error);
    let request = runner.synthesis_probe(&name, payload.request().clone())?;
    runner.check(&name, &request, &matcher).await
}

/// Send the burst and credit each limiter response, capped by the tally.
async fn run_burst(runner: &mut Runner<'_>, mut card: Scorecard) -> Scorecard {
    let category = SecurityCategory::RateLimiting;
    let config = runner.config().clone();
    let burst_size = config.scoring.burst_size;
    runner.reporter().section(category.display_name());
    runner.reporter().note(format!("sending {} requests to provoke the limiter", burst_size));

    let quiet = runner.reporter().is_quiet();
    let mut progress = BurstProgress::new(burst_size, quiet);
    for i in 0..burst_size {
        let body = SynthesisRequest::text(format!("レート制限テスト{}", i))
            .with_narrator(config.legacy.narrator.as_str())
            .with_emotion(config.legacy.emotion.as_str());
        let (rate_limited, status) = match body.into_probe(&runner.legacy_paths()) {
            Ok(request) => match runner.probe(&request).await {
                Ok(result) => (is_rate_limited(&result), Some(result.status())),
                Err(_) => (false, None),
            },
            Err(_) => (false, None),
        };
        if !quiet {
            progress.println(&render_event(&RunEvent::BurstResponse { index: i + 1, rate_limited, status }));
        }
        progress.record(rate_limited);
        if rate_limited {
            card = card.record_pass(category);
        }
        runner.pace(config.pacing.burst()).await;
    }

    let triggered = progress.finish();
    let detail = format!("{}/{} requests rate limited", triggered, burst_size);
    let outcome = if triggered > 0 {
        ScenarioOutcome { rate_limited: true, ..ScenarioOutcome::passed("rate limit burst", detail) }
    } else {
        ScenarioOutcome::failed("rate limit burst", detail)
    };
    runner.record(outcome);
    card
}
