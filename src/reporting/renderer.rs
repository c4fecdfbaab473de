use console::style;

use crate::reporting::events::RunEvent;
use crate::reporting::report::SecuritySummary;
use crate::scenarios::{OutcomeStatus, RunLog, ScenarioOutcome};
use crate::scoring::{Grade, Scorecard};
use crate::utils::formatting::format_percentage;

/// Render a run event as styled terminal output, returning the formatted line.
pub fn render_event(event: &RunEvent) -> String {
    match event {
        RunEvent::RunStarted { suite, target, transport } => {
            format!(
                "\n{} {} against {} ({})\n{}",
                style("▶").green().bold(),
                style(suite).cyan().bold(),
                style(target).white().bold(),
                style(transport).dim(),
                style(render_build_line()).dim(),
            )
        }
        RunEvent::SectionStarted { title } => {
            format!(
                "\n{} {} {}",
                style("---").cyan().bold(),
                style(title).cyan().bold(),
                style("---").cyan().bold(),
            )
        }
        RunEvent::Outcome(outcome) => render_outcome(outcome),
        RunEvent::Note { message } => format!("    {}", style(message).dim()),
        RunEvent::BurstResponse { index, rate_limited, status } => {
            let status = status.map(|s| format!("HTTP {}", s)).unwrap_or_else(|| "no response".into());
            if *rate_limited {
                format!("    request {}: {} rate limit triggered ({})", index, style("⏰").yellow(), status)
            } else {
                format!("    request {}: passed through ({})", index, style(status).dim())
            }
        }
    }
}

fn render_outcome(outcome: &ScenarioOutcome) -> String {
    let marker = match outcome.status {
        OutcomeStatus::Passed if outcome.rate_limited => style("⏰").yellow(),
        OutcomeStatus::Passed => style("✓").green(),
        OutcomeStatus::Failed => style("✗").red(),
        OutcomeStatus::Skipped => style("⏭").yellow(),
    };
    let artifact = outcome
        .artifact
        .as_ref()
        .map(|p| format!(" → {}", p.display()))
        .unwrap_or_default();
    let detail = if outcome.status == OutcomeStatus::Failed {
        style(&outcome.detail).red().dim()
    } else {
        style(&outcome.detail).dim()
    };
    format!("  {} {} ({}){}", marker, outcome.name, detail, artifact)
}

/// Shorten a listing to its first `limit` entries plus a "... N more" tail.
pub fn render_list(items: &[String], limit: usize) -> String {
    let mut shown = items.iter().take(limit).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > limit {
        shown.push_str(&format!(" ... {} more", items.len() - limit));
    }
    shown
}

/// Final pass/fail/skip table for a run.
pub fn render_summary(log: &RunLog) -> String {
    let passed = log.count(OutcomeStatus::Passed);
    let failed = log.count(OutcomeStatus::Failed);
    let skipped = log.count(OutcomeStatus::Skipped);

    let mut out = format!("\n{}\n", style("Summary").white().bold());
    for outcome in log.outcomes() {
        let status = match outcome.status {
            OutcomeStatus::Passed => style("PASS").green(),
            OutcomeStatus::Failed => style("FAIL").red(),
            OutcomeStatus::Skipped => style("SKIP").yellow(),
        };
        out.push_str(&format!("  {:<6} {}\n", status, outcome.name));
    }
    out.push_str(&format!(
        "\n  {} passed, {} failed, {} skipped\n",
        style(passed).green().bold(),
        style(failed).red().bold(),
        style(skipped).yellow(),
    ));
    out
}

/// Per-category percentages, overall score and grade.
pub fn render_scorecard(card: &Scorecard, label: &str) -> String {
    let mut out = format!("\n{} {}\n", style("Security results:").white().bold(), style(label).cyan());
    for tally in card.tallies() {
        let limited = if tally.rate_limited > 0 {
            format!(" [{} rate limited]", tally.rate_limited)
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  {:<28} {}/{} ({}){}\n",
            tally.category.display_name(),
            tally.passed,
            tally.expected,
            format_percentage(tally.percentage()),
            style(limited).yellow(),
        ));
    }
    out.push_str(&format!(
        "\n  {} {}\n  {} {}\n",
        style("Overall security score:").white().bold(),
        style(format_percentage(card.overall_percentage())).white().bold(),
        style("Security level:").white().bold(),
        render_grade(card.grade()),
    ));
    out
}

pub fn render_grade(grade: Grade) -> String {
    match grade {
        Grade::Outstanding => style(grade.label()).green().bold().to_string(),
        Grade::Excellent => style(grade.label()).green().to_string(),
        Grade::Good => style(grade.label()).yellow().to_string(),
        Grade::NeedsImprovement => style(grade.label()).red().bold().to_string(),
    }
}

/// Side-by-side overall scores of a multi-target security run.
pub fn render_comparison(summaries: &[SecuritySummary]) -> String {
    let mut out = format!("\n{}\n", style("Comparison:").white().bold());
    for summary in summaries {
        out.push_str(&format!(
            "  {:<40} {:>7}  {}\n",
            summary.label,
            format_percentage(summary.overall_percentage),
            render_grade(summary.grade),
        ));
    }
    out
}

pub fn render_build_line() -> String {
    format!(
        "voiceprobe {} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_HASH").unwrap_or("dev"),
        option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
    )
}
