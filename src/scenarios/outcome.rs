use std::path::PathBuf;

use serde::Serialize;

use crate::scoring::Verdict;
use crate::utils::truncation::truncate_detail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    /// A prerequisite step failed or produced nothing to work with.
    Skipped,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded result of one scenario step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub status: OutcomeStatus,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    /// Set when the target's limiter answered this step.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rate_limited: bool,
}

impl ScenarioOutcome {
    pub fn new(name: impl Into<String>, status: OutcomeStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: truncate_detail(&detail.into()),
            artifact: None,
            rate_limited: false,
        }
    }

    pub fn passed(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, OutcomeStatus::Passed, detail)
    }

    pub fn failed(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, OutcomeStatus::Failed, detail)
    }

    pub fn skipped(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, OutcomeStatus::Skipped, detail)
    }

    /// Outcome of a matched response. Rate-limited verdicts pass or fail by
    /// `rate_limit_counts_as_pass` but are always flagged.
    pub fn from_verdict(name: impl Into<String>, verdict: &Verdict, rate_limit_counts_as_pass: bool) -> Self {
        let status = if verdict.counts(rate_limit_counts_as_pass) {
            OutcomeStatus::Passed
        } else {
            OutcomeStatus::Failed
        };
        let detail = match verdict {
            Verdict::Passed { basis } => basis.to_string(),
            Verdict::RateLimited => "rate limited by target".to_string(),
            Verdict::Failed { reason } => reason.clone(),
        };
        Self {
            rate_limited: verdict.is_rate_limited(),
            ..Self::new(name, status, detail)
        }
    }

    pub fn with_artifact(mut self, path: Option<PathBuf>) -> Self {
        self.artifact = path;
        self
    }
}

/// Append-only record of everything a run observed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RunLog {
    outcomes: Vec<ScenarioOutcome>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: ScenarioOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[ScenarioOutcome] {
        &self.outcomes
    }

    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MatchBasis;

    #[test]
    fn test_counts_by_status() {
        let mut log = RunLog::new();
        log.push(ScenarioOutcome::passed("narrators", "2 narrators"));
        log.push(ScenarioOutcome::failed("synthesis", "HTTP 500"));
        log.push(ScenarioOutcome::skipped("emotion synthesis", "no emotions"));
        log.push(ScenarioOutcome::passed("docs", "HTTP 200"));
        assert_eq!(log.count(OutcomeStatus::Passed), 2);
        assert_eq!(log.count(OutcomeStatus::Failed), 1);
        assert_eq!(log.count(OutcomeStatus::Skipped), 1);
        assert_eq!(log.outcomes()[1].name, "synthesis");
    }

    #[test]
    fn test_rate_limited_verdict_flagged_either_way() {
        let counted = ScenarioOutcome::from_verdict("x", &Verdict::RateLimited, true);
        let not_counted = ScenarioOutcome::from_verdict("x", &Verdict::RateLimited, false);
        assert_eq!(counted.status, OutcomeStatus::Passed);
        assert_eq!(not_counted.status, OutcomeStatus::Failed);
        assert!(counted.rate_limited && not_counted.rate_limited);
    }

    #[test]
    fn test_passed_verdict() {
        let verdict = Verdict::Passed { basis: MatchBasis::Status(400) };
        let outcome = ScenarioOutcome::from_verdict("empty text", &verdict, false);
        assert_eq!(outcome.status, OutcomeStatus::Passed);
        assert!(!outcome.rate_limited);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(ScenarioOutcome::skipped("synthesis", "audio query failed")).unwrap();
        assert_eq!(value["status"], "skipped");
        assert!(value.get("artifact").is_none());
        assert!(value.get("rate_limited").is_none());
    }
}
