use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::HarnessError;
use crate::scenarios::{OutcomeStatus, RunLog, ScenarioOutcome};
use crate::scoring::{Grade, Scorecard};

/// Scorecard of one security target, reduced for the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct SecuritySummary {
    pub label: String,
    pub target: String,
    pub transport: String,
    pub scorecard: Scorecard,
    pub overall_percentage: f64,
    pub grade: Grade,
}

impl SecuritySummary {
    pub fn new(label: impl Into<String>, target: impl Into<String>, transport: impl Into<String>, scorecard: Scorecard) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            transport: transport.into(),
            overall_percentage: scorecard.overall_percentage(),
            grade: scorecard.grade(),
            scorecard,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Machine-readable record of one invocation, written with `--report-json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub suite: String,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub version: String,
    pub git_hash: String,
    pub counts: OutcomeCounts,
    pub outcomes: Vec<ScenarioOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecuritySummary>,
}

impl RunReport {
    pub fn new(
        suite: impl Into<String>,
        target: impl Into<String>,
        started_at: DateTime<Utc>,
        log: &RunLog,
        security: Vec<SecuritySummary>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            suite: suite.into(),
            target: target.into(),
            started_at,
            finished_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_hash: option_env!("GIT_HASH").unwrap_or("dev").to_string(),
            counts: OutcomeCounts {
                passed: log.count(OutcomeStatus::Passed),
                failed: log.count(OutcomeStatus::Failed),
                skipped: log.count(OutcomeStatus::Skipped),
            },
            outcomes: log.outcomes().to_vec(),
            security,
        }
    }

    pub async fn write(&self, path: &Path) -> Result<(), HarnessError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
