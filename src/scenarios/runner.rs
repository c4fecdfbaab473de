use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::HarnessConfig;
use crate::errors::HarnessError;
use crate::probe::legacy::{LegacyPaths, SynthesisRequest};
use crate::probe::{ProbeClient, ProbeRequest, ProbeResult};
use crate::reporting::{ArtifactStore, Reporter, RunEvent};
use crate::scoring::{AudioMatcher, ResponseMatcher, Verdict};
use crate::utils::formatting::format_bytes;
use super::outcome::{RunLog, ScenarioOutcome};

/// Confirm the target answers before any scenario runs. This is the only
/// check whose failure ends a run early.
pub async fn ensure_live(client: &ProbeClient, config: &HarnessConfig) -> Result<ProbeResult, HarnessError> {
    let result = client
        .check_liveness(&config.target.liveness_path, config.target.liveness_timeout())
        .await?;
    info!(
        target = %client.base_url(),
        status = result.status(),
        elapsed_ms = result.elapsed_ms(),
        "Target is reachable"
    );
    Ok(result)
}

/// Shared state of one sequential run: the client, settings, artifact store
/// and the append-only log every step writes to.
pub struct Runner<'a> {
    client: &'a ProbeClient,
    config: &'a HarnessConfig,
    artifacts: Option<ArtifactStore>,
    reporter: Reporter,
    log: RunLog,
}

impl<'a> Runner<'a> {
    pub fn new(
        client: &'a ProbeClient,
        config: &'a HarnessConfig,
        artifacts: Option<ArtifactStore>,
        reporter: Reporter,
    ) -> Self {
        Self {
            client,
            config,
            artifacts,
            reporter,
            log: RunLog::new(),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        self.config
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn into_log(self) -> RunLog {
        self.log
    }

    pub fn legacy_paths(&self) -> LegacyPaths {
        LegacyPaths::new(&self.config.legacy.prefix)
    }

    pub fn started(&self, suite: &str) {
        self.reporter.emit(&RunEvent::RunStarted {
            suite: suite.to_string(),
            target: self.client.base_url().to_string(),
            transport: self.client.transport_name().to_string(),
        });
    }

    /// Append an outcome and stream it.
    pub fn record(&mut self, outcome: ScenarioOutcome) {
        self.reporter.emit(&RunEvent::Outcome(outcome.clone()));
        self.log.push(outcome);
    }

    pub async fn pace(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// One exchange. Errors are already logged by the client.
    pub async fn probe(&self, request: &ProbeRequest) -> Result<ProbeResult, HarnessError> {
        self.client.probe(request).await
    }

    /// Probe, match and record. Returns the verdict, or `None` when no
    /// response arrived.
    pub async fn check(
        &mut self,
        name: &str,
        request: &ProbeRequest,
        matcher: &dyn ResponseMatcher,
    ) -> Option<Verdict> {
        self.check_inner(name, request, matcher, None).await
    }

    /// Expect a WAV response and keep it as `artifact` when it passes.
    pub async fn check_audio(&mut self, name: &str, request: &ProbeRequest, artifact: &str) -> Option<Verdict> {
        self.check_inner(name, request, &AudioMatcher, Some(artifact)).await
    }

    async fn check_inner(
        &mut self,
        name: &str,
        request: &ProbeRequest,
        matcher: &dyn ResponseMatcher,
        artifact: Option<&str>,
    ) -> Option<Verdict> {
        let result = match self.probe(request).await {
            Ok(result) => result,
            Err(e) => {
                self.record(ScenarioOutcome::failed(name, e.to_string()));
                return None;
            }
        };

        let verdict = matcher.evaluate(&result);
        let passed = verdict.counts(false);
        if !passed && !verdict.is_rate_limited() {
            warn!(step = name, status = result.status(), body = %result.snippet(), "Check failed");
        }

        let mut outcome = ScenarioOutcome::from_verdict(name, &verdict, self.config.scoring.rate_limit_counts_as_pass);
        if let (true, Some(file_name)) = (passed, artifact) {
            outcome.detail = format!("{}, {}", outcome.detail, format_bytes(result.bytes().len()));
            outcome = outcome.with_artifact(self.save_artifact(file_name, &result).await);
        }
        self.record(outcome);
        Some(verdict)
    }

    /// Encode a legacy synthesis body, recording a failed step when it cannot be.
    pub fn synthesis_probe(&mut self, name: &str, body: SynthesisRequest) -> Option<ProbeRequest> {
        match body.into_probe(&self.legacy_paths()) {
            Ok(request) => Some(request),
            Err(e) => {
                self.record(ScenarioOutcome::failed(name, e.to_string()));
                None
            }
        }
    }

    /// Save audio bytes when artifacts are enabled. A write failure is logged
    /// and never fails the step.
    pub async fn save_artifact(&self, name: &str, result: &ProbeResult) -> Option<PathBuf> {
        let store = self.artifacts.as_ref()?;
        match store.save(name, result.bytes()).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(artifact = name, error = %e, "Could not save artifact");
                None
            }
        }
    }
}
