use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use reqwest::Url;
use tracing::info;

use crate::cli::commands::{Cli, Overrides};
use crate::config::{self, parser::validate_conflicts, HarnessConfig, PacingConfig, TransportKind};
use crate::container::TargetContainer;
use crate::errors::HarnessError;
use crate::probe::{ContainerTransport, HttpTransport, ProbeClient, Transport};
use crate::reporting::{ArtifactStore, Reporter, RunReport, SecuritySummary};
use crate::scenarios::RunLog;

/// Everything a suite handler needs once the flags and the file are merged.
pub struct RunContext {
    pub config: HarnessConfig,
    pub reporter: Reporter,
    pub report_path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub async fn load(cli: &Cli) -> Result<Self, HarnessError> {
        let file_config = match &cli.config {
            Some(path) => config::parse_config(Path::new(path)).await?,
            None => HarnessConfig::default(),
        };
        let config = apply_overrides(file_config, &cli.overrides())?;
        Ok(Self {
            config,
            reporter: Reporter::new(cli.quiet),
            report_path: cli.report_json.as_ref().map(PathBuf::from),
            started_at: Utc::now(),
        })
    }

    pub fn artifacts(&self) -> Option<ArtifactStore> {
        self.config
            .artifacts
            .enabled
            .then(|| ArtifactStore::new(&self.config.artifacts.directory))
    }

    /// Write the JSON report when `--report-json` was given.
    pub async fn write_report(
        &self,
        suite: &str,
        target: &str,
        log: &RunLog,
        security: Vec<SecuritySummary>,
    ) -> Result<(), HarnessError> {
        let Some(path) = &self.report_path else {
            return Ok(());
        };
        RunReport::new(suite, target, self.started_at, log, security)
            .write(path)
            .await?;
        info!(path = %path.display(), "Report written");
        Ok(())
    }
}

/// Layer the global flags over the file configuration and re-check it.
pub fn apply_overrides(mut config: HarnessConfig, overrides: &Overrides) -> Result<HarnessConfig, HarnessError> {
    if let Some(url) = &overrides.url {
        config.target.url = url.clone();
    }
    if let Some(dir) = &overrides.artifacts_dir {
        config.artifacts.directory = PathBuf::from(dir);
    }
    if overrides.no_artifacts {
        config.artifacts.enabled = false;
    }
    if overrides.no_pacing {
        config.pacing = PacingConfig::disabled();
    }
    validate_conflicts(&config)?;
    Ok(config)
}

/// Replace the port of `base`, keeping scheme, host and path.
pub fn url_with_port(base: &str, port: u16) -> Result<String, HarnessError> {
    let mut url = Url::parse(base).map_err(|e| HarnessError::InvalidTarget(format!("{}: {}", base, e)))?;
    url.set_port(Some(port))
        .map_err(|_| HarnessError::InvalidTarget(format!("Cannot set a port on {}", base)))?;
    Ok(url.to_string())
}

/// Build the transport for `kind`. The container transport requires the
/// named container to be running.
pub async fn build_transport(kind: TransportKind, container_name: &str) -> Result<Box<dyn Transport>, HarnessError> {
    match kind {
        TransportKind::Direct => Ok(Box::new(HttpTransport::new()?)),
        TransportKind::Container => {
            let container = TargetContainer::connect(container_name)?;
            container.ensure_running().await?;
            Ok(Box::new(ContainerTransport::new(container)))
        }
    }
}

pub async fn build_client(url: &str, kind: TransportKind, config: &HarnessConfig) -> Result<ProbeClient, HarnessError> {
    let transport = build_transport(kind, &config.container.name).await?;
    ProbeClient::new(url, transport)
}
