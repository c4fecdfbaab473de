use tracing::info;

use crate::cli::commands::{Cli, SecurityArgs};
use crate::cli::context::{build_client, url_with_port, RunContext};
use crate::config::{HarnessConfig, SecurityTarget, TransportKind};
use crate::errors::HarnessError;
use crate::probe::ProbeClient;
use crate::reporting::SecuritySummary;
use crate::scenarios::{ensure_live, security, RunLog, Runner};

/// One resolved target of a security run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTarget {
    pub url: String,
    pub transport: TransportKind,
}

impl PlannedTarget {
    pub fn label(&self) -> String {
        format!("{} ({})", self.url, self.transport)
    }
}

/// Resolve the flags and the `security` section into the targets to run.
pub fn plan_targets(config: &HarnessConfig, args: &SecurityArgs) -> Result<Vec<PlannedTarget>, HarnessError> {
    let base = &config.target.url;
    if args.comprehensive {
        return config
            .security
            .comprehensive
            .iter()
            .map(|SecurityTarget { port, transport }| {
                let transport = if args.no_container { TransportKind::Direct } else { *transport };
                Ok(PlannedTarget { url: url_with_port(base, *port)?, transport })
            })
            .collect();
    }

    let url = match args.port.or(config.security.port) {
        Some(port) => url_with_port(base, port)?,
        None => base.clone(),
    };
    let transport = if args.no_container { TransportKind::Direct } else { config.security.transport };
    Ok(vec![PlannedTarget { url, transport }])
}

/// Build a client for every target and check that each one answers, before
/// any suite starts.
pub async fn connect_targets(
    targets: &[PlannedTarget],
    config: &HarnessConfig,
) -> Result<Vec<ProbeClient>, HarnessError> {
    let mut clients = Vec::with_capacity(targets.len());
    for target in targets {
        let client = build_client(&target.url, target.transport, config).await?;
        ensure_live(&client, config).await?;
        clients.push(client);
    }
    Ok(clients)
}

pub async fn handle_security(cli: &Cli, args: &SecurityArgs) -> Result<(), HarnessError> {
    let context = RunContext::load(cli).await?;
    let config = &context.config;
    let targets = plan_targets(config, args)?;
    if targets.is_empty() {
        return Err(HarnessError::Config("security.comprehensive lists no targets".into()));
    }

    let clients = connect_targets(&targets, config).await?;

    let mut combined = RunLog::new();
    let mut summaries = Vec::with_capacity(targets.len());
    for (target, client) in targets.iter().zip(&clients) {
        info!(target = %target.url, transport = %client.transport_name(), "Starting security suite");

        let mut runner = Runner::new(client, config, context.artifacts(), context.reporter);
        let card = security::run(&mut runner).await;
        let log = runner.into_log();

        let label = target.label();
        context.reporter.summary(&log);
        context.reporter.scorecard(&card, &label);
        for outcome in log.outcomes() {
            combined.push(outcome.clone());
        }
        summaries.push(SecuritySummary::new(label, target.url.clone(), client.transport_name(), card));
    }

    if summaries.len() > 1 {
        context.reporter.comparison(&summaries);
    }

    let target = targets
        .iter()
        .map(|t| t.url.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    context.write_report("security", &target, &combined, summaries).await
}
