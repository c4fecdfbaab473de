use tracing::info;

use crate::cli::commands::Cli;
use crate::cli::context::{build_client, RunContext};
use crate::config::TransportKind;
use crate::errors::HarnessError;
use crate::scenarios::{body_variants, compat, contract, ensure_live, functional, sweep, CompatMode, Runner};

/// The non-scored suites. Each runs once against `target.url` over the
/// direct transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Functional,
    Compat(CompatMode),
    Contract,
    BodyVariants,
    Sweep,
}

impl Suite {
    pub fn name(&self) -> &'static str {
        match self {
            Suite::Functional => "functional",
            Suite::Compat(_) => "compat",
            Suite::Contract => "contract",
            Suite::BodyVariants => "body-variants",
            Suite::Sweep => "sweep",
        }
    }
}

pub async fn handle_suite(cli: &Cli, suite: Suite) -> Result<(), HarnessError> {
    let context = RunContext::load(cli).await?;
    let config = &context.config;
    let client = build_client(&config.target.url, TransportKind::Direct, config).await?;
    ensure_live(&client, config).await?;

    info!(suite = suite.name(), target = %client.base_url(), "Starting suite");
    let mut runner = Runner::new(&client, config, context.artifacts(), context.reporter);
    match suite {
        Suite::Functional => functional::run(&mut runner).await,
        Suite::Compat(mode) => compat::run(&mut runner, mode).await,
        Suite::Contract => contract::run(&mut runner).await,
        Suite::BodyVariants => body_variants::run(&mut runner).await,
        Suite::Sweep => sweep::run(&mut runner).await,
    }
    let log = runner.into_log();

    context.reporter.summary(&log);
    context
        .write_report(suite.name(), client.base_url().as_str(), &log, Vec::new())
        .await
}
