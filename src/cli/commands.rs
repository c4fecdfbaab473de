use clap::{Args, Parser, Subcommand};

use crate::scenarios::CompatMode;

#[derive(Parser)]
#[command(name = "voiceprobe", version, about = "Compatibility and security probe harness for TTS HTTP APIs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Target base URL (default http://localhost:3000)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print the summaries
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Directory for synthesized audio
    #[arg(long, global = true)]
    pub artifacts_dir: Option<String>,

    /// Do not keep synthesized audio
    #[arg(long, global = true)]
    pub no_artifacts: bool,

    /// Skip every pause between requests
    #[arg(long, global = true)]
    pub no_pacing: bool,

    /// Write a JSON report of the run to this path
    #[arg(long, global = true)]
    pub report_json: Option<String>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            artifacts_dir: self.artifacts_dir.clone(),
            no_artifacts: self.no_artifacts,
            no_pacing: self.no_pacing,
        }
    }
}

/// Global flags that take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub artifacts_dir: Option<String>,
    pub no_artifacts: bool,
    pub no_pacing: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exercise the legacy contract end to end
    Functional,
    /// Check the legacy and compat contracts side by side
    Compat(CompatArgs),
    /// Check the 422 error contract of the compat endpoints
    Contract,
    /// Send audio_query with null, empty and missing bodies
    BodyVariants,
    /// Hit each endpoint once for server-log inspection
    Sweep,
    /// Run the weighted security suite and print a scorecard
    Security(SecurityArgs),
    /// Validate a configuration file
    ValidateConfig(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct CompatArgs {
    /// Only the legacy half
    #[arg(long, conflicts_with = "compat_only")]
    pub legacy_only: bool,

    /// Only the compat half and the docs page
    #[arg(long)]
    pub compat_only: bool,
}

impl CompatArgs {
    pub fn mode(&self) -> CompatMode {
        match (self.legacy_only, self.compat_only) {
            (true, _) => CompatMode::LegacyOnly,
            (_, true) => CompatMode::CompatOnly,
            _ => CompatMode::Both,
        }
    }
}

#[derive(Args, Clone)]
pub struct SecurityArgs {
    /// Port to probe instead of the one in the target URL
    #[arg(long)]
    pub port: Option<u16>,

    /// Probe directly instead of through the target container
    #[arg(long)]
    pub no_container: bool,

    /// Run every configured (port, transport) target and compare them
    #[arg(long, conflicts_with = "port")]
    pub comprehensive: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub file: String,
}
