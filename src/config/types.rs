use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scoring::ExpectedTotals;

pub const DEFAULT_URL: &str = "http://localhost:3000";
pub const DEFAULT_CONTAINER: &str = "voicepeak-api";

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    pub target: TargetConfig,
    pub legacy: LegacyConfig,
    pub compat: CompatConfig,
    pub pacing: PacingConfig,
    pub scoring: ScoringConfig,
    pub container: ContainerConfig,
    pub artifacts: ArtifactsConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TargetConfig {
    pub url: String,
    /// Path probed once before any scenario. Any HTTP answer counts as alive.
    pub liveness_path: String,
    pub liveness_timeout_secs: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            liveness_path: "/api/narrators".to_string(),
            liveness_timeout_secs: 5,
        }
    }
}

impl TargetConfig {
    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_secs(self.liveness_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LegacyConfig {
    /// Route prefix of the flat-parameter endpoints: `/api` or empty.
    pub prefix: String,
    pub narrator: String,
    pub emotion: String,
    pub sample_text: String,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            narrator: "Miyamai Moca".to_string(),
            emotion: "honwaka".to_string(),
            sample_text: "こんにちは、これはテストです。".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CompatConfig {
    /// Used when `/speakers` lists no style to take an id from.
    pub default_speaker: i64,
    /// Speaker id used by the body-variant and sweep runs.
    pub probe_speaker: i64,
    pub sample_text: String,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            default_speaker: 0,
            probe_speaker: 2041348160,
            sample_text: "こんにちは".to_string(),
        }
    }
}

/// Sleeps between consecutive probes, in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PacingConfig {
    pub basic_ms: u64,
    pub attack_ms: u64,
    pub burst_ms: u64,
    pub sweep_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            basic_ms: 2000,
            attack_ms: 1000,
            burst_ms: 200,
            sweep_ms: 1000,
        }
    }
}

impl PacingConfig {
    pub fn disabled() -> Self {
        Self { basic_ms: 0, attack_ms: 0, burst_ms: 0, sweep_ms: 0 }
    }

    pub fn basic(&self) -> Duration {
        Duration::from_millis(self.basic_ms)
    }

    pub fn attack(&self) -> Duration {
        Duration::from_millis(self.attack_ms)
    }

    pub fn burst(&self) -> Duration {
        Duration::from_millis(self.burst_ms)
    }

    pub fn sweep(&self) -> Duration {
        Duration::from_millis(self.sweep_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Count a limiter response as a pass in every attack category.
    pub rate_limit_counts_as_pass: bool,
    /// Only a 4xx can count as a rejection of an attack payload.
    pub require_client_error: bool,
    /// Requests sent by the rate-limit burst.
    pub burst_size: u32,
    pub expected_totals: ExpectedTotals,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rate_limit_counts_as_pass: true,
            require_client_error: false,
            burst_size: 10,
            expected_totals: ExpectedTotals::standard(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ContainerConfig {
    pub name: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self { name: DEFAULT_CONTAINER.to_string() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub enabled: bool,
    pub directory: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self { enabled: true, directory: PathBuf::from("tmp") }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Direct,
    Container,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Container => "container",
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One port of a multi-target security run.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct SecurityTarget {
    pub port: u16,
    pub transport: TransportKind,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Port of a single-target run. Unset keeps the port of `target.url`.
    pub port: Option<u16>,
    pub transport: TransportKind,
    pub comprehensive: Vec<SecurityTarget>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            port: None,
            transport: TransportKind::Container,
            comprehensive: vec![
                SecurityTarget { port: 3000, transport: TransportKind::Container },
                SecurityTarget { port: 25251, transport: TransportKind::Direct },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SecurityCategory;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.target.url, "http://localhost:3000");
        assert_eq!(config.target.liveness_timeout(), Duration::from_secs(5));
        assert_eq!(config.legacy.prefix, "/api");
        assert_eq!(config.container.name, "voicepeak-api");
        assert!(config.scoring.rate_limit_counts_as_pass);
        assert!(!config.scoring.require_client_error);
        assert_eq!(config.scoring.burst_size, 10);
        assert_eq!(config.security.comprehensive.len(), 2);
    }

    #[test]
    fn test_pacing_defaults_and_disabled() {
        let pacing = PacingConfig::default();
        assert_eq!(pacing.basic(), Duration::from_millis(2000));
        assert_eq!(pacing.burst(), Duration::from_millis(200));
        assert_eq!(PacingConfig::disabled().attack(), Duration::ZERO);
    }

    #[test]
    fn test_partial_yaml_keeps_section_defaults() {
        let config: HarnessConfig = serde_yaml::from_str(
            "pacing:\n  attack_ms: 10\nscoring:\n  expected_totals:\n    rate_limiting: 5\n",
        )
        .unwrap();
        assert_eq!(config.pacing.attack_ms, 10);
        assert_eq!(config.pacing.basic_ms, 2000);
        assert_eq!(config.scoring.expected_totals.get(SecurityCategory::RateLimiting), 5);
        assert!(config.scoring.rate_limit_counts_as_pass);
    }

    #[test]
    fn test_transport_kind_deserialize() {
        let parsed: TransportKind = serde_json::from_str("\"container\"").unwrap();
        assert_eq!(parsed, TransportKind::Container);
        assert_eq!(TransportKind::Direct.to_string(), "direct");
    }
}
