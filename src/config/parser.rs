use std::collections::HashSet;
use std::path::Path;

use reqwest::Url;
use tracing::warn;

use crate::errors::HarnessError;
use super::schema::CONFIG_SCHEMA;
use super::types::HarnessConfig;

pub async fn parse_config(path: &Path) -> Result<HarnessConfig, HarnessError> {
    if !path.exists() {
        return Err(HarnessError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(HarnessError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

/// Parse YAML text: advisory schema check, typed decode, semantic checks.
pub fn parse_config_str(content: &str) -> Result<HarnessConfig, HarnessError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // An empty document is a valid, all-defaults config
    if yaml.is_null() {
        return Ok(HarnessConfig::default());
    }

    schema_warnings(&yaml)?
        .iter()
        .for_each(|msg| warn!(validation_error = %msg, "Config schema warning"));

    let config: HarnessConfig = serde_yaml::from_value(yaml)?;
    validate_conflicts(&config)?;
    Ok(config)
}

/// Validate config against the JSON schema. Violations are returned as
/// warnings; only a broken schema or unconvertible document is an error.
pub fn schema_warnings(yaml: &serde_yaml::Value) -> Result<Vec<String>, HarnessError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| HarnessError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| HarnessError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| HarnessError::Config(format!("Schema compilation error: {}", e)))?;

    let messages = match compiled.validate(&json_value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect(),
    };
    Ok(messages)
}

/// Reject configurations that parse but cannot drive a run.
pub fn validate_conflicts(config: &HarnessConfig) -> Result<(), HarnessError> {
    let url = Url::parse(&config.target.url)
        .map_err(|e| HarnessError::Config(format!("target.url '{}': {}", config.target.url, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HarnessError::Config(format!(
            "target.url must be http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.target.liveness_timeout_secs == 0 {
        return Err(HarnessError::Config("target.liveness_timeout_secs must be at least 1".into()));
    }

    if config.scoring.burst_size == 0 {
        return Err(HarnessError::Config("scoring.burst_size must be at least 1".into()));
    }

    let mut seen = HashSet::new();
    for target in &config.security.comprehensive {
        if !seen.insert(target.port) {
            return Err(HarnessError::Config(format!(
                "Port {} listed twice in security.comprehensive",
                target.port
            )));
        }
    }

    if config.artifacts.enabled && config.artifacts.directory.as_os_str().is_empty() {
        warn!("Artifacts enabled but artifacts.directory is empty; using the current directory");
    }

    if !config.scoring.rate_limit_counts_as_pass {
        warn!("Rate-limited responses will not count toward attack categories; scores are not comparable with earlier runs");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SecurityTarget, TransportKind};

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(parse_config_str("").unwrap(), HarnessConfig::default());
    }

    #[test]
    fn test_duplicate_comprehensive_port_rejected() {
        let mut config = HarnessConfig::default();
        config.security.comprehensive = vec![
            SecurityTarget { port: 3000, transport: TransportKind::Container },
            SecurityTarget { port: 3000, transport: TransportKind::Direct },
        ];
        assert!(matches!(validate_conflicts(&config), Err(HarnessError::Config(_))));
    }

    #[test]
    fn test_bad_scheme_rejected() {
        let mut config = HarnessConfig::default();
        config.target.url = "ftp://localhost".into();
        assert!(validate_conflicts(&config).is_err());
    }

    #[test]
    fn test_zero_burst_rejected() {
        let mut config = HarnessConfig::default();
        config.scoring.burst_size = 0;
        assert!(validate_conflicts(&config).is_err());
    }

    #[test]
    fn test_schema_warnings_are_advisory() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("pacing:\n  attack_ms: -5\n").unwrap();
        let warnings = schema_warnings(&yaml).unwrap();
        assert!(!warnings.is_empty());
    }

    #[test]
    fn test_unknown_section_warns_but_parses() {
        let config = parse_config_str("extra: 1\ntarget:\n  url: http://127.0.0.1:25251\n").unwrap();
        assert_eq!(config.target.url, "http://127.0.0.1:25251");
    }

    #[test]
    fn test_type_mismatch_is_yaml_error() {
        let err = parse_config_str("pacing:\n  attack_ms: soon\n").unwrap_err();
        assert!(matches!(err, HarnessError::Yaml(_)));
    }
}
