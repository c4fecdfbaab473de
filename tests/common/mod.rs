#![allow(dead_code)]

use voiceprobe::config::{HarnessConfig, PacingConfig};
use voiceprobe::probe::{HttpTransport, ProbeClient};

/// Smallest body the audio checks accept: a RIFF header and nothing else.
pub fn wav() -> Vec<u8> {
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&36u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes
}

/// Defaults pointed at `url`, with pacing off and no artifacts.
pub fn config_for(url: &str) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.target.url = url.to_string();
    config.pacing = PacingConfig::disabled();
    config.artifacts.enabled = false;
    config
}

pub fn direct_client(url: &str) -> ProbeClient {
    let transport = Box::new(HttpTransport::new().unwrap());
    ProbeClient::new(url, transport).unwrap()
}
