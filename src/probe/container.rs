use std::time::Instant;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::container::TargetContainer;
use crate::errors::HarnessError;
use super::request::{ProbeRequest, RequestBody};
use super::result::ProbeResult;
use super::transport::Transport;

/// Marker curl prints after the body so status and content type can be split off.
const TRAILER_MARKER: &[u8] = b"\n__VOICEPROBE__";

/// Runs each probe as `curl` inside the container hosting the target, so the
/// target is seen from its own network namespace.
pub struct ContainerTransport {
    container: TargetContainer,
    name: String,
}

impl ContainerTransport {
    pub fn new(container: TargetContainer) -> Self {
        let name = format!("container:{}", container.container_name());
        Self { container, name }
    }
}

#[async_trait]
impl Transport for ContainerTransport {
    async fn execute(&self, url: &Url, request: &ProbeRequest) -> Result<ProbeResult, HarnessError> {
        let command = build_curl_command(url, request);
        let started = Instant::now();
        let output = self.container.exec(&command).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (bytes, status, content_type) = split_trailer(&output.stdout).ok_or_else(|| {
            HarnessError::Transport(format!(
                "curl produced no status trailer (exit {:?}): {}",
                output.exit_code,
                output.stderr.trim()
            ))
        })?;

        // curl reports 000 when no HTTP exchange happened
        if status == 0 {
            return match output.exit_code {
                Some(28) => Err(HarnessError::Timeout(format!("{} timed out inside container", request.label()))),
                _ => Err(HarnessError::Connectivity(format!(
                    "{} unreachable from container (curl exit {:?}): {}",
                    url,
                    output.exit_code,
                    output.stderr.trim()
                ))),
            };
        }

        debug!(
            probe = %request.label(),
            status,
            content_type = %content_type,
            bytes = bytes.len(),
            elapsed_ms,
            "Container probe completed"
        );

        Ok(ProbeResult::new(status, content_type, bytes, elapsed_ms))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Single-quote `value` for `sh -c`.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Build the curl invocation equivalent to `request` against `url`.
pub fn build_curl_command(url: &Url, request: &ProbeRequest) -> String {
    let mut parts: Vec<String> = vec![
        "curl".into(),
        "-s".into(),
        "-S".into(),
        "-X".into(),
        request.method().as_str().into(),
    ];

    for (name, value) in request.headers() {
        parts.push("-H".into());
        parts.push(shell_quote(&format!("{}: {}", name, value)));
    }

    match request.body() {
        RequestBody::None => {}
        RequestBody::Json(value) => {
            parts.push("-H".into());
            parts.push(shell_quote("Content-Type: application/json"));
            parts.push("--data-binary".into());
            parts.push(shell_quote(&value.to_string()));
        }
        RequestBody::Raw { content, content_type } => {
            if let Some(ct) = content_type {
                parts.push("-H".into());
                parts.push(shell_quote(&format!("Content-Type: {}", ct)));
            }
            parts.push("--data-binary".into());
            parts.push(shell_quote(content));
        }
        RequestBody::Form(pairs) => {
            for (key, value) in pairs {
                parts.push("--data-urlencode".into());
                parts.push(shell_quote(&format!("{}={}", key, value)));
            }
        }
    }

    if let Some(timeout) = request.timeout_value() {
        parts.push("--max-time".into());
        parts.push(timeout.as_secs().max(1).to_string());
    }

    parts.push("-o".into());
    parts.push("-".into());
    parts.push("-w".into());
    parts.push(shell_quote(&format!(
        "{}%{{http_code}}|%{{content_type}}",
        String::from_utf8_lossy(TRAILER_MARKER)
    )));
    parts.push(shell_quote(url.as_str()));

    parts.join(" ")
}

/// Split curl output into (body, status, content type) using the trailer.
pub fn split_trailer(stdout: &[u8]) -> Option<(Vec<u8>, u16, String)> {
    let pos = stdout
        .windows(TRAILER_MARKER.len())
        .rposition(|window| window == TRAILER_MARKER)?;

    let body = stdout[..pos].to_vec();
    let trailer = String::from_utf8_lossy(&stdout[pos + TRAILER_MARKER.len()..]);
    let (status, content_type) = trailer.trim().split_once('|')?;
    let status = status.trim().parse::<u16>().ok()?;

    Some((body, status, content_type.trim().to_string()))
}
