use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::debug;

use crate::errors::HarnessError;
use super::request::{Method, ProbeRequest, RequestBody};
use super::result::ProbeResult;

/// How a resolved probe actually reaches the target.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one exchange. HTTP error statuses are returned as results;
    /// only failures to get any response at all are errors.
    async fn execute(&self, url: &Url, request: &ProbeRequest) -> Result<ProbeResult, HarnessError>;

    /// Short name for logs and report headers.
    fn name(&self) -> &str;
}

/// Talks to the target directly from this process.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, HarnessError> {
        let client = Client::builder()
            .user_agent(concat!("voiceprobe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HarnessError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, url: &Url, request: &ProbeRequest) -> Result<ProbeResult, HarnessError> {
        let mut builder = match request.method() {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
        };

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body() {
            RequestBody::None => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Raw { content, content_type } => {
                let builder = match content_type {
                    Some(ct) => builder.header(CONTENT_TYPE, ct.as_str()),
                    None => builder,
                };
                builder.body(content.clone())
            }
            RequestBody::Form(pairs) if pairs.is_empty() => builder,
            RequestBody::Form(pairs) => builder.form(pairs),
        };

        if let Some(timeout) = request.timeout_value() {
            builder = builder.timeout(timeout);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HarnessError::Timeout(format!("{} timed out: {}", request.label(), e))
            } else if e.is_connect() || e.is_request() {
                HarnessError::Connectivity(format!("{}: {}", url, e))
            } else {
                HarnessError::Transport(format!("{} failed: {}", request.label(), e))
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HarnessError::Transport(format!("Failed to read body of {}: {}", request.label(), e)))?
            .to_vec();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        debug!(
            probe = %request.label(),
            status,
            content_type = %content_type,
            bytes = bytes.len(),
            elapsed_ms,
            "Probe completed"
        );

        Ok(ProbeResult::new(status, content_type, bytes, elapsed_ms))
    }

    fn name(&self) -> &str {
        "direct"
    }
}
