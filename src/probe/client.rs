use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

use crate::errors::HarnessError;
use super::request::ProbeRequest;
use super::result::ProbeResult;
use super::transport::Transport;

/// Executes probes against one target base URL through one transport.
pub struct ProbeClient {
    base_url: Url,
    transport: Box<dyn Transport>,
}

impl std::fmt::Debug for ProbeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ProbeClient {
    pub fn new(base_url: &str, transport: Box<dyn Transport>) -> Result<Self, HarnessError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HarnessError::InvalidTarget(format!("{}: {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HarnessError::InvalidTarget(format!(
                "Unsupported scheme '{}' in {}",
                base_url.scheme(),
                base_url
            )));
        }
        Ok(Self { base_url, transport })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Perform one exchange and return whatever the target answered.
    pub async fn probe(&self, request: &ProbeRequest) -> Result<ProbeResult, HarnessError> {
        let url = request.resolve(&self.base_url)?;
        debug!(probe = %request.label(), url = %url, transport = self.transport.name(), "Sending probe");
        match self.transport.execute(&url, request).await {
            Ok(result) => {
                debug!(probe = %request.label(), status = result.status(), body = %result.snippet(), "Probe answered");
                Ok(result)
            }
            Err(e) => {
                warn!(probe = %request.label(), error = %e, "Probe failed");
                Err(e)
            }
        }
    }

    /// Confirm the target answers at all. Any HTTP status counts as alive;
    /// only failing to get a response is an error.
    pub async fn check_liveness(&self, path: &str, timeout: Duration) -> Result<ProbeResult, HarnessError> {
        let request = ProbeRequest::get(path).timeout(timeout);
        self.probe(&request).await
    }
}
