use serde_json::Value;

use crate::errors::HarnessError;
use crate::utils::truncation::snippet;

/// Leading bytes of a RIFF container (WAV).
pub const RIFF_MARKER: &[u8; 4] = b"RIFF";

/// Everything observed from one exchange.
///
/// The body is kept as raw bytes so audio survives untouched; JSON is parsed
/// on demand.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    status: u16,
    content_type: String,
    bytes: Vec<u8>,
    elapsed_ms: u64,
}

impl ProbeResult {
    pub fn new(status: u16, content_type: impl Into<String>, bytes: Vec<u8>, elapsed_ms: u64) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            bytes,
            elapsed_ms,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_audio(&self) -> bool {
        self.content_type.to_ascii_lowercase().starts_with("audio/")
    }

    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("text/html")
    }

    /// True when the payload starts with the RIFF container marker,
    /// regardless of what the content-type header claims.
    pub fn has_riff_marker(&self) -> bool {
        self.bytes.len() >= RIFF_MARKER.len() && &self.bytes[..RIFF_MARKER.len()] == RIFF_MARKER
    }

    /// Lossy text view of the body, used for substring matching and logs.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn snippet(&self) -> String {
        if self.is_audio() || self.has_riff_marker() {
            return format!("<{} bytes of {}>", self.bytes.len(), self.content_type);
        }
        snippet(&self.text())
    }

    /// Parse the body as JSON, whatever the declared content type.
    pub fn json(&self) -> Result<Value, HarnessError> {
        serde_json::from_slice(&self.bytes).map_err(|e| {
            HarnessError::Parse(format!(
                "HTTP {} body is not JSON ({}): {}",
                self.status,
                e,
                self.snippet()
            ))
        })
    }

    /// JSON body if it parses, `None` otherwise.
    pub fn json_opt(&self) -> Option<Value> {
        serde_json::from_slice(&self.bytes).ok()
    }

    /// Convert a non-2xx result into the matching taxonomy error.
    pub fn error_for_status(&self) -> Result<(), HarnessError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(HarnessError::from_status(self.status, self.snippet()))
        }
    }
}
