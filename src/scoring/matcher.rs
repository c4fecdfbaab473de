use serde::Serialize;
use serde_json::Value;

use crate::probe::compat::ValidationErrorBody;
use crate::probe::ProbeResult;

/// Body markers a target uses to report that its limiter rejected a request.
pub const RATE_LIMIT_MARKERS: [&str; 2] = ["rate_limit", "リクエスト制限"];

/// Why a response was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "basis", content = "value", rename_all = "snake_case")]
pub enum MatchBasis {
    /// A machine-readable `code`/`error` field carried an expected value.
    ErrorCode(String),
    /// The status was one the check designates as a rejection.
    Status(u16),
    /// Legacy fallback: an expected marker appeared in the body text.
    Marker(String),
    /// 422 with a `detail` list of `loc`/`msg`/`type` entries.
    Structured,
    /// 200, audio content type and a leading RIFF marker.
    Audio,
    /// Any 4xx.
    ClientError(u16),
}

impl std::fmt::Display for MatchBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ErrorCode(code) => write!(f, "error code '{}'", code),
            Self::Status(status) => write!(f, "rejected with HTTP {}", status),
            Self::Marker(marker) => write!(f, "marker '{}'", marker),
            Self::Structured => f.write_str("structured 422 body"),
            Self::Audio => f.write_str("audio with RIFF marker"),
            Self::ClientError(status) => write!(f, "HTTP {}", status),
        }
    }
}

/// Result of matching one response against one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Passed { basis: MatchBasis },
    /// The target's limiter answered instead of the logic under test.
    RateLimited,
    Failed { reason: String },
}

impl Verdict {
    pub fn failed(reason: impl Into<String>) -> Self {
        Verdict::Failed { reason: reason.into() }
    }

    /// Whether this verdict adds to a category tally. A rate-limited response
    /// counts only when the scoring policy accepts the limiter as a defense.
    pub fn counts(&self, rate_limit_counts_as_pass: bool) -> bool {
        match self {
            Verdict::Passed { .. } => true,
            Verdict::RateLimited => rate_limit_counts_as_pass,
            Verdict::Failed { .. } => false,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Verdict::RateLimited)
    }
}

/// Decides whether a response satisfies one check. Scenarios only ever see
/// this trait, so the matching heuristic can change without touching them.
pub trait ResponseMatcher: Send + Sync {
    fn evaluate(&self, result: &ProbeResult) -> Verdict;
}

/// True when the response is the target's limiter talking.
pub fn is_rate_limited(result: &ProbeResult) -> bool {
    if result.status() == 429 {
        return true;
    }
    if result.is_audio() {
        return false;
    }
    let body = result.text();
    RATE_LIMIT_MARKERS.iter().any(|marker| body.contains(marker))
}

/// String value of the machine-readable error field, if the body has one.
fn error_code(body: &Value) -> Option<&str> {
    ["code", "error"]
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_str))
}

/// Signals that look like machine codes (`invalid_narrator`) rather than prose.
fn is_machine_code(signal: &str) -> bool {
    !signal.is_empty()
        && signal
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Rejection check for hostile input.
///
/// A limiter response is `RateLimited`. Otherwise the `code`/`error` field is
/// consulted first, then the designated statuses, and the body substring
/// last, whatever the status. With `require_client_error` set, only a 4xx
/// can pass.
#[derive(Debug, Clone)]
pub struct IndicatorMatcher {
    codes: Vec<String>,
    markers: Vec<String>,
    statuses: Vec<u16>,
    require_client_error: bool,
}

impl IndicatorMatcher {
    pub fn new(signals: &[&str], statuses: &[u16]) -> Self {
        let codes = signals
            .iter()
            .filter(|s| is_machine_code(s))
            .map(|s| s.to_string())
            .collect();
        Self {
            codes,
            markers: signals.iter().map(|s| s.to_string()).collect(),
            statuses: statuses.to_vec(),
            require_client_error: false,
        }
    }

    pub fn require_client_error(mut self, require: bool) -> Self {
        self.require_client_error = require;
        self
    }
}

impl ResponseMatcher for IndicatorMatcher {
    fn evaluate(&self, result: &ProbeResult) -> Verdict {
        if is_rate_limited(result) {
            return Verdict::RateLimited;
        }
        if self.require_client_error && !result.is_client_error() {
            return Verdict::failed(format!("not a rejection: HTTP {}: {}", result.status(), result.snippet()));
        }

        if let Some(body) = result.json_opt() {
            if let Some(code) = error_code(&body) {
                if self.codes.iter().any(|c| c == code) {
                    return Verdict::Passed { basis: MatchBasis::ErrorCode(code.to_string()) };
                }
            }
        }

        if self.statuses.contains(&result.status()) {
            return Verdict::Passed { basis: MatchBasis::Status(result.status()) };
        }

        if !result.is_audio() && !result.has_riff_marker() {
            let body = result.text();
            if let Some(marker) = self.markers.iter().find(|m| body.contains(m.as_str())) {
                return Verdict::Passed { basis: MatchBasis::Marker(marker.clone()) };
            }
        }

        if result.is_success() {
            return Verdict::failed(format!("payload accepted with HTTP {}", result.status()));
        }
        Verdict::failed(format!("no rejection signal in HTTP {}: {}", result.status(), result.snippet()))
    }
}

/// Compat validation contract: 422 with a structured `detail` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredErrorMatcher;

impl ResponseMatcher for StructuredErrorMatcher {
    fn evaluate(&self, result: &ProbeResult) -> Verdict {
        if result.status() != 422 {
            return Verdict::failed(format!("expected HTTP 422, got {}", result.status()));
        }
        let body = match result.json() {
            Ok(body) => body,
            Err(e) => return Verdict::failed(e.to_string()),
        };
        match ValidationErrorBody::parse(&body) {
            Ok(_) => Verdict::Passed { basis: MatchBasis::Structured },
            Err(e) => Verdict::failed(e.to_string()),
        }
    }
}

/// Known-good synthesis: 200, `audio/*` and a RIFF container.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioMatcher;

impl ResponseMatcher for AudioMatcher {
    fn evaluate(&self, result: &ProbeResult) -> Verdict {
        if result.status() != 200 {
            return Verdict::failed(format!("HTTP {}: {}", result.status(), result.snippet()));
        }
        if !result.is_audio() {
            return Verdict::failed(format!("content type '{}' is not audio", result.content_type()));
        }
        if !result.has_riff_marker() {
            return Verdict::failed("audio body lacks RIFF marker");
        }
        Verdict::Passed { basis: MatchBasis::Audio }
    }
}

/// Legacy error cases only ask for a 400-class rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientErrorMatcher;

impl ResponseMatcher for ClientErrorMatcher {
    fn evaluate(&self, result: &ProbeResult) -> Verdict {
        if result.is_client_error() {
            Verdict::Passed { basis: MatchBasis::ClientError(result.status()) }
        } else {
            Verdict::failed(format!("expected a 4xx, got HTTP {}", result.status()))
        }
    }
}

/// 200 JSON object that carries `field`. Used by the legacy listing checks.
#[derive(Debug, Clone)]
pub struct JsonFieldMatcher {
    field: String,
}

impl JsonFieldMatcher {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: field.into() }
    }
}

impl ResponseMatcher for JsonFieldMatcher {
    fn evaluate(&self, result: &ProbeResult) -> Verdict {
        if !result.is_success() {
            return Verdict::failed(format!("HTTP {}: {}", result.status(), result.snippet()));
        }
        match result.json() {
            Ok(body) if body.get(&self.field).is_some() => Verdict::Passed {
                basis: MatchBasis::Marker(self.field.clone()),
            },
            Ok(_) => Verdict::failed(format!("no `{}` field: {}", self.field, result.snippet())),
            Err(e) => Verdict::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_result(status: u16, body: Value) -> ProbeResult {
        ProbeResult::new(status, "application/json", body.to_string().into_bytes(), 1)
    }

    fn injection_matcher() -> IndicatorMatcher {
        IndicatorMatcher::new(&["無効", "invalid_narrator", "invalid_character"], &[400, 422])
    }

    #[test]
    fn test_machine_code_split() {
        assert!(is_machine_code("invalid_narrator"));
        assert!(!is_machine_code("ナレーター名"));
        assert!(!is_machine_code(""));
    }

    #[test]
    fn test_error_code_field_wins() {
        let verdict = injection_matcher().evaluate(&json_result(403, json!({"code": "invalid_narrator"})));
        assert_eq!(verdict, Verdict::Passed { basis: MatchBasis::ErrorCode("invalid_narrator".into()) });
    }

    #[test]
    fn test_designated_status() {
        let verdict = injection_matcher().evaluate(&json_result(400, json!({"message": "bad"})));
        assert_eq!(verdict, Verdict::Passed { basis: MatchBasis::Status(400) });
    }

    #[test]
    fn test_marker_fallback() {
        let verdict = injection_matcher().evaluate(&json_result(403, json!({"message": "無効なナレーター"})));
        assert_eq!(verdict, Verdict::Passed { basis: MatchBasis::Marker("無効".into()) });
    }

    #[test]
    fn test_marker_counts_on_success_status() {
        let result = ProbeResult::new(200, "text/plain", "無効".as_bytes().to_vec(), 1);
        assert_eq!(
            injection_matcher().evaluate(&result),
            Verdict::Passed { basis: MatchBasis::Marker("無効".into()) }
        );
    }

    #[test]
    fn test_accepted_audio_fails() {
        let result = ProbeResult::new(200, "audio/wav", b"RIFF\0\0\0\0WAVE".to_vec(), 1);
        match injection_matcher().evaluate(&result) {
            Verdict::Failed { reason } => assert!(reason.contains("payload accepted")),
            other => panic!("unexpected verdict {:?}", other),
        }
    }

    #[test]
    fn test_strict_mode_requires_client_error() {
        let strict = injection_matcher().require_client_error(true);
        let accepted = ProbeResult::new(200, "text/plain", "無効".as_bytes().to_vec(), 1);
        let crashed = json_result(500, json!({"error": "invalid_character"}));
        assert!(matches!(strict.evaluate(&accepted), Verdict::Failed { .. }));
        assert!(matches!(strict.evaluate(&crashed), Verdict::Failed { .. }));
        assert_eq!(
            strict.evaluate(&json_result(403, json!({"error": "invalid_character"}))),
            Verdict::Passed { basis: MatchBasis::ErrorCode("invalid_character".into()) }
        );
    }

    #[test]
    fn test_rate_limit_detection() {
        let by_status = ProbeResult::new(429, "text/plain", b"slow down".to_vec(), 1);
        let by_marker = json_result(400, json!({"error": "rate_limit"}));
        assert_eq!(injection_matcher().evaluate(&by_status), Verdict::RateLimited);
        assert_eq!(injection_matcher().evaluate(&by_marker), Verdict::RateLimited);
    }

    #[test]
    fn test_rate_limited_counts_by_policy() {
        assert!(Verdict::RateLimited.counts(true));
        assert!(!Verdict::RateLimited.counts(false));
        assert!(!Verdict::failed("x").counts(true));
    }

    #[test]
    fn test_no_signal_fails() {
        let verdict = injection_matcher().evaluate(&json_result(404, json!({"message": "boom"})));
        assert!(matches!(verdict, Verdict::Failed { .. }));
    }

    #[test]
    fn test_server_error_with_signal_passes() {
        let body = json!({"error": "invalid_character", "message": "無効な文字"});
        assert_eq!(
            injection_matcher().evaluate(&json_result(500, body.clone())),
            Verdict::Passed { basis: MatchBasis::ErrorCode("invalid_character".into()) }
        );
        assert_eq!(
            injection_matcher().evaluate(&json_result(403, body)),
            Verdict::Passed { basis: MatchBasis::ErrorCode("invalid_character".into()) }
        );
        assert_eq!(
            injection_matcher().evaluate(&json_result(500, json!({"message": "無効"}))),
            Verdict::Passed { basis: MatchBasis::Marker("無効".into()) }
        );
    }

    #[test]
    fn test_structured_error_matcher() {
        let good = json_result(422, json!({"detail": [{"loc": ["query", "speaker"], "msg": "bad", "type": "value_error"}]}));
        let flat = json_result(422, json!({"error": "bad speaker"}));
        let wrong_status = json_result(400, json!({"detail": [{"loc": [], "msg": "bad", "type": "x"}]}));
        assert_eq!(StructuredErrorMatcher.evaluate(&good), Verdict::Passed { basis: MatchBasis::Structured });
        assert!(matches!(StructuredErrorMatcher.evaluate(&flat), Verdict::Failed { .. }));
        assert!(matches!(StructuredErrorMatcher.evaluate(&wrong_status), Verdict::Failed { .. }));
    }

    #[test]
    fn test_audio_matcher_requires_all_three() {
        let wav = ProbeResult::new(200, "audio/wav", b"RIFF\0\0\0\0WAVE".to_vec(), 1);
        let no_riff = ProbeResult::new(200, "audio/wav", b"ID3\0".to_vec(), 1);
        let json_200 = json_result(200, json!({"ok": true}));
        let server_error = ProbeResult::new(500, "audio/wav", b"RIFF".to_vec(), 1);
        assert_eq!(AudioMatcher.evaluate(&wav), Verdict::Passed { basis: MatchBasis::Audio });
        assert!(matches!(AudioMatcher.evaluate(&no_riff), Verdict::Failed { .. }));
        assert!(matches!(AudioMatcher.evaluate(&json_200), Verdict::Failed { .. }));
        assert!(matches!(AudioMatcher.evaluate(&server_error), Verdict::Failed { .. }));
    }

    #[test]
    fn test_client_error_matcher() {
        assert!(ClientErrorMatcher.evaluate(&json_result(400, json!({}))).counts(false));
        assert!(!ClientErrorMatcher.evaluate(&json_result(200, json!({}))).counts(false));
        assert!(!ClientErrorMatcher.evaluate(&json_result(500, json!({}))).counts(false));
    }

    #[test]
    fn test_json_field_matcher() {
        let matcher = JsonFieldMatcher::new("narrators");
        assert!(matcher.evaluate(&json_result(200, json!({"narrators": []}))).counts(false));
        assert!(!matcher.evaluate(&json_result(200, json!({"voices": []}))).counts(false));
        assert!(!matcher.evaluate(&json_result(503, json!({"narrators": []}))).counts(false));
    }
}
