//! Flat-parameter ("Voicepeak") contract.
//!
//! Voices are listed under `{prefix}/narrators`, emotions under
//! `{prefix}/emotions[/{narrator}]`, and `{prefix}/synthesize` takes a flat
//! JSON object and answers with WAV bytes.

use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;
use super::request::ProbeRequest;
use super::result::ProbeResult;

/// Path layout of the legacy endpoints. The prefix is `/api` on the
/// containerized server and empty on older standalone builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPaths {
    prefix: String,
}

impl LegacyPaths {
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_end_matches('/');
        let prefix = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self { prefix }
    }

    pub fn narrators(&self) -> String {
        format!("{}/narrators", self.prefix)
    }

    pub fn emotions(&self) -> String {
        format!("{}/emotions", self.prefix)
    }

    pub fn synthesize(&self) -> String {
        format!("{}/synthesize", self.prefix)
    }
}

impl Default for LegacyPaths {
    fn default() -> Self {
        Self::new("/api")
    }
}

/// A numeric synthesis parameter. Attack payloads put arbitrary strings where
/// a number belongs, so both shapes are representable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(i64),
    Raw(String),
}

/// Body of `POST {prefix}/synthesize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SynthesisRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<NumericField>,
}

impl SynthesisRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_narrator(mut self, narrator: impl Into<String>) -> Self {
        self.narrator = Some(narrator.into());
        self
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    pub fn with_speed(mut self, speed: i64) -> Self {
        self.speed = Some(NumericField::Number(speed));
        self
    }

    pub fn with_pitch(mut self, pitch: i64) -> Self {
        self.pitch = Some(NumericField::Number(pitch));
        self
    }

    /// Place an arbitrary literal in the pitch field.
    pub fn with_raw_pitch(mut self, pitch: impl Into<String>) -> Self {
        self.pitch = Some(NumericField::Raw(pitch.into()));
        self
    }

    pub fn into_probe(self, paths: &LegacyPaths) -> Result<ProbeRequest, HarnessError> {
        ProbeRequest::post(paths.synthesize()).json(&self)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NarratorList {
    pub narrators: Vec<String>,
}

impl NarratorList {
    pub fn request(paths: &LegacyPaths) -> ProbeRequest {
        ProbeRequest::get(paths.narrators())
    }

    /// Accept only a 2xx JSON object carrying a `narrators` list.
    pub fn from_result(result: &ProbeResult) -> Result<Self, HarnessError> {
        result.error_for_status()?;
        serde_json::from_value(result.json()?)
            .map_err(|e| HarnessError::Parse(format!("narrator list: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmotionList {
    pub emotions: Vec<String>,
}

impl EmotionList {
    /// Emotions for the default narrator, or for `narrator` when given.
    pub fn request(paths: &LegacyPaths, narrator: Option<&str>) -> ProbeRequest {
        let request = ProbeRequest::get(paths.emotions());
        match narrator {
            Some(name) => request.segment(name),
            None => request,
        }
    }

    pub fn from_result(result: &ProbeResult) -> Result<Self, HarnessError> {
        result.error_for_status()?;
        serde_json::from_value(result.json()?)
            .map_err(|e| HarnessError::Parse(format!("emotion list: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths_normalise_prefix() {
        assert_eq!(LegacyPaths::new("/api/").narrators(), "/api/narrators");
        assert_eq!(LegacyPaths::new("api").synthesize(), "/api/synthesize");
        assert_eq!(LegacyPaths::new("").emotions(), "/emotions");
    }

    #[test]
    fn test_synthesis_request_skips_unset_fields() {
        let body = serde_json::to_value(SynthesisRequest::text("こんにちは")).unwrap();
        assert_eq!(body, json!({"text": "こんにちは"}));
    }

    #[test]
    fn test_synthesis_request_raw_numeric_is_a_string() {
        let body = serde_json::to_value(
            SynthesisRequest::text("テスト")
                .with_speed(120)
                .with_raw_pitch("NaN"),
        )
        .unwrap();
        assert_eq!(body, json!({"text": "テスト", "speed": 120, "pitch": "NaN"}));
    }

    #[test]
    fn test_narrator_list_parses() {
        let result = ProbeResult::new(200, "application/json", br#"{"narrators":["Miyamai Moca"]}"#.to_vec(), 1);
        let list = NarratorList::from_result(&result).unwrap();
        assert_eq!(list.narrators, vec!["Miyamai Moca".to_string()]);
    }

    #[test]
    fn test_narrator_list_rejects_missing_field() {
        let result = ProbeResult::new(200, "application/json", br#"{"voices":[]}"#.to_vec(), 1);
        assert!(matches!(NarratorList::from_result(&result), Err(HarnessError::Parse(_))));
    }

    #[test]
    fn test_emotion_list_rejects_error_status() {
        let result = ProbeResult::new(500, "application/json", br#"{"error":"down"}"#.to_vec(), 1);
        assert!(matches!(
            EmotionList::from_result(&result),
            Err(HarnessError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[test]
    fn test_emotion_request_with_narrator() {
        let request = EmotionList::request(&LegacyPaths::default(), Some("Miyamai Moca"));
        assert_eq!(request.label(), "GET /api/emotions/Miyamai Moca");
    }
}
