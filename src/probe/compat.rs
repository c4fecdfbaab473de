//! Two-phase VoiceVox/AivisSpeech-compatible contract: create an audio
//! query, then submit that exact object to `/synthesis`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::HarnessError;
use super::request::ProbeRequest;
use super::result::ProbeResult;

pub const SPEAKERS_PATH: &str = "/speakers";
pub const AUDIO_QUERY_PATH: &str = "/audio_query";
pub const SYNTHESIS_PATH: &str = "/synthesis";
pub const DOCS_PATH: &str = "/docs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerStyle {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,
    #[serde(default)]
    pub speaker_uuid: String,
    #[serde(default)]
    pub styles: Vec<SpeakerStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerList {
    pub speakers: Vec<Speaker>,
}

impl SpeakerList {
    pub fn request() -> ProbeRequest {
        ProbeRequest::get(SPEAKERS_PATH)
    }

    /// Accept only a 2xx JSON array of speaker objects.
    pub fn from_result(result: &ProbeResult) -> Result<Self, HarnessError> {
        result.error_for_status()?;
        let value = result.json()?;
        if !value.is_array() {
            return Err(HarnessError::Parse(format!(
                "speaker list is not a JSON array: {}",
                result.snippet()
            )));
        }
        let speakers = serde_json::from_value(value)
            .map_err(|e| HarnessError::Parse(format!("speaker list: {}", e)))?;
        Ok(Self { speakers })
    }

    /// First style of the first speaker, the id the compat flow synthesizes with.
    pub fn first_style(&self) -> Option<(&Speaker, &SpeakerStyle)> {
        let speaker = self.speakers.first()?;
        speaker.styles.first().map(|style| (speaker, style))
    }
}

/// The opaque object returned by `/audio_query`.
///
/// It is forwarded to `/synthesis` exactly as received, so the raw JSON is
/// what is stored; the typed accessors are only read for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioQuery {
    raw: Value,
}

impl AudioQuery {
    /// Text and speaker as query parameters, the shape the engine documents.
    pub fn request(text: &str, speaker: i64) -> ProbeRequest {
        ProbeRequest::post(AUDIO_QUERY_PATH)
            .query("text", text)
            .query("speaker", speaker)
    }

    pub fn from_result(result: &ProbeResult) -> Result<Self, HarnessError> {
        result.error_for_status()?;
        let raw = result.json()?;
        if !raw.is_object() {
            return Err(HarnessError::Parse(format!(
                "audio query is not a JSON object: {}",
                result.snippet()
            )));
        }
        Ok(Self { raw })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn output_sampling_rate(&self) -> Option<i64> {
        self.raw.get("outputSamplingRate").and_then(Value::as_i64)
    }

    pub fn speed_scale(&self) -> Option<f64> {
        self.raw.get("speedScale").and_then(Value::as_f64)
    }

    pub fn accent_phrase_count(&self) -> Option<usize> {
        self.raw.get("accent_phrases").and_then(Value::as_array).map(Vec::len)
    }

    /// Fields a well-formed engine query carries that this one lacks.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        ["outputSamplingRate", "speedScale", "accent_phrases"]
            .into_iter()
            .filter(|field| self.raw.get(*field).is_none())
            .collect()
    }

    /// `/synthesis` request carrying this query unchanged.
    pub fn synthesis_request(&self, speaker: i64) -> ProbeRequest {
        ProbeRequest::post(SYNTHESIS_PATH)
            .query("speaker", speaker)
            .json_value(self.raw.clone())
    }
}

/// One entry of a structured 422 body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationDetail {
    pub loc: Value,
    pub msg: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

/// FastAPI-style validation error: `{"detail": [{"loc", "msg", "type"}, ...]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrorBody {
    pub detail: Vec<ValidationDetail>,
}

impl ValidationErrorBody {
    /// Parse a body whose `detail` list is non-empty and whose first entry
    /// carries `loc`, `msg` and `type`.
    pub fn parse(body: &Value) -> Result<Self, HarnessError> {
        let entries = body
            .get("detail")
            .and_then(Value::as_array)
            .ok_or_else(|| HarnessError::Parse("no `detail` list in error body".into()))?;

        let first = entries
            .first()
            .ok_or_else(|| HarnessError::Parse("`detail` list is empty".into()))?;
        for field in ["loc", "msg", "type"] {
            if first.get(field).is_none() {
                return Err(HarnessError::Parse(format!("first `detail` entry lacks `{}`", field)));
            }
        }

        let detail = entries
            .iter()
            .map(|entry| serde_json::from_value(entry.clone()))
            .collect::<Result<Vec<ValidationDetail>, _>>()
            .map_err(|e| HarnessError::Parse(format!("`detail` entry: {}", e)))?;
        Ok(Self { detail })
    }
}

pub fn docs_request(trailing_slash: bool) -> ProbeRequest {
    if trailing_slash {
        ProbeRequest::get(format!("{}/", DOCS_PATH))
    } else {
        ProbeRequest::get(DOCS_PATH)
    }
}
