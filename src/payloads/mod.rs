//! Static attack payloads for the security suite.
//!
//! Every set is a fixed literal list so two runs send byte-identical
//! requests. Payloads carry the markers a rejecting target is expected to
//! answer with; deciding pass or fail is left to [`crate::scoring`].

use serde::Serialize;

use crate::probe::legacy::SynthesisRequest;
use crate::scoring::SecurityCategory;

pub const DEFAULT_NARRATOR: &str = "Miyamai Moca";
pub const DEFAULT_EMOTION: &str = "honwaka";

/// Longest text the legacy contract accepts.
pub const MAX_TEXT_CHARS: usize = 1000;

const INJECTION_VALUES: [&str; 8] = [
    "; cat /etc/passwd",
    "& rm -rf /",
    "| ls -la",
    "`whoami`",
    "$(uname -a)",
    "narrator; echo vulnerable",
    "../../../etc/passwd",
    "takeru && cat /etc/passwd",
];

const INJECTION_SIGNALS: [&str; 6] = [
    "許可されていない",
    "無効",
    "不正な文字",
    "invalid_character",
    "invalid_narrator",
    "ナレーター名",
];

const XSS_VALUES: [&str; 6] = [
    "<script>alert('XSS')</script>",
    "<img src=x onerror=alert('XSS')>",
    "javascript:alert('XSS')",
    "<svg onload=alert('XSS')>",
    "<iframe src='javascript:alert(\"XSS\")'></iframe>",
    "';alert('XSS');//",
];

const XSS_SIGNALS: [&str; 7] = [
    "無効",
    "許可されていない",
    "不正な文字",
    "invalid_character",
    "invalid_text",
    "テキスト",
    "有効なテキストがありません",
];

const NUMERIC_CASES: [(&str, &str); 4] = [
    ("'; DROP TABLE users; --", "SQL injection in pitch"),
    ("999999999999999999", "integer overflow"),
    ("NaN", "non-numeric token"),
    ("$(rm -rf /)", "command substitution in pitch"),
];

const NUMERIC_SIGNALS: [&str; 11] = [
    "無効",
    "範囲外",
    "数値",
    "invalid_number",
    "ピッチ",
    "invalid_pitch",
    "SQLインジェクション",
    "コマンドインジェクション",
    "制御文字",
    "疑いがある文字",
    "有限の数値",
];

/// Synthesis field a payload is placed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadField {
    Narrator,
    Text,
    Emotion,
    /// Sent as a JSON string even though the contract expects a number.
    Pitch,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttackPayload {
    pub category: SecurityCategory,
    pub field: PayloadField,
    pub value: String,
    pub description: String,
    /// Markers a rejecting target answers with: machine codes and message text.
    pub signals: Vec<&'static str>,
    #[serde(skip)]
    request: SynthesisRequest,
}

impl AttackPayload {
    fn new(
        category: SecurityCategory,
        field: PayloadField,
        value: impl Into<String>,
        description: impl Into<String>,
        signals: &[&'static str],
        base: SynthesisRequest,
    ) -> Self {
        let value = value.into();
        let request = match field {
            PayloadField::Narrator => base.with_narrator(value.clone()),
            PayloadField::Text => SynthesisRequest { text: value.clone(), ..base },
            PayloadField::Emotion => base.with_emotion(value.clone()),
            PayloadField::Pitch => base.with_raw_pitch(value.clone()),
        };
        Self {
            category,
            field,
            value,
            description: description.into(),
            signals: signals.to_vec(),
            request,
        }
    }

    /// The legacy synthesis body carrying this payload.
    pub fn request(&self) -> &SynthesisRequest {
        &self.request
    }
}

/// Ordered collection of every attack payload.
#[derive(Debug, Clone)]
pub struct PayloadCatalog {
    payloads: Vec<AttackPayload>,
}

impl PayloadCatalog {
    /// The standard sets, aimed at the given voice.
    pub fn standard(narrator: &str, emotion: &str) -> Self {
        let voice = || {
            SynthesisRequest::text("テスト")
                .with_narrator(narrator)
                .with_emotion(emotion)
        };
        let mut payloads = Vec::new();

        for value in INJECTION_VALUES {
            payloads.push(AttackPayload::new(
                SecurityCategory::InjectionAttacks,
                PayloadField::Narrator,
                value,
                format!("shell metacharacters in narrator: {}", value),
                &INJECTION_SIGNALS,
                SynthesisRequest::text("テストです").with_emotion("normal"),
            ));
        }

        for value in XSS_VALUES {
            payloads.push(AttackPayload::new(
                SecurityCategory::XssAttacks,
                PayloadField::Text,
                value,
                format!("markup in text: {}", value),
                &XSS_SIGNALS,
                voice(),
            ));
        }

        let long_text = "a".repeat(MAX_TEXT_CHARS + 1);
        let validation: [(PayloadField, &str, &str, &[&'static str]); 5] = [
            (PayloadField::Narrator, "", "empty narrator", &["ナレーター", "invalid_narrator"]),
            (PayloadField::Text, "", "empty text", &["テキスト", "invalid_text"]),
            (PayloadField::Narrator, "invalid_narrator", "unknown narrator", &["許可されていない", "invalid_narrator"]),
            (PayloadField::Emotion, "invalid_emotion", "unknown emotion", &["感情", "invalid_emotion"]),
            (PayloadField::Text, long_text.as_str(), "text over 1000 characters", &["長すぎ", "invalid_text"]),
        ];
        for (field, value, description, signals) in validation {
            payloads.push(AttackPayload::new(
                SecurityCategory::InputValidation,
                field,
                value,
                description,
                signals,
                voice(),
            ));
        }

        for (value, description) in NUMERIC_CASES {
            payloads.push(AttackPayload::new(
                SecurityCategory::NumericAttacks,
                PayloadField::Pitch,
                value,
                description,
                &NUMERIC_SIGNALS,
                voice(),
            ));
        }

        Self { payloads }
    }

    pub fn for_category(&self, category: SecurityCategory) -> impl Iterator<Item = &AttackPayload> {
        self.payloads.iter().filter(move |p| p.category == category)
    }

    pub fn count(&self, category: SecurityCategory) -> usize {
        self.for_category(category).count()
    }

    pub fn all(&self) -> &[AttackPayload] {
        &self.payloads
    }
}

impl Default for PayloadCatalog {
    fn default() -> Self {
        Self::standard(DEFAULT_NARRATOR, DEFAULT_EMOTION)
    }
}
