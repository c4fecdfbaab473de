use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::errors::HarnessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload attached to a probe.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    /// Serialized as `application/json`.
    Json(Value),
    /// Sent byte-for-byte with an optional explicit content type.
    Raw {
        content: String,
        content_type: Option<String>,
    },
    /// `application/x-www-form-urlencoded` pairs. An empty list sends no body.
    Form(Vec<(String, String)>),
}

/// One HTTP exchange to perform against the target.
///
/// Built through the chained constructors and never mutated once handed to
/// a [`ProbeClient`](super::ProbeClient).
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    method: Method,
    path: String,
    segments: Vec<String>,
    query: BTreeMap<String, String>,
    body: RequestBody,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl ProbeRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: BTreeMap::new(),
            body: RequestBody::None,
            headers: Vec::new(),
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Append a path segment. The segment is percent-encoded on resolution,
    /// so values like `Miyamai Moca` are safe to pass verbatim.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, HarnessError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn json_value(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn raw(mut self, content: impl Into<String>, content_type: Option<&str>) -> Self {
        self.body = RequestBody::Raw {
            content: content.into(),
            content_type: content_type.map(str::to_string),
        };
        self
    }

    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        self.body = RequestBody::Form(
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        );
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout_value(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolve against `base` into the absolute URL the transport will hit.
    pub fn resolve(&self, base: &Url) -> Result<Url, HarnessError> {
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)
            .map_err(|e| HarnessError::InvalidTarget(format!("{}: {}", joined, e)))?;

        if !self.segments.is_empty() {
            let mut segments = url.path_segments_mut().map_err(|_| {
                HarnessError::InvalidTarget(format!("{} cannot carry path segments", joined))
            })?;
            segments.pop_if_empty();
            for segment in &self.segments {
                segments.push(segment);
            }
        }

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Human-readable `METHOD path` label for logs.
    pub fn label(&self) -> String {
        let mut label = format!("{} {}", self.method, self.path);
        for segment in &self.segments {
            label.push('/');
            label.push_str(segment);
        }
        label
    }
}
