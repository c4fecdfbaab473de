use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Target unreachable: {0}")]
    Connectivity(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Rejected request: HTTP {status}: {snippet}")]
    ClientContract { status: u16, snippet: String },

    #[error("Unexpected response: HTTP {status}: {snippet}")]
    UnexpectedStatus { status: u16, snippet: String },

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Container error: {0}")]
    Container(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Docker error: {0}")]
    Docker(#[from] bollard::errors::Error),
}

impl HarnessError {
    /// Build the error for a response that did not have the expected shape.
    /// 4xx statuses are contract rejections, everything else is unexpected.
    pub fn from_status(status: u16, snippet: impl Into<String>) -> Self {
        let snippet = snippet.into();
        if (400..500).contains(&status) {
            HarnessError::ClientContract { status, snippet }
        } else {
            HarnessError::UnexpectedStatus { status, snippet }
        }
    }

    /// Process exit code used when this error aborts a run.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::Config(_) | HarnessError::Yaml(_) => 2,
            HarnessError::Container(_) | HarnessError::Docker(_) => 3,
            _ => 1,
        }
    }
}
