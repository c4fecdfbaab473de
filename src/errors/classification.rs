use super::types::HarnessError;

/// Where an error sits in the harness failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Target could not be reached at all.
    Connectivity,
    /// Target rejected the request with a 4xx. Usually expected and asserted on.
    ClientContract,
    /// A status/body combination no check was prepared for.
    UnexpectedStatus,
    /// A success status whose body was not the JSON we expected.
    Parse,
    /// Failure in the harness itself (config, IO, docker).
    Harness,
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub kind: ErrorKind,
}

impl HarnessError {
    /// Classify this error to determine its taxonomy slot.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            HarnessError::Connectivity(_) => ErrorClassification {
                error_type: "ConnectivityError",
                kind: ErrorKind::Connectivity,
            },
            HarnessError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                kind: ErrorKind::Connectivity,
            },
            HarnessError::ClientContract { .. } => ErrorClassification {
                error_type: "ClientContractError",
                kind: ErrorKind::ClientContract,
            },
            HarnessError::UnexpectedStatus { .. } => ErrorClassification {
                error_type: "UnexpectedStatusError",
                kind: ErrorKind::UnexpectedStatus,
            },
            HarnessError::Parse(_) | HarnessError::Json(_) => ErrorClassification {
                error_type: "ParseError",
                kind: ErrorKind::Parse,
            },
            HarnessError::Container(_) | HarnessError::Docker(_) => ErrorClassification {
                error_type: "ContainerError",
                kind: ErrorKind::Harness,
            },
            HarnessError::Transport(_) => ErrorClassification {
                error_type: "TransportError",
                kind: ErrorKind::Harness,
            },
            HarnessError::Config(_) | HarnessError::Yaml(_) => ErrorClassification {
                error_type: "ConfigError",
                kind: ErrorKind::Harness,
            },
            HarnessError::InvalidTarget(_) => ErrorClassification {
                error_type: "InvalidTargetError",
                kind: ErrorKind::Harness,
            },
            HarnessError::Io(_) => ErrorClassification {
                error_type: "IoError",
                kind: ErrorKind::Harness,
            },
        }
    }
}
