use serde::{Deserialize, Serialize};

/// Failure categories shared by both pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "configuration_error")]
    Configuration,
    #[serde(rename = "transport_error")]
    Transport,
    #[serde(rename = "no_content")]
    NoContent,
    #[serde(rename = "parse_error")]
    Parse,
    #[serde(rename = "invalid_input")]
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchBackendError {
    #[error("Search backend is not configured (missing {0})")]
    NotConfigured(String),
    #[error("Search request failed: {0}")]
    Transport(String),
    #[error("Search backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Search backend returned an unreadable body: {0}")]
    MalformedBody(String),
}

impl SearchBackendError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured(_) => ErrorKind::Configuration,
            Self::Transport(_) | Self::Status { .. } => ErrorKind::Transport,
            Self::MalformedBody(_) => ErrorKind::NoContent,
        }
    }

    pub fn hint(&self) -> &'static str {
        "Make sure SUPABASE_URL and SUPABASE_ANON_KEY are configured."
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationBackendError {
    #[error("Gemini API key not configured")]
    NotConfigured,
    #[error("Gemini API error: {message}")]
    Status { status: u16, message: String },
    #[error("Gemini API request failed: {0}")]
    Transport(String),
    #[error("No response from Gemini API")]
    NoContent,
}

impl EvaluationBackendError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured => ErrorKind::Configuration,
            Self::Status { .. } | Self::Transport(_) => ErrorKind::Transport,
            Self::NoContent => ErrorKind::NoContent,
        }
    }
}
