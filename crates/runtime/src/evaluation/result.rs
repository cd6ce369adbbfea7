use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use coach_common::{ErrorKind, EvaluationBackendError};

pub const GEMINI_KEY_URL: &str = "https://aistudio.google.com/app/apikey";

/// The model's assessment, kept exactly as it was returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: Value,
    pub strengths: Vec<Value>,
    pub improvements: Vec<Value>,
    pub final_comment: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Evaluation {
    /// Numeric reading of `score`; anything unreadable counts as 0.
    pub fn numeric_score(&self) -> f64 {
        match &self.score {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            Value::Bool(true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn strengths_text(&self) -> Vec<String> {
        self.strengths.iter().map(value_text).collect()
    }

    pub fn improvements_text(&self) -> Vec<String> {
        self.improvements.iter().map(value_text).collect()
    }

    pub fn final_comment_text(&self) -> String {
        value_text(&self.final_comment)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationFailure {
    pub error: String,
    pub code: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    pub score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub final_comment: String,
}

impl EvaluationFailure {
    fn new(code: ErrorKind, error: impl Into<String>, improvement: impl Into<String>, final_comment: &str) -> Self {
        Self {
            error: error.into(),
            code,
            message: None,
            instructions: None,
            raw_response: None,
            score: 0,
            strengths: vec![],
            improvements: vec![improvement.into()],
            final_comment: final_comment.to_string(),
        }
    }

    pub fn not_configured() -> Self {
        let mut failure = Self::new(
            ErrorKind::Configuration,
            EvaluationBackendError::NotConfigured.to_string(),
            "Configure Gemini API to get evaluation",
            "Add your Gemini API key to enable AI-powered feedback.",
        );
        failure.message = Some("Please add your Gemini API key (GEMINI_API_KEY) to enable answer evaluation.".to_string());
        failure.instructions = Some(format!("Get a free API key at: {}", GEMINI_KEY_URL));
        failure
    }

    pub fn from_backend(err: &EvaluationBackendError) -> Self {
        if *err == EvaluationBackendError::NotConfigured {
            return Self::not_configured();
        }

        Self::new(
            err.kind(),
            err.to_string(),
            format!("Error: {}", err),
            "Unable to evaluate answer due to technical error. Please try again.",
        )
    }

    pub fn unparseable(raw: &str) -> Self {
        let mut failure = Self::new(
            ErrorKind::Parse,
            "Failed to parse evaluation",
            "Could not parse AI evaluation response",
            "Evaluation format error. Please try again.",
        );
        failure.raw_response = Some(raw.to_string());
        failure
    }

    pub fn empty_answer() -> Self {
        let mut failure = Self::new(
            ErrorKind::InvalidInput,
            "Answer is empty",
            "Provide an answer to get evaluation",
            "Type an answer and submit it again to get feedback.",
        );
        failure.message = Some("Please type an answer before submitting.".to_string());
        failure
    }
}

/// Either the model's assessment or a failure record, never a mix of both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvaluationResult {
    Failure(EvaluationFailure),
    Success(Evaluation),
}

impl EvaluationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn score(&self) -> f64 {
        match self {
            Self::Success(evaluation) => evaluation.numeric_score(),
            Self::Failure(failure) => failure.score as f64,
        }
    }

    pub fn as_success(&self) -> Option<&Evaluation> {
        match self {
            Self::Success(evaluation) => Some(evaluation),
            Self::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&EvaluationFailure> {
        match self {
            Self::Failure(failure) => Some(failure),
            Self::Success(_) => None,
        }
    }
}

impl From<EvaluationFailure> for EvaluationResult {
    fn from(failure: EvaluationFailure) -> Self {
        Self::Failure(failure)
    }
}

/// Strings as they are, everything else as compact JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
