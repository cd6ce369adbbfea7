use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column filters on the question bank. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFilter {
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub topics: Option<String>,
}

impl QuestionFilter {
    pub fn new(question_type: Option<&str>, difficulty: Option<&str>) -> Self {
        Self {
            question_type: question_type.map(str::to_string),
            difficulty: difficulty.map(str::to_string),
            ..Default::default()
        }
    }

    /// PostgREST equality filters, e.g. `("difficulty", "eq.medium")`.
    pub fn postgrest_params(&self) -> Vec<(&'static str, String)> {
        [
            ("question_type", &self.question_type),
            ("difficulty", &self.difficulty),
            ("company", &self.company),
            ("topics", &self.topics),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then(|| (column, format!("eq.{}", value)))
        })
        .collect()
    }
}

/// A row of the question bank. Columns beyond the known ones are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    #[serde(default)]
    pub id: Option<Value>,
    pub question_text: String,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub topics: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InterviewQuestion {
    pub fn model_answer(&self) -> Option<&str> {
        self.answer_text.as_deref().filter(|answer| !answer.trim().is_empty())
    }
}
