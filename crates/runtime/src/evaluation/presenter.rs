use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::result::{value_text, EvaluationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Strong,
    Acceptable,
    Weak,
    Poor,
}

impl ScoreBand {
    /// Thresholds are inclusive lower bounds, checked top-down. NaN lands in `Poor`.
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Self::Excellent
        } else if score >= 7.0 {
            Self::Strong
        } else if score >= 5.0 {
            Self::Acceptable
        } else if score >= 3.0 {
            Self::Weak
        } else {
            Self::Poor
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent - Hire immediately!",
            Self::Strong => "Strong - Good candidate",
            Self::Acceptable => "Acceptable - Needs some improvement",
            Self::Weak => "Weak - Significant gaps",
            Self::Poor => "Poor - Not ready",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationView {
    Success {
        score: String,
        band: ScoreBand,
        interpretation: String,
        strengths: Vec<String>,
        improvements: Vec<String>,
        final_comment: String,
    },
    Error {
        error: String,
        message: Option<String>,
        instructions: Option<String>,
    },
}

pub fn present(result: &EvaluationResult) -> EvaluationView {
    match result {
        EvaluationResult::Success(evaluation) => {
            let band = ScoreBand::from_score(evaluation.numeric_score());
            EvaluationView::Success {
                score: format!("{}/10", score_text(&evaluation.score)),
                band,
                interpretation: band.interpretation().to_string(),
                strengths: evaluation.strengths_text(),
                improvements: evaluation.improvements_text(),
                final_comment: evaluation.final_comment_text(),
            }
        }
        EvaluationResult::Failure(failure) => EvaluationView::Error {
            error: failure.error.clone(),
            message: failure.message.clone(),
            instructions: failure.instructions.clone(),
        },
    }
}

fn score_text(score: &Value) -> String {
    match score {
        Value::Null | Value::Bool(false) => "0".to_string(),
        Value::String(s) if s.is_empty() => "0".to_string(),
        other => value_text(other),
    }
}

impl fmt::Display for EvaluationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { score, interpretation, strengths, improvements, final_comment, .. } => {
                writeln!(f, "AI Evaluation Results")?;
                writeln!(f, "{}  {}", score, interpretation)?;
                writeln!(f)?;
                writeln!(f, "Strengths")?;
                for strength in strengths {
                    writeln!(f, "  - {}", strength)?;
                }
                writeln!(f)?;
                writeln!(f, "Areas for Improvement")?;
                for improvement in improvements {
                    writeln!(f, "  - {}", improvement)?;
                }
                writeln!(f)?;
                write!(f, "Overall Feedback: {}", final_comment)
            }
            Self::Error { error, message, instructions } => {
                write!(f, "Evaluation Error: {}", error)?;
                if let Some(message) = message {
                    write!(f, "\n{}", message)?;
                }
                if let Some(instructions) = instructions {
                    write!(f, "\n{}", instructions)?;
                }
                Ok(())
            }
        }
    }
}
