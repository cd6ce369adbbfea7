use serde::{Deserialize, Serialize};

use super::prompt::{EvaluationRequest, DEFAULT_QUESTION_TYPE};
use super::requester::Evaluator;
use super::result::EvaluationResult;

fn default_question_type() -> String {
    DEFAULT_QUESTION_TYPE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    #[serde(default = "default_question_type")]
    pub question_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    #[serde(flatten)]
    pub pair: QaPair,
    pub evaluation: EvaluationResult,
}

/// Score statistics cover successful evaluations only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub average_score: Option<f64>,
    pub best_score: Option<f64>,
    pub lowest_score: Option<f64>,
}

impl BatchSummary {
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let scores = entries
            .iter()
            .filter(|entry| entry.evaluation.is_success())
            .map(|entry| entry.evaluation.score())
            .collect::<Vec<_>>();

        let average_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        Self {
            total: entries.len(),
            successful: scores.len(),
            failed: entries.len() - scores.len(),
            average_score,
            best_score: scores.iter().copied().reduce(f64::max),
            lowest_score: scores.iter().copied().reduce(f64::min),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub role: String,
    pub entries: Vec<BatchEntry>,
    pub summary: BatchSummary,
}

impl Evaluator {
    /// Evaluates pairs one after another under a single role.
    pub async fn evaluate_batch(&self, pairs: Vec<QaPair>, role: Option<&str>) -> BatchReport {
        let role = EvaluationRequest::new("", "").with_role(role).role;
        let total = pairs.len();
        let mut entries = Vec::with_capacity(total);

        for (idx, pair) in pairs.into_iter().enumerate() {
            tracing::info!("[Evaluator::evaluate_batch] Evaluating answer {}/{}", idx + 1, total);
            let request = EvaluationRequest::new(&pair.question, &pair.answer)
                .with_role(Some(&role))
                .with_question_type(Some(&pair.question_type));
            let evaluation = self.evaluate(&request).await;
            entries.push(BatchEntry { pair, evaluation });
        }

        let summary = BatchSummary::from_entries(&entries);
        tracing::info!(
            "[Evaluator::evaluate_batch] {} of {} answers evaluated, average score {:?}",
            summary.successful, summary.total, summary.average_score
        );
        BatchReport { role, entries, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{parse_evaluation, EvaluationFailure};

    fn entry(evaluation: EvaluationResult) -> BatchEntry {
        BatchEntry {
            pair: QaPair { question: "q".to_string(), answer: "a".to_string(), question_type: default_question_type() },
            evaluation,
        }
    }

    fn scored(score: u8) -> EvaluationResult {
        parse_evaluation(&format!(
            r#"{{"score": {}, "strengths": [], "improvements": [], "final_comment": "ok"}}"#,
            score
        ))
    }

    #[test]
    fn test_summary_ignores_failures() {
        let entries = vec![
            entry(scored(8)),
            entry(EvaluationFailure::unparseable("junk").into()),
            entry(scored(5)),
            entry(scored(0)),
        ];
        let summary = BatchSummary::from_entries(&entries);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.successful, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.best_score, Some(8.0));
        assert_eq!(summary.lowest_score, Some(0.0));
        assert!((summary.average_score.unwrap() - 13.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = BatchSummary::from_entries(&[entry(EvaluationFailure::not_configured().into())]);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.average_score, None);
        assert_eq!(summary.best_score, None);
    }

    #[test]
    fn test_pairs_default_question_type() {
        let pairs: Vec<QaPair> = serde_json::from_str(r#"[{"question": "q", "answer": "a"}]"#).unwrap();
        assert_eq!(pairs[0].question_type, "general");
    }

    #[tokio::test]
    async fn test_unconfigured_batch_keeps_every_pair() {
        let evaluator = Evaluator::new(None);
        let pairs = vec![
            QaPair { question: "q1".to_string(), answer: "a1".to_string(), question_type: default_question_type() },
            QaPair { question: "q2".to_string(), answer: "a2".to_string(), question_type: "coding".to_string() },
        ];
        let report = evaluator.evaluate_batch(pairs.clone(), Some("Analyst")).await;
        assert_eq!(report.role, "Analyst");
        assert_eq!(report.entries.iter().map(|e| e.pair.clone()).collect::<Vec<_>>(), pairs);
        assert_eq!(report.summary.failed, 2);
    }
}
