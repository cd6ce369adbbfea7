use std::sync::Arc;

use serde::Serialize;

use coach_clients::{InterviewQuestion, QuestionFilter, SupabaseClient};
use coach_common::{CoachEnv, ModuleClient, SearchBackendError};

use crate::evaluation::{EvaluationResult, Evaluator, ScoreBand, DEFAULT_ROLE};

pub const DEFAULT_PRACTICE_QUESTION_TYPE: &str = "ml";
pub const DEFAULT_PRACTICE_DIFFICULTY: &str = "medium";
pub const DEFAULT_PRACTICE_ROUNDS: usize = 5;

/// Where interview questions come from.
#[async_trait::async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_questions(&self, filter: &QuestionFilter) -> Result<Vec<InterviewQuestion>, SearchBackendError>;
}

#[async_trait::async_trait]
impl QuestionSource for SupabaseClient {
    async fn fetch_questions(&self, filter: &QuestionFilter) -> Result<Vec<InterviewQuestion>, SearchBackendError> {
        SupabaseClient::fetch_questions(self, filter).await
    }
}

#[derive(Clone)]
pub struct QuestionBank {
    source: Option<Arc<dyn QuestionSource>>,
}

impl QuestionBank {
    pub fn new(source: Option<Arc<dyn QuestionSource>>) -> Self {
        Self { source }
    }

    pub fn from_env(env: &CoachEnv) -> Self {
        Self::new(SupabaseClient::from_env(env).map(|client| Arc::new(client) as Arc<dyn QuestionSource>))
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    fn source(&self) -> Result<&Arc<dyn QuestionSource>, SearchBackendError> {
        self.source
            .as_ref()
            .ok_or_else(|| SearchBackendError::NotConfigured("SUPABASE_URL, SUPABASE_ANON_KEY".to_string()))
    }

    pub async fn questions(&self, filter: &QuestionFilter) -> Result<Vec<InterviewQuestion>, SearchBackendError> {
        self.source()?.fetch_questions(filter).await
    }

    /// A uniformly random match, or `None` when nothing matches the filter.
    pub async fn random_question(&self, filter: &QuestionFilter) -> Result<Option<InterviewQuestion>, SearchBackendError> {
        let mut questions = self.questions(filter).await?;
        if questions.is_empty() {
            tracing::info!("[QuestionBank::random_question] No questions match {:?}", filter.postgrest_params());
            return Ok(None);
        }
        let idx = rand::random_range(0..questions.len());
        Ok(Some(questions.swap_remove(idx)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeRound {
    pub question: InterviewQuestion,
    pub answer: String,
    pub evaluation: EvaluationResult,
}

/// Failed evaluations count with their score of 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total: usize,
    pub scores: Vec<f64>,
    pub average_score: f64,
    pub band: ScoreBand,
    pub interpretation: String,
}

impl SessionSummary {
    pub fn from_rounds(rounds: &[PracticeRound]) -> Self {
        let scores = rounds.iter().map(|round| round.evaluation.score()).collect::<Vec<_>>();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        let band = ScoreBand::from_score(average_score);

        Self {
            total: rounds.len(),
            scores,
            average_score,
            band,
            interpretation: band.interpretation().to_string(),
        }
    }
}

/// A run of questions drawn from one filter, answered under one role.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    filter: QuestionFilter,
    role: String,
    rounds: Vec<PracticeRound>,
}

impl PracticeSession {
    pub fn new(filter: QuestionFilter, role: Option<&str>) -> Self {
        let role = role
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .unwrap_or(DEFAULT_ROLE);

        Self { filter, role: role.to_string(), rounds: vec![] }
    }

    pub fn filter(&self) -> &QuestionFilter {
        &self.filter
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn rounds(&self) -> &[PracticeRound] {
        &self.rounds
    }

    pub async fn next_question(&self, bank: &QuestionBank) -> Result<Option<InterviewQuestion>, SearchBackendError> {
        bank.random_question(&self.filter).await
    }

    /// Evaluates the answer under the session's question type, falling back to the row's own.
    pub async fn answer(&mut self, evaluator: &Evaluator, question: InterviewQuestion, answer: &str) -> &PracticeRound {
        let question_type = self
            .filter
            .question_type
            .clone()
            .or_else(|| question.question_type.clone());

        let evaluation = evaluator
            .evaluate_answer(&question.question_text, answer, Some(&self.role), question_type.as_deref())
            .await;

        tracing::info!(
            "[PracticeSession::answer] Round {} scored {}",
            self.rounds.len() + 1, evaluation.score()
        );
        self.rounds.push(PracticeRound {
            question,
            answer: answer.to_string(),
            evaluation,
        });
        &self.rounds[self.rounds.len() - 1]
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_rounds(&self.rounds)
    }
}
