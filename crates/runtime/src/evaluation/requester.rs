use coach_clients::{GeminiClient, GenerationConfig};
use coach_common::{CoachEnv, EvaluationBackendError, ModuleClient};

use super::panels::{PanelError, PanelStore, QuestionContext};
use super::parser::parse_evaluation;
use super::prompt::{EvaluationRequest, EVALUATION_GENERATION};
use super::result::{EvaluationFailure, EvaluationResult};

/// Scores answers with a generative model. Owns the answer panels.
pub struct Evaluator {
    client: Option<GeminiClient>,
    generation: GenerationConfig,
    panels: PanelStore,
}

impl Evaluator {
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self {
            client,
            generation: EVALUATION_GENERATION,
            panels: PanelStore::new(),
        }
    }

    pub fn from_env(env: &CoachEnv) -> Self {
        Self::new(GeminiClient::from_env(env))
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn panels(&self) -> &PanelStore {
        &self.panels
    }

    /// One model call, returning the raw candidate text.
    pub async fn request_raw(&self, request: &EvaluationRequest) -> Result<String, EvaluationBackendError> {
        let client = self.client.as_ref().ok_or(EvaluationBackendError::NotConfigured)?;
        client.generate_content(&request.build_prompt(), &self.generation).await
    }

    pub async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResult {
        if !self.is_configured() {
            tracing::warn!("[Evaluator::evaluate] GEMINI_API_KEY is not configured, skipping evaluation");
            return EvaluationFailure::not_configured().into();
        }
        if !request.has_answer() {
            return EvaluationFailure::empty_answer().into();
        }

        tracing::info!("[Evaluator::evaluate] Evaluating a {} answer for role {}", request.question_type, request.role);
        match self.request_raw(request).await {
            Ok(text) => parse_evaluation(&text),
            Err(e) => {
                tracing::error!("[Evaluator::evaluate] Evaluation failed: {}", e);
                EvaluationFailure::from_backend(&e).into()
            }
        }
    }

    pub async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        role: Option<&str>,
        question_type: Option<&str>,
    ) -> EvaluationResult {
        let request = EvaluationRequest::new(question, answer)
            .with_role(role)
            .with_question_type(question_type);
        self.evaluate(&request).await
    }

    pub async fn open_panel(
        &self,
        panel_id: Option<String>,
        question: &str,
        role: Option<&str>,
        question_type: Option<&str>,
    ) -> QuestionContext {
        self.panels.open(panel_id, question, role, question_type).await
    }

    /// Evaluates an answer against the question the panel was opened with.
    pub async fn submit(&self, panel_id: &str, answer: &str) -> Result<EvaluationResult, PanelError> {
        let context = self.panels.get(panel_id).await?;
        if answer.trim().is_empty() {
            return Err(PanelError::EmptyAnswer);
        }
        Ok(self.evaluate(&context.request_for(answer)).await)
    }
}
