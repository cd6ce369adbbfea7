use std::sync::Arc;

use coach_common::CoachEnv;
use coach_runtime::{Evaluator, Highlighter, QuestionBank, SearchPipeline};

#[derive(Clone)]
pub struct CoachState {
    pub search: SearchPipeline,
    pub evaluator: Arc<Evaluator>,
    pub questions: QuestionBank,
    pub highlighter: Highlighter,
}

impl CoachState {
    pub fn new(search: SearchPipeline, evaluator: Evaluator, questions: QuestionBank) -> Self {
        Self {
            search,
            evaluator: Arc::new(evaluator),
            questions,
            highlighter: Highlighter::default(),
        }
    }

    pub fn from_env(env: &CoachEnv) -> Self {
        let state = Self::new(SearchPipeline::from_env(env), Evaluator::from_env(env), QuestionBank::from_env(env));
        tracing::info!(
            "[CoachState::from_env] search configured: {}, evaluation configured: {}, embedding providers: {:?}",
            state.search.is_configured(),
            state.evaluator.is_configured(),
            state.search.embedder().provider_names()
        );
        state
    }
}
