use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::prompt::EvaluationRequest;

/// The question an answer panel is bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionContext {
    pub panel_id: String,
    pub question: String,
    pub role: String,
    pub question_type: String,
    pub opened_at: DateTime<Utc>,
}

impl QuestionContext {
    pub fn request_for(&self, answer: &str) -> EvaluationRequest {
        EvaluationRequest::new(&self.question, answer)
            .with_role(Some(&self.role))
            .with_question_type(Some(&self.question_type))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("No answer panel with id {0}")]
    UnknownPanel(String),
    #[error("Please type an answer before submitting.")]
    EmptyAnswer,
}

/// Panel id -> question context. Opening an existing id replaces its question.
#[derive(Debug, Default)]
pub struct PanelStore {
    panels: RwLock<HashMap<String, QuestionContext>>,
}

impl PanelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(
        &self,
        panel_id: Option<String>,
        question: &str,
        role: Option<&str>,
        question_type: Option<&str>,
    ) -> QuestionContext {
        let defaults = EvaluationRequest::new(question, "")
            .with_role(role)
            .with_question_type(question_type);

        let panel_id = panel_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let context = QuestionContext {
            panel_id: panel_id.clone(),
            question: defaults.question,
            role: defaults.role,
            question_type: defaults.question_type,
            opened_at: Utc::now(),
        };

        tracing::debug!("[PanelStore::open] Panel {} bound to question {:?}", panel_id, context.question);
        self.panels.write().await.insert(panel_id, context.clone());
        context
    }

    pub async fn get(&self, panel_id: &str) -> Result<QuestionContext, PanelError> {
        self.panels
            .read()
            .await
            .get(panel_id)
            .cloned()
            .ok_or_else(|| PanelError::UnknownPanel(panel_id.to_string()))
    }

    pub async fn close(&self, panel_id: &str) -> Result<QuestionContext, PanelError> {
        self.panels
            .write()
            .await
            .remove(panel_id)
            .ok_or_else(|| PanelError::UnknownPanel(panel_id.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.panels.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_get_close() {
        let store = PanelStore::new();
        let context = store.open(Some("q-17".to_string()), "What is a p-value?", None, Some("statistics")).await;
        assert_eq!(context.panel_id, "q-17");
        assert_eq!(context.role, "Data Scientist");
        assert_eq!(context.question_type, "statistics");

        assert_eq!(store.get("q-17").await.unwrap(), context);
        assert_eq!(store.close("q-17").await.unwrap(), context);
        assert_eq!(store.get("q-17").await, Err(PanelError::UnknownPanel("q-17".to_string())));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_generated_ids_and_rebinding() {
        let store = PanelStore::new();
        let first = store.open(None, "Q1", None, None).await;
        let second = store.open(Some("  ".to_string()), "Q2", None, None).await;
        assert_ne!(first.panel_id, second.panel_id);
        assert_eq!(store.len().await, 2);

        store.open(Some(first.panel_id.clone()), "Q1 revised", Some("Analyst"), None).await;
        let rebound = store.get(&first.panel_id).await.unwrap();
        assert_eq!(rebound.question, "Q1 revised");
        assert_eq!(rebound.role, "Analyst");
        assert_eq!(store.len().await, 2);
    }

    #[test]
    fn test_request_for_carries_context() {
        let context = QuestionContext {
            panel_id: "p".to_string(),
            question: "Explain PCA".to_string(),
            role: "ML Engineer".to_string(),
            question_type: "technical".to_string(),
            opened_at: Utc::now(),
        };
        let request = context.request_for("Projects onto top eigenvectors.");
        assert_eq!(request.question, "Explain PCA");
        assert_eq!(request.role, "ML Engineer");
        assert_eq!(request.answer, "Projects onto top eigenvectors.");
    }
}
