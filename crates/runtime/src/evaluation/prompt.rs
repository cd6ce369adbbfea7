use serde::{Deserialize, Serialize};

use coach_clients::GenerationConfig;

pub const DEFAULT_ROLE: &str = "Data Scientist";
pub const DEFAULT_QUESTION_TYPE: &str = "general";

pub const EVALUATION_GENERATION: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 1024,
};

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

fn default_question_type() -> String {
    DEFAULT_QUESTION_TYPE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub question: String,
    pub answer: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_question_type")]
    pub question_type: String,
}

impl EvaluationRequest {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            role: default_role(),
            question_type: default_question_type(),
        }
    }

    /// Blank keeps the default.
    pub fn with_role(mut self, role: Option<&str>) -> Self {
        if let Some(role) = role.map(str::trim).filter(|role| !role.is_empty()) {
            self.role = role.to_string();
        }
        self
    }

    pub fn with_question_type(mut self, question_type: Option<&str>) -> Self {
        if let Some(question_type) = question_type.map(str::trim).filter(|t| !t.is_empty()) {
            self.question_type = question_type.to_string();
        }
        self
    }

    /// Puts a deserialized request through the same defaulting as the builders.
    pub fn normalized(self) -> Self {
        let Self { question, answer, role, question_type } = self;
        Self::new(question, answer)
            .with_role(Some(&role))
            .with_question_type(Some(&question_type))
    }

    pub fn has_answer(&self) -> bool {
        !self.answer.trim().is_empty()
    }

    pub fn build_prompt(&self) -> String {
        format!(
r#"You are an expert interview evaluator for data science and software engineering roles.

Evaluate the candidate's answer in these categories:
- Clarity: Is the answer clear and well-structured?
- Relevance: Does it directly answer the question?
- Technical Depth: Shows understanding of concepts?
- Communication: Professional and articulate?
- Completeness: Covers key points?

Return ONLY valid JSON (no markdown, no code blocks):

{{
  "score": <0-10>,
  "strengths": ["point 1", "point 2", "point 3"],
  "improvements": ["point 1", "point 2"],
  "final_comment": "2-3 sentence summary with actionable advice"
}}

Question: {}
Answer: {}
Role: {}
Question Type: {}"#,
            self.question, self.answer, self.role, self.question_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let request = EvaluationRequest::new("What is overfitting?", "Memorizing noise.");
        assert_eq!(request.role, "Data Scientist");
        assert_eq!(request.question_type, "general");

        let request = request.with_role(Some("  ")).with_question_type(Some("technical"));
        assert_eq!(request.role, "Data Scientist");
        assert_eq!(request.question_type, "technical");

        let request: EvaluationRequest = serde_json::from_str(r#"{"question":"q","answer":"a"}"#).unwrap();
        assert_eq!(request.role, DEFAULT_ROLE);
    }

    #[test]
    fn test_prompt_carries_all_inputs() {
        let prompt = EvaluationRequest::new("Explain bagging", "Bootstrap then average.")
            .with_role(Some("ML Engineer"))
            .with_question_type(Some("technical"))
            .build_prompt();

        assert!(prompt.contains("Question: Explain bagging"));
        assert!(prompt.contains("Answer: Bootstrap then average."));
        assert!(prompt.contains("Role: ML Engineer"));
        assert!(prompt.contains("Question Type: technical"));
        assert!(prompt.contains("\"final_comment\""));
        assert!(prompt.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn test_blank_fields_from_json_fall_back_to_defaults() {
        let request: EvaluationRequest = serde_json::from_str(
            r#"{"question":"q","answer":"a","role":"","question_type":"  "}"#,
        ).unwrap();
        assert_eq!(request.role, "");

        let request = request.normalized();
        assert_eq!(request.role, DEFAULT_ROLE);
        assert_eq!(request.question_type, DEFAULT_QUESTION_TYPE);

        let request = EvaluationRequest::new("q", "a")
            .with_role(Some("Analyst"))
            .normalized();
        assert_eq!(request.role, "Analyst");
    }

    #[test]
    fn test_answer_presence() {
        assert!(!EvaluationRequest::new("q", " \n\t").has_answer());
        assert!(EvaluationRequest::new("q", "yes").has_answer());
    }
}
