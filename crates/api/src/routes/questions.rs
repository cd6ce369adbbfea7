use axum::{extract::{Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use serde::Deserialize;
use serde_json::json;

use coach_clients::{InterviewQuestion, QuestionFilter};
use coach_runtime::{present, PracticeSession};

use crate::response::{search_backend_error, AppError, AppSuccess};
use crate::CoachState;

pub fn question_routes() -> Router<CoachState> {
    Router::new()
        .route("/questions", get(list_questions))
        .route("/questions/random", get(random_question))
        .route("/practice/answer", post(answer_question))
}

async fn list_questions(
    State(state): State<CoachState>,
    Query(filter): Query<QuestionFilter>,
) -> Result<AppSuccess, AppError> {
    let questions = state.questions.questions(&filter).await.map_err(search_backend_error)?;
    Ok(AppSuccess::new(StatusCode::OK, "Questions fetched successfully", json!(questions)))
}

async fn random_question(
    State(state): State<CoachState>,
    Query(filter): Query<QuestionFilter>,
) -> Result<AppSuccess, AppError> {
    let question = state
        .questions
        .random_question(&filter)
        .await
        .map_err(search_backend_error)?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, anyhow::anyhow!("No questions found matching criteria")))?;

    Ok(AppSuccess::new(StatusCode::OK, "Question fetched successfully", json!(question)))
}

#[derive(Debug, Deserialize)]
pub struct PracticeAnswerRequest {
    pub question: InterviewQuestion,
    pub answer: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// One practice round; the stored model answer comes back alongside the evaluation.
async fn answer_question(
    State(state): State<CoachState>,
    Json(payload): Json<PracticeAnswerRequest>,
) -> Result<AppSuccess, AppError> {
    if payload.answer.trim().is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, anyhow::anyhow!("Please type an answer before submitting.")));
    }

    let mut session = PracticeSession::new(QuestionFilter::default(), payload.role.as_deref());
    let role = session.role().to_string();
    let round = session.answer(&state.evaluator, payload.question, payload.answer.trim()).await;

    let message = if round.evaluation.is_success() { "Answer evaluated successfully" } else { "Answer could not be evaluated" };
    Ok(AppSuccess::new(
        StatusCode::OK,
        message,
        json!({
            "view": present(&round.evaluation),
            "evaluation": round.evaluation,
            "model_answer": round.question.model_answer(),
            "role": role,
        }),
    ))
}
