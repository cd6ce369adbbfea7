use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::json;

use coach_runtime::{present, EvaluationRequest, EvaluationResult, QaPair};

use crate::response::{AppError, AppSuccess};
use crate::CoachState;

/// `POST /evaluate`. The service binary bounds it with a 120 s request timeout.
pub fn evaluation_routes() -> Router<CoachState> {
    Router::new().route("/evaluate", post(evaluate))
}

/// `POST /evaluate/batch`. One model call per pair, in sequence, so the service
/// binary mounts it outside the request timeout.
pub fn batch_routes() -> Router<CoachState> {
    Router::new().route("/evaluate/batch", post(evaluate_batch))
}

/// Failed evaluations are still a successful request; the failure is the payload.
pub(crate) fn evaluation_response(result: EvaluationResult) -> AppSuccess {
    let message = if result.is_success() { "Answer evaluated successfully" } else { "Answer could not be evaluated" };
    AppSuccess::new(
        StatusCode::OK,
        message,
        json!({
            "view": present(&result),
            "evaluation": result,
        }),
    )
}

async fn evaluate(
    State(state): State<CoachState>,
    Json(payload): Json<EvaluationRequest>,
) -> Result<AppSuccess, AppError> {
    let result = state.evaluator.evaluate(&payload.normalized()).await;
    Ok(evaluation_response(result))
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub role: Option<String>,
    pub pairs: Vec<QaPair>,
}

async fn evaluate_batch(
    State(state): State<CoachState>,
    Json(payload): Json<BatchRequest>,
) -> Result<AppSuccess, AppError> {
    if payload.pairs.is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, anyhow::anyhow!("No question/answer pairs to evaluate")));
    }

    let report = state.evaluator.evaluate_batch(payload.pairs, payload.role.as_deref()).await;
    Ok(AppSuccess::new(StatusCode::OK, "Batch evaluated successfully", json!(report)))
}
