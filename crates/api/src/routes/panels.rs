use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{http::StatusCode, Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::response::{panel_error, AppError, AppSuccess};
use crate::routes::evaluation::evaluation_response;
use crate::CoachState;

pub fn panel_routes() -> Router<CoachState> {
    Router::new()
        .route("/panels", post(open_panel))
        .route("/panels/{id}", get(get_panel).delete(close_panel))
        .route("/panels/{id}/answer", post(submit_answer))
}

#[derive(Debug, Deserialize)]
pub struct OpenPanelRequest {
    #[serde(default)]
    pub panel_id: Option<String>,
    pub question: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub question_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: String,
}

async fn open_panel(
    State(state): State<CoachState>,
    Json(payload): Json<OpenPanelRequest>,
) -> Result<AppSuccess, AppError> {
    let context = state.evaluator
        .open_panel(payload.panel_id, &payload.question, payload.role.as_deref(), payload.question_type.as_deref())
        .await;
    Ok(AppSuccess::new(StatusCode::CREATED, "Panel opened successfully", json!(context)))
}

async fn get_panel(
    State(state): State<CoachState>,
    Path(id): Path<String>,
) -> Result<AppSuccess, AppError> {
    let context = state.evaluator.panels().get(&id).await.map_err(panel_error)?;
    Ok(AppSuccess::new(StatusCode::OK, "Panel fetched successfully", json!(context)))
}

async fn close_panel(
    State(state): State<CoachState>,
    Path(id): Path<String>,
) -> Result<AppSuccess, AppError> {
    let context = state.evaluator.panels().close(&id).await.map_err(panel_error)?;
    Ok(AppSuccess::new(StatusCode::OK, "Panel closed successfully", json!(context)))
}

async fn submit_answer(
    State(state): State<CoachState>,
    Path(id): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<AppSuccess, AppError> {
    let result = state.evaluator.submit(&id, &payload.answer).await.map_err(panel_error)?;
    Ok(evaluation_response(result))
}
