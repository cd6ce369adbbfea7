use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde_json::json;

use crate::response::{AppError, AppSuccess};
use crate::CoachState;

pub fn misc_routes() -> Router<CoachState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<CoachState>) -> Result<AppSuccess, AppError> {
    Ok(AppSuccess::new(
        StatusCode::OK,
        "OK",
        json!({
            "search_configured": state.search.is_configured(),
            "evaluation_configured": state.evaluator.is_configured(),
            "questions_configured": state.questions.is_configured(),
            "embedding_providers": state.search.embedder().provider_names(),
            "embedding_dims": state.search.embedder().dims(),
            "open_panels": state.evaluator.panels().len().await,
        }),
    ))
}
