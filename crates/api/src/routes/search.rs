use std::num::NonZeroUsize;

use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use serde::Deserialize;
use serde_json::json;

use coach_clients::SearchFilter;
use coach_runtime::{render_results, Query};

use crate::response::{search_backend_error, search_error, AppError, AppSuccess};
use crate::CoachState;

pub fn search_routes() -> Router<CoachState> {
    Router::new()
        .route("/search", post(search))
        .route("/books", get(list_books))
        .route("/stats", get(stats))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub book_name: Option<String>,
    #[serde(default)]
    pub match_count: Option<NonZeroUsize>,
}

impl SearchRequest {
    fn filter(&self) -> SearchFilter {
        let filter = match self.match_count {
            Some(match_count) => SearchFilter::all_books(match_count),
            None => SearchFilter::default(),
        };
        filter.within_book(self.book_name.as_deref().unwrap_or_default())
    }
}

async fn search(
    State(state): State<CoachState>,
    Json(payload): Json<SearchRequest>,
) -> Result<AppSuccess, AppError> {
    let query = Query::parse(&payload.query).map_err(search_error)?;
    let filter = payload.filter();

    let results = state.search.search(&query, &filter).await.map_err(search_error)?;
    let rendered = render_results(&results, query.as_str(), &state.highlighter);

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Search completed successfully",
        json!({
            "query": query.as_str(),
            "filter": filter,
            "results": results,
            "rendered": rendered,
        }),
    ))
}

async fn list_books(State(state): State<CoachState>) -> Result<AppSuccess, AppError> {
    let books = state.search.list_books().await.map_err(search_backend_error)?;
    Ok(AppSuccess::new(StatusCode::OK, "Books fetched successfully", json!(books)))
}

async fn stats(State(state): State<CoachState>) -> Result<AppSuccess, AppError> {
    let stats = state.search.stats().await.map_err(search_backend_error)?;
    Ok(AppSuccess::new(StatusCode::OK, "Index statistics fetched successfully", json!(stats)))
}
