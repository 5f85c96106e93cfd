//! Hybrid search API handler

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::TaskView;
use crate::services;
use crate::AppState;

/// GET /tasks/search query string
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// GET /tasks/search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<TaskView>,
}

/// GET /tasks/search?query=...
///
/// Natural-language search: the model extracts filters and search terms,
/// then keyword matching and embedding similarity rank the candidates.
pub async fn search_tasks(
    State(state): State<AppState>,
    Query(request): Query<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let tasks =
        services::hybrid_search(&state.db, &state.llm, &state.embeddings, query).await?;

    let results: Vec<TaskView> = tasks.into_iter().map(TaskView::from).collect();

    Ok(Json(SearchResponse {
        query: query.to_string(),
        count: results.len(),
        results,
    }))
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/tasks/search", get(search_tasks))
}
