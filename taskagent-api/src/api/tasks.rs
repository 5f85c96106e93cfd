//! Task API handlers
//!
//! POST /tasks/parse runs the full extraction pipeline: LLM → response
//! validation → priority resolution + due-date normalization → store. The
//! remaining routes are plain CRUD over stored tasks.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use taskagent_common::{Category, Priority};

use crate::dates::normalize_due_date;
use crate::db;
use crate::db::tasks::TaskChanges;
use crate::error::{ApiError, ApiResult};
use crate::inference::ScoreBoard;
use crate::models::{TaskInput, TaskUpdate, TaskView};
use crate::validators;
use crate::AppState;

/// POST /tasks/parse response
#[derive(Debug, Serialize)]
pub struct ParseTaskResponse {
    pub success: bool,
    pub task: TaskView,
    /// Scorer evidence when the priority came from the pattern engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ScoreBoard>,
}

/// POST /tasks/parse
///
/// Parse a free-text description into a structured task and store it.
/// Validation failures of the model payload abort the request; nothing is
/// persisted unless the whole pipeline succeeds.
pub async fn parse_task(
    State(state): State<AppState>,
    Json(input): Json<TaskInput>,
) -> ApiResult<Json<ParseTaskResponse>> {
    let description = input.description.trim();
    if description.is_empty() {
        return Err(ApiError::BadRequest(
            "description must not be empty".to_string(),
        ));
    }

    let raw = match state.llm.parse_task_description(description).await {
        Ok(raw) => raw,
        Err(e) => {
            *state.last_error.write().await = Some(e.to_string());
            return Err(e.into());
        }
    };

    let draft = validators::validate_and_extract(&raw)?;
    let task = draft.finalize(description);
    let reasoning = task.reasoning.clone();

    // A failed embedding downgrades search quality, never the request
    let embedding = match state.embeddings.embed(description).await {
        Ok(vector) => Some(vector),
        Err(e) => {
            tracing::warn!("Embedding generation failed, storing without vector: {}", e);
            None
        }
    };

    let stored = db::tasks::insert_task(&state.db, &task, embedding.as_deref()).await?;

    tracing::info!(
        task_id = %stored.guid,
        priority = %stored.priority,
        source = stored.priority_source.as_str(),
        confidence = stored.confidence_score,
        "Task parsed and stored"
    );

    Ok(Json(ParseTaskResponse {
        success: true,
        task: TaskView::from(stored),
        reasoning,
    }))
}

/// GET /tasks
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskView>>> {
    let tasks = db::tasks::list_tasks(&state.db).await?;
    Ok(Json(tasks.into_iter().map(TaskView::from).collect()))
}

/// GET /tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskView>> {
    let task = db::tasks::get_task(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {id}")))?;

    Ok(Json(TaskView::from(task)))
}

/// PUT /tasks/{id}
///
/// Partial update. A supplied due date is normalized the same way parsing
/// does; an unresolvable expression clears the stored date.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<TaskUpdate>,
) -> ApiResult<Json<TaskView>> {
    let mut changes = TaskChanges::default();

    if let Some(name) = update.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
        changes.name = Some(name);
    }

    if let Some(priority) = update.priority.as_deref() {
        let parsed = Priority::parse_known(priority).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "priority must be High, Medium, or Low (got {priority:?})"
            ))
        })?;
        changes.priority = Some(parsed);
    }

    if let Some(category) = update.category.as_deref() {
        changes.category = Some(Category::parse_lossy(category));
    }

    if let Some(due_date) = update.due_date.as_deref() {
        changes.due_date = Some(normalize_due_date(due_date));
    }

    let task = db::tasks::update_task(&state.db, id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {id}")))?;

    Ok(Json(TaskView::from(task)))
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = db::tasks::delete_task(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Task not found: {id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Build task CRUD routes
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks/parse", post(parse_task))
        .route("/tasks", get(list_tasks))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}
