//! taskagent-api library interface
//!
//! Task-management backend: free-text descriptions go through a language
//! model, a response validator, priority resolution, and due-date
//! normalization before being stored with an embedding for hybrid search.
//! Exposed as a library so integration tests can drive the router.

pub mod api;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod inference;
pub mod models;
pub mod services;
pub mod validators;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::{EmbeddingClient, LlmClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Chat completion client for task and query parsing
    pub llm: Arc<LlmClient>,
    /// Embedding client for vector search
    pub embeddings: Arc<EmbeddingClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last upstream error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, llm: LlmClient, embeddings: EmbeddingClient) -> Self {
        Self {
            db,
            llm: Arc::new(llm),
            embeddings: Arc::new(embeddings),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::search_routes())
        .merge(api::task_routes())
        .with_state(state)
}
