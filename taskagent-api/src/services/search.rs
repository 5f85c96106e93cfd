//! Hybrid task search
//!
//! Combines three signals: structured filters extracted from the query by
//! the language model, keyword matching against task names, and
//! cosine similarity over stored embeddings. The LLM extraction is
//! best-effort; when it fails or returns junk, the raw query text becomes
//! the search terms.

use serde::Deserialize;
use sqlx::SqlitePool;

use taskagent_common::{Category, Priority};

use crate::db;
use crate::db::tasks::Task;
use crate::services::embedding_client::{cosine_similarity, EmbeddingClient};
use crate::services::llm_client::LlmClient;

/// Maximum number of results a search returns
const SEARCH_LIMIT: usize = 20;

/// Parameters the model extracts from a natural-language query
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct SearchParams {
    pub search_terms: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

/// Parse the model's search-parameter payload, leniently.
///
/// Unlike task extraction, a malformed payload here is not a request
/// failure; search degrades to plain keyword matching.
pub fn parse_search_params(raw: &str) -> Option<SearchParams> {
    serde_json::from_str(raw.trim()).ok()
}

/// Run a hybrid search over stored tasks
pub async fn hybrid_search(
    pool: &SqlitePool,
    llm: &LlmClient,
    embeddings: &EmbeddingClient,
    query: &str,
) -> anyhow::Result<Vec<Task>> {
    let params = match llm.parse_search_query(query).await {
        Ok(raw) => parse_search_params(&raw).unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Search query extraction failed, using raw query: {}", e);
            SearchParams::default()
        }
    };

    let terms = params
        .search_terms
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(query)
        .to_string();

    let priority_filter = params.priority.as_deref().and_then(Priority::parse_known);
    let category_filter = params.category.as_deref().and_then(Category::parse_known);

    let candidates =
        db::tasks::list_tasks_filtered(pool, priority_filter, category_filter).await?;

    let query_embedding = match embeddings.embed(&terms).await {
        Ok(vector) => Some(vector),
        Err(e) => {
            tracing::warn!("Query embedding failed, ranking by keywords only: {}", e);
            None
        }
    };

    let mut ranked: Vec<(f32, Task)> = candidates
        .into_iter()
        .map(|task| {
            let score = score_task(&task, &terms, query_embedding.as_deref());
            (score, task)
        })
        .collect();

    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    // A filter-only query ("show high priority tasks") may score nothing;
    // the filtered list itself is then the answer.
    let any_scored = ranked.iter().any(|(score, _)| *score > 0.0);
    let results = ranked
        .into_iter()
        .filter(|(score, _)| !any_scored || *score > 0.0)
        .take(SEARCH_LIMIT)
        .map(|(_, task)| task)
        .collect();

    Ok(results)
}

/// Keyword hits on the task name plus cosine similarity of embeddings
fn score_task(task: &Task, terms: &str, query_embedding: Option<&[f32]>) -> f32 {
    let name = task.name.to_lowercase();
    let keyword_hits = terms
        .to_lowercase()
        .split_whitespace()
        .filter(|term| name.contains(term))
        .count();

    let similarity = match (query_embedding, task.embedding.as_deref()) {
        (Some(query), Some(stored)) => cosine_similarity(query, stored).max(0.0),
        _ => 0.0,
    };

    keyword_hits as f32 + similarity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_params_parse() {
        let params = parse_search_params(
            r#"{"search_terms": "tax documents", "priority": null, "category": "Finance"}"#,
        )
        .unwrap();
        assert_eq!(params.search_terms.as_deref(), Some("tax documents"));
        assert_eq!(params.priority, None);
        assert_eq!(params.category.as_deref(), Some("Finance"));
    }

    #[test]
    fn malformed_params_degrade_to_none() {
        assert_eq!(parse_search_params("not json"), None);
        assert_eq!(parse_search_params(""), None);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let params =
            parse_search_params(r#"{"search_terms": "rent", "limit": 5}"#).unwrap();
        assert_eq!(params.search_terms.as_deref(), Some("rent"));
    }
}
