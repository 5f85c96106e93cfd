//! Service clients and orchestration for the task pipeline

pub mod embedding_client;
pub mod llm_client;
pub mod search;

pub use embedding_client::{cosine_similarity, EmbeddingClient, EmbeddingError};
pub use llm_client::{LlmClient, LlmError};
pub use search::{hybrid_search, parse_search_params, SearchParams};
