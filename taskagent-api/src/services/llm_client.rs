//! OpenAI-compatible chat completion client
//!
//! Issues the task-extraction and search-query prompts and returns the raw
//! text payload. The payload is never parsed here; the response validator
//! owns that. Requests are spaced by a minimum interval to stay polite
//! toward the upstream API.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

/// Default OpenAI-compatible API base
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const CHAT_MODEL: &str = "gpt-3.5-turbo";
const MAX_COMPLETION_TOKENS: u32 = 100;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const RATE_LIMIT_MS: u64 = 200;

const TASK_SYSTEM_PROMPT: &str = "\
You are a task management assistant that analyzes tasks and provides structured data.
You must always return a confidence_score (0-100) indicating your certainty in the analysis.

Confidence Score Guidelines:
- 90-100: Very clear task with explicit deadline and priority indicators
- 70-89:  Clear task with some explicit indicators
- 50-69:  Basic task with implicit indicators
- 0-49:   Ambiguous task with minimal context";

const SEARCH_SYSTEM_PROMPT: &str = "\
Extract search parameters from natural language queries about tasks.
Return a JSON object with these fields:
- search_terms: key words for searching (remove words like \"show\", \"me\", \"all\", \"tasks\")
- priority: \"High\"/\"Medium\"/\"Low\" if mentioned
- category: \"Work\"/\"Personal\"/\"Finance\" if mentioned

Examples:
\"show me all high priority tasks\"
{
    \"search_terms\": \"high priority\",
    \"priority\": \"High\",
    \"category\": null
}

\"find tax documents in finance category\"
{
    \"search_terms\": \"tax documents\",
    \"priority\": null,
    \"category\": \"Finance\"
}";

/// LLM client errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Completion response contained no content")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: &'static str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

/// Minimum-interval rate limiter shared across request tasks
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the request spacing
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Chat completion client for task parsing
pub struct LlmClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<RateLimiter>,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
        })
    }

    /// Extract structured task data from a free-text description.
    ///
    /// Returns the raw completion text; validation happens downstream.
    pub async fn parse_task_description(&self, description: &str) -> Result<String, LlmError> {
        let user_prompt = format!(
            r#"Extract structured data from this task description. Return a JSON object with:

- name: Short, clear task name
- due_date: Date in YYYY-MM-DD format, or null if not specified
- priority: Based on these rules:
    * High: Contains "urgent", "ASAP", "immediately", "before [date]"
    * Medium: Has deadline but no urgency
    * Low: No time sensitivity
- category: Work/Personal/Finance/Other
- confidence_score: Your certainty (0-100) based on:
    * Clarity of task description
    * Presence of explicit deadline
    * Clear priority indicators
    * Category clarity

Example response:
{{
    "name": "Submit tax documents",
    "due_date": "2025-04-15",
    "priority": "High",
    "category": "Finance",
    "confidence_score": 95
}}

Respond ONLY with a valid JSON object.

Task Description: {description}"#
        );

        self.chat(vec![
            ChatMessage {
                role: "system",
                content: TASK_SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: user_prompt,
            },
        ])
        .await
    }

    /// Extract search parameters from a natural-language query.
    ///
    /// Returns the raw completion text (expected: JSON with search_terms,
    /// priority, category).
    pub async fn parse_search_query(&self, query: &str) -> Result<String, LlmError> {
        self.chat(vec![
            ChatMessage {
                role: "system",
                content: SEARCH_SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: query.to_string(),
            },
        ])
        .await
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        self.rate_limiter.wait().await;

        let request = ChatRequest {
            model: CHAT_MODEL,
            max_tokens: MAX_COMPLETION_TOKENS,
            messages,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Auth(body));
        }
        if status.as_u16() == 429 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RateLimited(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(status.as_u16(), body));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(tokens_used = usage.total_tokens, "Chat completion finished");
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}
