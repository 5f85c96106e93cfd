//! Configuration resolution for taskagent-api
//!
//! Provides multi-tier OpenAI credential resolution with
//! Database → ENV → TOML priority.

use sqlx::SqlitePool;
use taskagent_common::config::TomlConfig;
use taskagent_common::{Error, Result};
use tracing::{info, warn};

/// Environment variable carrying the OpenAI API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the OpenAI-compatible base URL
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Resolve the OpenAI API key from 3-tier configuration
///
/// **Priority:** Database → ENV → TOML
pub async fn resolve_openai_api_key(db: &SqlitePool, toml_config: &TomlConfig) -> Result<String> {
    let mut sources = Vec::new();

    // Tier 1: Database (authoritative)
    let db_key = crate::db::settings::get_openai_api_key(db)
        .await
        .map_err(|e| Error::Config(format!("Settings lookup failed: {e}")))?;
    if let Some(key) = &db_key {
        if is_valid_key(key) {
            sources.push("database");
        }
    }

    // Tier 2: Environment variable
    let env_key = std::env::var(API_KEY_ENV).ok();
    if let Some(key) = &env_key {
        if is_valid_key(key) {
            sources.push("environment");
        }
    }

    // Tier 3: TOML config
    let toml_key = toml_config.openai_api_key.as_ref();
    if let Some(key) = toml_key {
        if is_valid_key(key) {
            sources.push("TOML");
        }
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "OpenAI API key found in multiple sources: {}. Using database (highest priority).",
            sources.join(", ")
        );
    }

    // Resolution priority
    if let Some(key) = db_key {
        if is_valid_key(&key) {
            info!("OpenAI API key loaded from database");
            return Ok(key);
        }
    }

    if let Some(key) = env_key {
        if is_valid_key(&key) {
            info!("OpenAI API key loaded from environment variable");
            return Ok(key);
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(key) {
            info!("OpenAI API key loaded from TOML config");
            return Ok(key.clone());
        }
    }

    // No valid key found
    Err(Error::Config(
        "OpenAI API key not configured. Please configure using one of:\n\
         1. Environment: OPENAI_API_KEY=your-key-here\n\
         2. TOML config: ~/.config/taskagent/config.toml (openai_api_key = \"your-key\")\n\
         3. Settings table: INSERT INTO settings (key, value) VALUES ('openai_api_key', 'your-key')"
            .to_string(),
    ))
}

/// Resolve the OpenAI-compatible base URL override, if any.
///
/// **Priority:** ENV → TOML. `None` means the client default.
pub fn resolve_openai_base_url(toml_config: &TomlConfig) -> Option<String> {
    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.trim().is_empty() {
            return Some(url);
        }
    }
    toml_config.openai_base_url.clone()
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_invalid() {
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
        assert!(is_valid_key("sk-test"));
    }
}
