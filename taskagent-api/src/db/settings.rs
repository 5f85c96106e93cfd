//! Settings persistence (key/value)

use anyhow::Result;
use sqlx::{Row, SqlitePool};

const OPENAI_API_KEY: &str = "openai_api_key";

/// Read a setting value
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get::<String, _>("value")))
}

/// Write a setting value (upsert)
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// OpenAI API key from the settings table, if stored
pub async fn get_openai_api_key(pool: &SqlitePool) -> Result<Option<String>> {
    get_setting(pool, OPENAI_API_KEY).await
}

/// Persist the OpenAI API key to the settings table
pub async fn set_openai_api_key(pool: &SqlitePool, key: &str) -> Result<()> {
    set_setting(pool, OPENAI_API_KEY, key).await
}
