//! Configuration loading and root folder resolution
//!
//! The root folder holds the SQLite database and any service state. It is
//! resolved with the following priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`TASKAGENT_ROOT_FOLDER`)
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "TASKAGENT_ROOT_FOLDER";

/// Contents of `~/.config/taskagent/config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder override
    pub root_folder: Option<String>,

    /// OpenAI API key (lowest-priority source; see taskagent-api config)
    pub openai_api_key: Option<String>,

    /// Override for the OpenAI-compatible API base URL
    pub openai_base_url: Option<String>,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging settings from the TOML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Resolve the service root folder
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(root_folder) = config.root_folder {
            return PathBuf::from(root_folder);
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Get the platform config file path (`<config dir>/taskagent/config.toml`)
pub fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("taskagent").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Load the TOML config file, or defaults when no file exists
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("taskagent"))
        .unwrap_or_else(|| PathBuf::from("./taskagent_data"))
}

/// Ensure the root folder directory exists, creating it if missing
pub fn ensure_root_folder(root: &std::path::Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        tracing::info!("Created root folder: {}", root.display());
    }
    Ok(())
}

/// Database file path inside the root folder
pub fn database_path(root: &std::path::Path) -> PathBuf {
    root.join("taskagent.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some("/tmp/taskagent-cli"));
        assert_eq!(root, PathBuf::from("/tmp/taskagent-cli"));
    }

    #[test]
    fn database_path_is_inside_root() {
        let db = database_path(std::path::Path::new("/data/taskagent"));
        assert_eq!(db, PathBuf::from("/data/taskagent/taskagent.db"));
    }

    #[test]
    fn toml_config_parses_all_fields() {
        let config: TomlConfig = toml::from_str(
            r#"
            root_folder = "/srv/taskagent"
            openai_api_key = "sk-test"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder.as_deref(), Some("/srv/taskagent"));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert!(config.root_folder.is_none());
        assert_eq!(config.logging.level, "info");
    }
}
