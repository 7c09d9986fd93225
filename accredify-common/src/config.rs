//! Configuration loading
//!
//! Resolution priority:
//! 1. Explicit config file path (command line / caller supplied)
//! 2. `ACCREDIFY_CONFIG` environment variable
//! 3. Per-user config file (`~/.config/accredify/config.toml`)
//! 4. Compiled defaults
//!
//! Individual fields can additionally be overridden by environment variables
//! (`ACCREDIFY_DB`, `ACCREDIFY_BIND`, `GEMINI_API_KEY`).

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Generative-AI fallback classifier settings.
///
/// The classifier is optional; when disabled or missing an API key the
/// frequency analyzer runs rule-based only.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// Whether the AI fallback is enabled at all
    #[serde(default)]
    pub enabled: bool,
    /// API key; absent key disables the fallback regardless of `enabled`
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    10
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: default_gemini_model(),
            timeout_secs: default_gemini_timeout_secs(),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite database file path
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// HTTP bind address (host:port)
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Optional AI fallback classifier settings
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("accredify").join("accredify.db"))
        .unwrap_or_else(|| PathBuf::from("./accredify.db"))
}

fn default_bind_address() -> String {
    "127.0.0.1:5810".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            bind_address: default_bind_address(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration following the resolution priority order
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_file(explicit_path) {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?
            }
            None => AppConfig::default(),
        };

        // Environment overrides for individual fields
        if let Ok(db) = std::env::var("ACCREDIFY_DB") {
            config.database_path = PathBuf::from(db);
        }
        if let Ok(bind) = std::env::var("ACCREDIFY_BIND") {
            config.bind_address = bind;
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini.api_key = Some(key);
        }

        Ok(config)
    }

    /// Whether the AI fallback classifier is usable
    pub fn gemini_available(&self) -> bool {
        self.gemini.enabled && self.gemini.api_key.is_some()
    }
}

/// Find the config file to read, if any
fn resolve_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("ACCREDIFY_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("accredify").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    None
}
