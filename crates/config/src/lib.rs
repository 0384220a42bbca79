//! Configuration loading and validation for TrialScout.
//!
//! Loads from `~/.trialscout/config.toml` with environment variable
//! overrides. A missing model API key is the one fatal configuration error:
//! everything else has a workable default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.trialscout/config.toml`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model endpoint settings
    #[serde(default)]
    pub model: ModelConfig,

    /// External data source settings
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Session slot settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Search result caps and defaults
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the model endpoint
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model_name")]
    pub model: String,
}

fn default_model_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model_name() -> String {
    "gpt-4o".into()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_model_base_url(),
            model: default_model_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Base URL of the primary trial search API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_api_base: Option<String>,

    /// Base URL of the patient-facing trial portal (for links)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_base: Option<String>,

    /// Base URL of the public registry API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_base: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session slot file path (defaults to `~/.trialscout/session.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum trials returned by a primary search
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Maximum studies returned by a registry-wide search
    #[serde(default = "default_max_registry_results")]
    pub max_registry_results: usize,

    /// Default radius for the registry-wide search, in miles
    #[serde(default = "default_radius_miles")]
    pub default_radius_miles: u32,
}

fn default_max_search_results() -> usize {
    20
}
fn default_max_registry_results() -> usize {
    10
}
fn default_radius_miles() -> u32 {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_search_results: default_max_search_results(),
            max_registry_results: default_max_registry_results(),
            default_radius_miles: default_radius_miles(),
        }
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("model", &self.model)
            .field("sources", &self.sources)
            .field("session", &self.session)
            .field("search", &self.search)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (`~/.trialscout/config.toml`).
    ///
    /// `OPENAI_API_KEY` in the environment takes priority over the file.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.model.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("TRIALSCOUT_MODEL") {
            config.model.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".trialscout")
    }

    /// The session slot file path, explicit or default.
    pub fn session_path(&self) -> PathBuf {
        self.session
            .path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("session.json"))
    }

    /// Validate the configuration.
    ///
    /// The model API key is the one requirement: without it no conversation
    /// can start, so the failure is fatal at creation rather than per-turn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::ValidationError(
                "no model API key configured: set OPENAI_API_KEY or model.api_key in config.toml"
                    .into(),
            ));
        }
        Ok(())
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_workable_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model.model, "gpt-4o");
        assert_eq!(config.search.max_search_results, 20);
        assert_eq!(config.search.default_radius_miles, 100);
    }

    #[test]
    fn missing_api_key_fails_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn present_api_key_passes_validation() {
        let config = AppConfig {
            model: ModelConfig {
                api_key: Some("sk-test".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_api_key_fails_validation() {
        let config = AppConfig {
            model: ModelConfig {
                api_key: Some("".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let config = AppConfig {
            model: ModelConfig {
                api_key: Some("sk-secret-value".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.search.max_registry_results, 10);
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[model]
api_key = "sk-file-key"
model = "gpt-4o-mini"

[sources]
trial_api_base = "https://api.example.org"

[search]
max_search_results = 5
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model.api_key.as_deref(), Some("sk-file-key"));
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(
            config.sources.trial_api_base.as_deref(),
            Some("https://api.example.org")
        );
        assert_eq!(config.search.max_search_results, 5);
        // Unset sections keep defaults
        assert_eq!(config.search.max_registry_results, 10);
    }

    #[test]
    fn malformed_config_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = not valid toml [").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn session_path_default_and_override() {
        let config = AppConfig::default();
        assert!(config.session_path().ends_with("session.json"));

        let config = AppConfig {
            session: SessionConfig {
                path: Some(PathBuf::from("/tmp/custom-slot.json")),
            },
            ..Default::default()
        };
        assert_eq!(
            config.session_path(),
            PathBuf::from("/tmp/custom-slot.json")
        );
    }
}
