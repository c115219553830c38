//! Configuration management for compliance-form.
//!
//! Handles loading configuration from TOML files, plus the environment
//! override for the backend URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::schema::{QuestionSchema, SchemaError};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "COMPLIANCE_API_URL";

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".compliance-form.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend settings
    pub api: ApiConfig,

    /// Question schema settings
    pub schema: SchemaConfig,

    /// UI/TUI settings
    pub ui: UiConfig,
}

/// Backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the compliance procedure backend
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Question schema settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// TOML file replacing the built-in questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// UI/TUI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name (built-in: default, dracula, nord)
    pub theme: String,

    /// Where documents downloaded from the success dialog are saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.compliance-form.toml` in current directory
    /// 2. `~/.config/compliance-form/config.toml`
    /// 3. Falls back to defaults
    ///
    /// `COMPLIANCE_API_URL` is applied on top of whichever was found.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_file_or_default()?;
        config.apply_env();
        Ok(config)
    }

    fn load_file_or_default() -> anyhow::Result<Self> {
        // Try local config first
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try global config
        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// A relative `schema.path` is taken relative to the file's directory.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if let Some(schema_path) = config.schema.path.as_mut() {
                if schema_path.is_relative() {
                    *schema_path = dir.join(&*schema_path);
                }
            }
        }
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    /// The question schema to use: the configured file, or the built-in set.
    pub fn question_schema(&self) -> Result<QuestionSchema, SchemaError> {
        match &self.schema.path {
            Some(path) => QuestionSchema::load_from_file(path),
            None => Ok(QuestionSchema::compliance()),
        }
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("compliance-form"))
    }

    /// Get the data directory path (for logs and downloads).
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("compliance-form"))
    }
}

impl ApiConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl UiConfig {
    /// Directory downloads are written to.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:9090".to_string(), timeout_secs: 30 }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { theme: "default".to_string(), download_dir: None }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:9090");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert!(config.schema.path.is_none());
        assert_eq!(config.ui.theme, "default");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("base_url = \"http://localhost:9090\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [api]
            base_url = "https://procedures.internal"

            [schema]
            path = "questions.toml"

            [ui]
            theme = "nord"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://procedures.internal");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.schema.path, Some(PathBuf::from("questions.toml")));
        assert_eq!(config.ui.theme, "nord");
    }

    #[test]
    fn test_schema_path_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("compliance-form");
        std::fs::create_dir(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("questions.toml"),
            "[[questions]]\nid = \"scope\"\nlabel = \"Scope\"\n",
        )
        .unwrap();
        let config_file = config_dir.join("config.toml");
        std::fs::write(&config_file, "[schema]\npath = \"questions.toml\"\n").unwrap();

        let config = Config::load_from_file(&config_file).unwrap();
        assert_eq!(config.schema.path, Some(config_dir.join("questions.toml")));
        assert_eq!(config.question_schema().unwrap().len(), 1);

        let absolute = dir.path().join("elsewhere.toml");
        std::fs::write(&config_file, format!("[schema]\npath = {:?}\n", absolute)).unwrap();
        let config = Config::load_from_file(&config_file).unwrap();
        assert_eq!(config.schema.path, Some(absolute));
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let api = ApiConfig { timeout_secs: 0, ..ApiConfig::default() };
        assert_eq!(api.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_question_schema_from_config() {
        let config = Config::default();
        assert_eq!(config.question_schema().unwrap().len(), 15);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.toml");
        std::fs::write(&path, "[[questions]]\nid = \"only\"\nlabel = \"Only\"\n").unwrap();

        let mut config = Config::default();
        config.schema.path = Some(path);
        assert_eq!(config.question_schema().unwrap().len(), 1);
    }

    #[test]
    #[serial]
    fn test_env_overrides_base_url() {
        std::env::set_var(API_URL_ENV, "http://backend:9090");
        let mut config = Config::default();
        config.apply_env();
        std::env::remove_var(API_URL_ENV);

        assert_eq!(config.api.base_url, "http://backend:9090");
    }

    #[test]
    #[serial]
    fn test_blank_env_is_ignored() {
        std::env::set_var(API_URL_ENV, "  ");
        let mut config = Config::default();
        config.apply_env();
        std::env::remove_var(API_URL_ENV);

        assert_eq!(config.api.base_url, "http://localhost:9090");
    }
}
