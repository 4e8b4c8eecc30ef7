use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

const APP_DIR: &str = "news-aggregator";
const API_KEY_ENV: &str = "NEWS_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub news_api_key: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_query")]
    pub default_query: String,

    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("news_data.db").to_string_lossy().to_string()
}

fn default_api_url() -> String {
    "https://newsapi.org/v2/everything".to_string()
}

fn default_query() -> String {
    "technology".to_string()
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            news_api_key: None,
            api_url: default_api_url(),
            default_query: default_query(),
            export_dir: default_export_dir(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load from the user config dir, writing a default file on first run.
    /// `NEWS_API_KEY` in the environment takes precedence over the file.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.news_api_key = Some(key);
        }
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    // A blank key in the file means "not configured".
    fn normalize(&mut self) {
        if self
            .news_api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.news_api_key = None;
        }
    }

    fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "api_url must be http(s), got '{}'",
                self.api_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.default_query, "technology");
        assert_eq!(config.api_url, "https://newsapi.org/v2/everything");
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "db_path = \"/tmp/news.db\"\nnews_api_key = \"abc\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.db_path, "/tmp/news.db");
        assert_eq!(config.news_api_key.as_deref(), Some("abc"));
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.export_dir, ".");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "db_path = [").unwrap();

        assert!(matches!(Config::load_from(&path), Err(AppError::ConfigParse(_))));
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        let mut config = Config {
            news_api_key: Some("   ".to_string()),
            ..Config::default()
        };
        config.normalize();
        assert!(config.news_api_key.is_none());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad_scheme = Config {
            api_url: "ftp://newsapi.org/v2/everything".to_string(),
            ..Config::default()
        };
        assert!(matches!(bad_scheme.validate(), Err(AppError::Config(_))));

        let not_a_url = Config {
            api_url: "newsapi".to_string(),
            ..Config::default()
        };
        assert!(matches!(not_a_url.validate(), Err(AppError::Url(_))));

        let zero_timeout = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(matches!(zero_timeout.validate(), Err(AppError::Config(_))));
    }
}
