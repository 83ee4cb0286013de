//! Configuration management for the client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default API base URL (can be overridden at compile time via BOOKNOTE_API_URL env var).
pub const DEFAULT_API_URL: &str = match option_env!("BOOKNOTE_API_URL") {
    Some(url) => url,
    None => "http://localhost:8080/api",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Delay after the last keystroke before an availability check is sent.
pub const DEFAULT_CHECK_DEBOUNCE_MS: u64 = 500;

const API_URL_ENV: &str = "BOOKNOTE_API_URL";
const LOG_LEVEL_ENV: &str = "BOOKNOTE_LOG_LEVEL";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Base URL every API endpoint is resolved against.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Debounce delay for email/nickname availability checks.
    #[serde(default = "default_check_debounce_ms")]
    pub check_debounce_ms: u64,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_check_debounce_ms() -> u64 {
    DEFAULT_CHECK_DEBOUNCE_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api_url: default_api_url(),
            check_debounce_ms: DEFAULT_CHECK_DEBOUNCE_MS,
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults.
    /// Environment variables take precedence over the file.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.api_url()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_url) = lookup(API_URL_ENV) {
            self.api_url = api_url;
        }
        if let Some(log_level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = log_level;
        }
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_url(&self) -> CoreResult<Url> {
        let url = Url::parse(&self.api_url).map_err(CoreError::from)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CoreError::Config(format!(
                "API URL must use http or https, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.check_debounce_ms, 500);
    }

    #[test]
    fn test_config_load_from_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(&config_path, r#"{ "log_level": "debug" }"#).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.check_debounce_ms, DEFAULT_CHECK_DEBOUNCE_MS);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config {
            log_level: "trace".to_string(),
            api_url: "https://books.example.com/api".to_string(),
            check_debounce_ms: 250,
        };
        config.save(&paths).unwrap();

        let loaded = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.check_debounce_ms, DEFAULT_CHECK_DEBOUNCE_MS);
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BOOKNOTE_API_URL", "https://staging.example.com/api"),
            ("BOOKNOTE_LOG_LEVEL", "warn"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_url, "https://staging.example.com/api");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|_| Some("  ".to_string()));

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_api_url_parse() {
        let config = Config::default();
        let url = config.api_url().unwrap();
        assert!(url.scheme().starts_with("http"));
    }

    #[test]
    fn test_api_url_rejects_invalid_values() {
        let mut config = Config::default();
        config.api_url = "not a valid url".to_string();
        assert!(matches!(config.api_url(), Err(CoreError::InvalidUrl(_))));

        config.api_url = "ftp://books.example.com".to_string();
        assert!(matches!(config.api_url(), Err(CoreError::Config(_))));
    }
}
