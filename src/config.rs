use serde::{Deserialize, Serialize};
use std::fs;
use std::env;
use std::path::Path;
use anyhow::{Result, Context};

pub const DEFAULT_CONFIG_PATH: &str = "data/config.yaml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default = "default_favorites_path")]
    pub favorites_path: String,
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

fn default_user_agent() -> String {
    format!("staybook/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_token_path() -> String {
    "data/token".to_string()
}

fn default_favorites_path() -> String {
    "data/favorites.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            tracing_level: default_tracing_level(),
            user_agent: default_user_agent(),
            request_timeout_seconds: default_request_timeout_seconds(),
            token_path: default_token_path(),
            favorites_path: default_favorites_path(),
        }
    }
}

impl Config {
    /// Loads `data/config.yaml` (or defaults) and applies env overrides
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config: Config = if let Ok(config_str) = fs::read_to_string(path) {
            serde_yaml::from_str(&config_str)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Config::default()
        };

        config.apply_env_overrides(|key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Overrides fields from environment-style variables. `lookup` is
    /// injectable so overrides can be exercised without touching the
    /// process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("API_BASE_URL") {
            self.api_base_url = base_url;
        }

        if let Some(tracing_level) = lookup("TRACING_LEVEL") {
            self.tracing_level = tracing_level;
        }

        if let Some(user_agent) = lookup("USER_AGENT") {
            self.user_agent = user_agent;
        }

        if let Some(timeout) = lookup("REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = timeout.parse()
                .context("Failed to parse REQUEST_TIMEOUT_SECONDS environment variable")?;
        }

        if let Some(token_path) = lookup("TOKEN_PATH") {
            self.token_path = token_path;
        }

        if let Some(favorites_path) = lookup("FAVORITES_PATH") {
            self.favorites_path = favorites_path;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.api_base_url.trim();

        if base_url.is_empty() {
            anyhow::bail!("api_base_url is required (set via data/config.yaml or API_BASE_URL env var)");
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("api_base_url must start with http:// or https://, got '{}'", base_url);
        }

        if self.request_timeout_seconds == 0 {
            anyhow::bail!("request_timeout_seconds must be greater than zero");
        }

        Ok(())
    }

    pub fn create_default() -> Result<()> {
        Self::create_default_at(DEFAULT_CONFIG_PATH)
    }

    pub fn create_default_at(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let config_str = serde_yaml::to_string(&Config::default())?;
        fs::write(path, config_str)?;
        Ok(())
    }

    /// Parsed log level, `None` when the configured name is not a level
    pub fn log_level(&self) -> Option<tracing::Level> {
        match self.tracing_level.to_lowercase().as_str() {
            "trace" => Some(tracing::Level::TRACE),
            "debug" => Some(tracing::Level::DEBUG),
            "info" => Some(tracing::Level::INFO),
            "warn" => Some(tracing::Level::WARN),
            "error" => Some(tracing::Level::ERROR),
            _ => None,
        }
    }
}
