use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use ips_client::DEFAULT_BASE_PATH;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::messages::Locale;

/// Environment variable that overrides the configured backend URL.
pub const SERVER_URL_ENV: &str = "IPS_API_URL";

/// CLI configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend URL (scheme, host, port)
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// REST path prefix on the backend
    #[serde(default = "default_base_path")]
    pub api_base_path: String,

    /// Display language
    #[serde(default)]
    pub locale: Locale,

    /// Alerts requested per fetch
    #[serde(default = "default_alert_limit")]
    pub alert_limit: u32,

    /// Seconds between alert refreshes in watch mode
    #[serde(default = "default_alert_poll_secs")]
    pub alert_poll_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

fn default_alert_limit() -> u32 {
    ips_client::DEFAULT_ALERT_LIMIT
}

fn default_alert_poll_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            api_base_path: default_base_path(),
            locale: Locale::default(),
            alert_limit: default_alert_limit(),
            alert_poll_secs: default_alert_poll_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CliConfig {
    /// Return the default config directory path: ~/.config/ips-admin/
    pub fn default_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("ips-admin");
        Ok(config_dir)
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            debug!(?config_path, "Config file not found, using defaults");
            let config = Self::default();
            // Create directory and write default config
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let toml_str = toml::to_string_pretty(&config)
                .context("failed to serialize default config")?;
            std::fs::write(&config_path, toml_str).ok();
            Ok(config)
        }
    }

    /// Resolve the backend URL.
    /// Priority: cli_override > IPS_API_URL > config file.
    pub fn resolve_server_url(&self, cli_override: Option<&str>) -> String {
        self.resolve_server_url_with(cli_override, std::env::var(SERVER_URL_ENV).ok())
    }

    fn resolve_server_url_with(&self, cli_override: Option<&str>, env_value: Option<String>) -> String {
        if let Some(url) = cli_override {
            return url.to_string();
        }
        if let Some(url) = env_value.filter(|v| !v.is_empty()) {
            return url;
        }
        self.server_url.clone()
    }

    /// Resolve the display language. Priority: cli_override > config file.
    pub fn resolve_locale(&self, cli_override: Option<Locale>) -> Locale {
        cli_override.unwrap_or(self.locale)
    }

    pub fn alert_poll_interval(&self) -> Duration {
        Duration::from_secs(self.alert_poll_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
