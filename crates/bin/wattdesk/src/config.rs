//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `wattdesk.toml` in the working directory. Every field has a
//! default so the file is optional. Environment variables take precedence
//! over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use wattdesk_adapter_http_reqwest::ApiConfig;
use wattdesk_app::poller::PollerConfig;
use wattdesk_domain::user::Credentials;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote service endpoints.
    pub api: ApiConfig,
    /// Sign-in settings.
    pub auth: AuthConfig,
    /// Dashboard polling.
    pub dashboard: DashboardConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Sign-in settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// File holding the access token between runs.
    pub token_file: PathBuf,
    /// Sign in with these credentials on startup when both are set.
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Dashboard polling settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Refresh interval in milliseconds.
    pub refresh_ms: u64,
    /// Stop polling after this many failures in a row. Unset retries
    /// forever.
    pub max_consecutive_failures: Option<u32>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `wattdesk.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("wattdesk.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("WATTDESK_API_URL") {
            self.api.base_url = val;
        }
        if let Some(val) = var("WATTDESK_GRAPHQL_URL") {
            self.api.graphql_url = val;
        }
        if let Some(val) = var("WATTDESK_TOKEN_FILE") {
            self.auth.token_file = PathBuf::from(val);
        }
        if let Some(val) = var("WATTDESK_USERNAME") {
            self.auth.username = Some(val);
        }
        if let Some(val) = var("WATTDESK_PASSWORD") {
            self.auth.password = Some(val);
        }
        if let Some(ms) = var("WATTDESK_REFRESH_MS").and_then(|val| val.parse().ok()) {
            self.dashboard.refresh_ms = ms;
        }
        if let Some(val) = var("WATTDESK_MAX_FAILURES") {
            if val.eq_ignore_ascii_case("none") {
                self.dashboard.max_consecutive_failures = None;
            } else if let Ok(max) = val.parse() {
                self.dashboard.max_consecutive_failures = Some(max);
            }
        }
        if let Some(val) = var("WATTDESK_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("api.base_url must not be empty".to_string()));
        }
        if self.dashboard.refresh_ms == 0 {
            return Err(ConfigError::Validation(
                "dashboard.refresh_ms must be non-zero".to_string(),
            ));
        }
        if self.dashboard.max_consecutive_failures == Some(0) {
            return Err(ConfigError::Validation(
                "dashboard.max_consecutive_failures must be non-zero".to_string(),
            ));
        }
        if self.auth.username.is_some() != self.auth.password.is_some() {
            return Err(ConfigError::Validation(
                "auth.username and auth.password must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// Credentials to sign in with, when both halves are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.auth.username, &self.auth.password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    /// Poller settings derived from the dashboard section.
    #[must_use]
    pub fn poller(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(self.dashboard.refresh_ms),
            max_consecutive_failures: self.dashboard.max_consecutive_failures,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(".wattdesk/token"),
            username: None,
            password: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_ms: 5000,
            max_consecutive_failures: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "wattdesk=info,wattdesk_app=info,wattdesk_adapter_http_reqwest=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
