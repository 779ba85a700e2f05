//! Configuration file parser for ~/.config/feedcast/config.toml.
//!
//! The config file is optional. A missing file yields `Config::default()`, and
//! the environment variables `RSS_FEED`, `SLACK_BOT_TOKEN` and `PORT` override
//! whatever the file says. Unknown keys are ignored but logged as warnings.
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::feed::DEFAULT_TTL;
use crate::notify::DEFAULT_API_BASE;
use crate::util::{validate_url, UrlValidationError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A required setting was not provided by the file or the environment.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid feed_url: {0}")]
    InvalidFeedUrl(#[from] UrlValidationError),

    #[error("Invalid listen_addr: {0}")]
    InvalidListenAddr(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
///
/// Custom Debug impl masks `slack_bot_token` so it never ends up in logs.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// RSS/Atom feed to answer commands from (env: `RSS_FEED`).
    pub feed_url: Option<String>,

    /// Name used in message text, e.g. "Soren Iverson post from 9/10/2024".
    pub source_name: String,

    /// Slash command this bot answers to.
    pub command: String,

    /// How long a fetched feed is reused, in seconds.
    pub cache_ttl_secs: u64,

    /// Address the slash-command endpoint binds to.
    pub listen_addr: String,

    /// Slack Web API root.
    pub slack_api_base: String,

    /// Bot token (env: `SLACK_BOT_TOKEN`, which takes precedence).
    pub slack_bot_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: None,
            source_name: "Soren Iverson".to_string(),
            command: "/soren".to_string(),
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            listen_addr: "0.0.0.0:3000".to_string(),
            slack_api_base: DEFAULT_API_BASE.to_string(),
            slack_bot_token: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("feed_url", &self.feed_url)
            .field("source_name", &self.source_name)
            .field("command", &self.command)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("listen_addr", &self.listen_addr)
            .field("slack_api_base", &self.slack_api_base)
            .field(
                "slack_bot_token",
                &self.slack_bot_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "feed_url",
        "source_name",
        "command",
        "cache_ttl_secs",
        "listen_addr",
        "slack_api_base",
        "slack_bot_token",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), command = %config.command, "Loaded configuration");
        Ok(config)
    }

    /// Applies environment overrides on top of the file values.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps an environment variable
    /// name to its value. Blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("RSS_FEED") {
            self.feed_url = Some(url);
        }
        if let Some(token) = get("SLACK_BOT_TOKEN") {
            self.slack_bot_token = Some(token);
        }
        if let Some(port) = get("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => {
                    let host = self
                        .listen_addr
                        .rsplit_once(':')
                        .map(|(host, _)| host.to_string())
                        .unwrap_or_else(|| self.listen_addr.clone());
                    self.listen_addr = format!("{host}:{port}");
                }
                Err(_) => tracing::warn!(port = %port, "Ignoring non-numeric PORT"),
            }
        }
        self
    }

    /// The validated feed URL.
    pub fn feed_url(&self) -> Result<url::Url, ConfigError> {
        let raw = self
            .feed_url
            .as_deref()
            .ok_or(ConfigError::Missing("feed_url (or RSS_FEED)"))?;
        Ok(validate_url(raw)?)
    }

    pub fn slack_bot_token(&self) -> Result<&str, ConfigError> {
        self.slack_bot_token
            .as_deref()
            .ok_or(ConfigError::Missing("slack_bot_token (or SLACK_BOT_TOKEN)"))
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(self.listen_addr.clone()))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
