//! TOML configuration with environment and command-line overrides.
//!
//! Precedence, lowest first: built-in defaults, the config file,
//! `AIGHT_URL` / `AIGHT_TOKEN`, then `--url` / `--token`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use aight_core::keywords::{AUTOCOMPLETE_DEBOUNCE_MS, AUTOCOMPLETE_MAX_SUGGESTIONS};
use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_URL: &str = "ws://homeassistant.local:8123/api/websocket";
pub const DEFAULT_REPLY_TIMEOUT_SECS: u64 = 30;

pub const ENV_URL: &str = "AIGHT_URL";
pub const ENV_TOKEN: &str = "AIGHT_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub autocomplete: AutocompleteConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub url: String,
    /// Long-lived access token.
    pub token: Option<String>,
    pub reply_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            token: None,
            reply_timeout_secs: DEFAULT_REPLY_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutocompleteConfig {
    pub limit: usize,
    pub debounce_ms: u64,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            limit: AUTOCOMPLETE_MAX_SUGGESTIONS,
            debounce_ms: AUTOCOMPLETE_DEBOUNCE_MS,
        }
    }
}

impl Config {
    /// Load from `explicit` (which must exist) or from the default location
    /// (which may be absent).
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match explicit {
            Some(p) => (Some(p.to_path_buf()), true),
            None => (default_config_path(), false),
        };
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let limit = self.autocomplete.limit;
        if !(1..=AUTOCOMPLETE_MAX_SUGGESTIONS).contains(&limit) {
            anyhow::bail!("autocomplete.limit must be between 1 and {AUTOCOMPLETE_MAX_SUGGESTIONS}, got {limit}");
        }
        if self.server.reply_timeout_secs == 0 {
            anyhow::bail!("server.reply_timeout_secs must be positive");
        }
        if self.server.url.trim().is_empty() {
            anyhow::bail!("server.url is empty");
        }
        Ok(())
    }

    /// Apply environment overrides. `lookup` is `std::env::var(..).ok()` in
    /// the binary.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.is_empty()) {
            self.server.url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            self.server.token = Some(token);
        }
    }

    pub fn apply_cli(&mut self, url: Option<String>, token: Option<String>) {
        if let Some(url) = url {
            self.server.url = url;
        }
        if let Some(token) = token {
            self.server.token = Some(token);
        }
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.server.reply_timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.autocomplete.debounce_ms)
    }
}

/// `$XDG_CONFIG_HOME/aight/config.toml`, else `~/.config/aight/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join("aight/config.toml"));
        }
    }
    let home = std::env::var("HOME").ok().filter(|h| !h.is_empty())?;
    Some(PathBuf::from(home).join(".config/aight/config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.autocomplete.limit, 15);
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert_eq!(config.reply_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml("[autocomplete]\nlimit = 5\n").unwrap();
        assert_eq!(config.autocomplete.limit, 5);
        assert_eq!(config.autocomplete.debounce_ms, 150);
        assert_eq!(config.server.url, DEFAULT_URL);
    }

    #[test]
    fn limit_out_of_range_is_rejected() {
        assert!(Config::from_toml("[autocomplete]\nlimit = 0\n").is_err());
        assert!(Config::from_toml("[autocomplete]\nlimit = 16\n").is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("[server]\nhost = \"x\"\n").is_err());
    }

    #[test]
    fn env_then_cli_precedence() {
        let mut config = Config::from_toml("[server]\nurl = \"ws://file\"\ntoken = \"file\"\n").unwrap();
        config.apply_env(|key| match key {
            ENV_URL => Some("ws://env".into()),
            ENV_TOKEN => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.server.url, "ws://env");
        assert_eq!(config.server.token.as_deref(), Some("file"), "empty env value ignored");

        config.apply_cli(None, Some("cli".into()));
        assert_eq!(config.server.url, "ws://env");
        assert_eq!(config.server.token.as_deref(), Some("cli"));
    }
}
