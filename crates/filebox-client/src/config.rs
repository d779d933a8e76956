//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/filebox/config.toml` by default:
//!
//! ```toml
//! [mailbox]
//! path = "/run/user/1000/filebox.mailbox"
//! poll_interval_ms = 100
//! timeout_ms = 3000
//! ```
//!
//! Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{ClientOptions, DEFAULT_TIMEOUT};
use filebox_server::{DEFAULT_POLL_INTERVAL, ServerConfig, default_mailbox_path};

/// Configuration for the filebox client and server commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Mailbox settings.
    pub mailbox: MailboxSettings,
}

/// Where the mailbox lives and how it is polled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxSettings {
    /// Path to the shared mailbox file.
    pub path: Option<PathBuf>,

    /// Delay between polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Client response timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for MailboxSettings {
    fn default() -> Self {
        Self {
            path: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the protocol cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.mailbox.poll_interval_ms == 0 {
            return Err("mailbox.poll_interval_ms must be greater than 0".to_string());
        }
        if self.mailbox.timeout_ms == 0 {
            return Err("mailbox.timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("filebox")
            .join("config.toml")
    }

    /// Mailbox path from the file, or the runtime-dir default.
    pub fn mailbox_path(&self) -> PathBuf {
        self.mailbox
            .path
            .clone()
            .unwrap_or_else(default_mailbox_path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.mailbox.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.mailbox.timeout_ms)
    }

    /// Client timing parameters from this configuration.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .with_timeout(self.timeout())
            .with_poll_interval(self.poll_interval())
    }

    /// Server parameters from this configuration.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::default().with_poll_interval(self.poll_interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_protocol_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.mailbox_path(), default_mailbox_path());
    }

    #[test]
    fn parses_mailbox_section() {
        let config: ClientConfig = toml::from_str(
            r#"
[mailbox]
path = "/tmp/custom.mailbox"
poll_interval_ms = 20
"#,
        )
        .unwrap();

        assert_eq!(config.mailbox_path(), PathBuf::from("/tmp/custom.mailbox"));
        assert_eq!(config.poll_interval(), Duration::from_millis(20));
        // Unset keys keep their defaults.
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn load_from_rejects_zero_interval() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[mailbox]\npoll_interval_ms = 0\n").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(err.contains("poll_interval_ms"));
    }

    #[test]
    fn load_from_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(ClientConfig::load_from(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn builds_client_and_server_parameters() {
        let config = ClientConfig {
            mailbox: MailboxSettings {
                timeout_ms: 1500,
                poll_interval_ms: 50,
                ..Default::default()
            },
            ..Default::default()
        };

        let options = config.client_options();
        assert_eq!(options.timeout, Duration::from_millis(1500));
        assert_eq!(options.poll_interval, Duration::from_millis(50));
        assert_eq!(
            config.server_config().poll_interval,
            Duration::from_millis(50)
        );
    }

    #[test]
    fn dumps_as_toml() {
        let dumped = toml::to_string_pretty(&ClientConfig::default()).unwrap();
        assert!(dumped.contains("[mailbox]"));
        assert!(dumped.contains("poll_interval_ms = 100"));
    }
}
