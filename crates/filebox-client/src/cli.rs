//! Command-line interface definition.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use filebox_core::TracingOutputFormat;
use filebox_protocol::Mailbox;
use filebox_server::ServerConfig;

use crate::client::ClientOptions;
use crate::config::ClientConfig;

/// filebox - request/response over a single shared file
#[derive(Debug, Parser)]
#[command(name = "filebox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "FILEBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the shared mailbox file
    #[arg(long, short = 'p', env = "FILEBOX_MAILBOX")]
    pub path: Option<PathBuf>,

    /// Seconds to wait for a server response
    #[arg(long, short = 't', value_parser = parse_seconds)]
    pub timeout: Option<Duration>,

    /// Seconds between two polls of the mailbox
    #[arg(long, short = 'i', value_parser = parse_seconds)]
    pub interval: Option<Duration>,

    /// Enable debug logging
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Log output format (compact, pretty, json)
    #[arg(long, default_value = "compact")]
    pub log_format: TracingOutputFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Mailbox handle: `--path`, then the config file, then the default.
    pub fn mailbox(&self, config: &ClientConfig) -> Mailbox {
        let path = self.path.clone().unwrap_or_else(|| config.mailbox_path());
        Mailbox::new(path)
    }

    /// Client timing with command-line overrides applied.
    pub fn client_options(&self, config: &ClientConfig) -> ClientOptions {
        let mut options = config.client_options();
        if let Some(timeout) = self.timeout {
            options = options.with_timeout(timeout);
        }
        if let Some(interval) = self.interval {
            options = options.with_poll_interval(interval);
        }
        options
    }

    /// Server parameters with command-line overrides applied.
    pub fn server_config(&self, config: &ClientConfig) -> ServerConfig {
        let server_config = config.server_config();
        match self.interval {
            Some(interval) => server_config.with_poll_interval(interval),
            None => server_config,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the server loop in the foreground until interrupted
    Server,

    /// Send one request and print the reply
    Send {
        /// Request payload, e.g. `ping`
        #[arg(allow_hyphen_values = true)]
        payload: String,
    },

    /// Interactive shell: every line is sent as a request (default)
    Shell,

    /// Show the record currently stored in the mailbox
    Status,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}

/// Parses a positive, possibly fractional, number of seconds.
pub fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {value}"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("seconds must be a positive number: {value}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration {value}: {e}"))
}
