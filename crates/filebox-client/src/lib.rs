//! CLI, mailbox client, interactive shell
//!
//! This crate provides the `filebox` command-line interface and the client
//! half of the mailbox protocol.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use client::{ClientOptions, DEFAULT_TIMEOUT, MailboxClient, Reply};
pub use error::{ClientError, ClientResult};
