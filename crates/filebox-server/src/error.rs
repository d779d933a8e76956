//! Server error types.

use std::io;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error outside the mailbox itself (signal setup, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Mailbox transport error.
    #[error("Mailbox error: {0}")]
    Mailbox(#[from] filebox_protocol::MailboxError),

    /// Mailbox path parent directory does not exist.
    #[error("Mailbox path parent directory does not exist: {path}")]
    MailboxPathInvalid { path: String },
}

impl ServerError {
    /// Creates a mailbox path invalid error.
    pub fn mailbox_path_invalid(path: impl Into<String>) -> Self {
        Self::MailboxPathInvalid { path: path.into() }
    }
}
