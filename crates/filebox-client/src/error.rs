//! Client error types.

use std::io;
use std::time::Duration;

use thiserror::Error;

use filebox_core::Seq;
use filebox_protocol::MailboxError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that end a client operation.
///
/// An `Error` record written by the server is not one of these: it is
/// delivered as [`Reply::RemoteError`](crate::Reply::RemoteError).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The mailbox file does not exist, so no server is running.
    #[error("server not available (mailbox file missing: {path})")]
    FileMissing { path: String },

    /// OS-level failure opening, locking, reading or writing the mailbox.
    #[error("mailbox access failed ({path}): {source}")]
    Access { path: String, source: io::Error },

    /// The mailbox content does not parse.
    #[error("invalid response: {reason}")]
    Malformed { reason: String },

    /// Another request is still waiting for the server.
    #[error("server busy (pending request seq={seq})")]
    Busy { seq: Seq },

    /// No answer arrived before the deadline.
    #[error("timeout waiting for response to seq={seq} after {:.1}s", waited.as_secs_f64())]
    Timeout { seq: Seq, waited: Duration },

    /// The payload cannot be stored in the single-line format.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Server startup or runtime error.
    #[error("server error: {0}")]
    Server(#[from] filebox_server::ServerError),

    /// IO error outside the mailbox (terminal, stdout).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<MailboxError> for ClientError {
    fn from(err: MailboxError) -> Self {
        match err {
            MailboxError::FileMissing { path } => Self::FileMissing { path },
            MailboxError::Access { path, source } => Self::Access { path, source },
            MailboxError::EmptyFile => Self::Malformed {
                reason: "empty file".to_string(),
            },
            MailboxError::Malformed(reason) => Self::Malformed {
                reason: reason.to_string(),
            },
            MailboxError::InvalidPayload => {
                Self::InvalidPayload("payload must not contain line breaks".to_string())
            }
        }
    }
}
