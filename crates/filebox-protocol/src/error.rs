//! Mailbox error types.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Result type for mailbox operations.
pub type MailboxResult<T> = Result<T, MailboxError>;

/// Reasons a mailbox line fails to parse.
///
/// The `Display` text is the short reason the server embeds in its
/// `invalid_state:<reason>` reset record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line does not split into state, seq and payload.
    #[error("bad format")]
    BadFormat,

    /// The state field is not one of the known codes.
    #[error("bad state")]
    BadState,

    /// The seq field is not a non-negative integer.
    #[error("bad seq")]
    BadSeq,

    /// The file content is not UTF-8.
    #[error("invalid utf-8")]
    InvalidUtf8,
}

/// Errors that can occur while using the mailbox file.
#[derive(Debug, Error)]
pub enum MailboxError {
    /// The mailbox file does not exist.
    #[error("mailbox file missing: {path}")]
    FileMissing { path: String },

    /// Any other OS-level failure opening, locking, reading or writing.
    #[error("mailbox access failed ({path}): {source}")]
    Access { path: String, source: io::Error },

    /// The file exists but holds no data at all.
    #[error("empty file")]
    EmptyFile,

    /// The first line does not parse as a record.
    #[error("malformed record: {0}")]
    Malformed(#[from] ParseError),

    /// The payload would break the single-line format.
    #[error("payload must not contain line breaks")]
    InvalidPayload,
}

impl MailboxError {
    /// Maps an error from opening the file, treating `NotFound` as a missing mailbox.
    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::FileMissing {
                path: path.display().to_string(),
            }
        } else {
            Self::access(path, source)
        }
    }

    pub(crate) fn access(path: &Path, source: io::Error) -> Self {
        Self::Access {
            path: path.display().to_string(),
            source,
        }
    }

    /// Returns true if the mailbox content is unreadable as a record.
    ///
    /// Pollers treat these as transient; the server resets the mailbox.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::EmptyFile | Self::Malformed(_))
    }

    /// Short reason for an unreadable record, `None` for other errors.
    pub fn malformed_reason(&self) -> Option<String> {
        match self {
            Self::EmptyFile => Some("empty file".to_string()),
            Self::Malformed(reason) => Some(reason.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_file_missing() {
        let err = MailboxError::open(
            Path::new("/nowhere/mailbox"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(err, MailboxError::FileMissing { ref path } if path == "/nowhere/mailbox"));
    }

    #[test]
    fn other_open_errors_map_to_access() {
        let err = MailboxError::open(
            Path::new("/root/mailbox"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, MailboxError::Access { .. }));
        assert!(!err.is_malformed());
        assert_eq!(err.malformed_reason(), None);
    }

    #[test]
    fn malformed_reasons() {
        assert_eq!(
            MailboxError::EmptyFile.malformed_reason().as_deref(),
            Some("empty file")
        );
        assert_eq!(
            MailboxError::from(ParseError::BadSeq)
                .malformed_reason()
                .as_deref(),
            Some("bad seq")
        );
    }
}
