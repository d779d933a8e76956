//! The single record held by a mailbox file.
//!
//! A mailbox stores exactly one [`Record`] at a time. The client moves it
//! from an answered state to [`RecordState::Request`]; the server moves it
//! back to [`RecordState::Response`] or [`RecordState::Error`] under the
//! same sequence number.

use std::fmt;

/// Client-assigned sequence number used to match a request to its answer.
pub type Seq = u64;

/// State of the mailbox slot.
///
/// The integer codes are part of the file format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordState {
    /// The server rejected the request, or reset a corrupted mailbox.
    Error,
    /// The server answered the request successfully (also the idle state).
    Response,
    /// A client request is waiting for the server.
    Request,
}

impl RecordState {
    /// Returns the integer code written to the mailbox file.
    pub fn code(self) -> i8 {
        match self {
            Self::Error => -1,
            Self::Response => 0,
            Self::Request => 1,
        }
    }

    /// Maps a file code back to a state.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::Error),
            0 => Some(Self::Response),
            1 => Some(Self::Request),
            _ => None,
        }
    }

    /// Returns true if the slot holds a request nobody has answered yet.
    pub fn is_pending(self) -> bool {
        self == Self::Request
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Response => "response",
            Self::Request => "request",
        };
        f.write_str(name)
    }
}

/// The structured content of the mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Slot state.
    pub state: RecordState,
    /// Sequence number of the request this record belongs to.
    pub seq: Seq,
    /// Free-form payload; may contain the field delimiter.
    pub payload: String,
}

impl Record {
    /// Creates a record.
    pub fn new(state: RecordState, seq: Seq, payload: impl Into<String>) -> Self {
        Self {
            state,
            seq,
            payload: payload.into(),
        }
    }

    /// The record written into a freshly created mailbox.
    pub fn sentinel() -> Self {
        Self::new(RecordState::Response, 0, "")
    }

    /// Creates a pending request.
    pub fn request(seq: Seq, payload: impl Into<String>) -> Self {
        Self::new(RecordState::Request, seq, payload)
    }

    /// Creates a successful answer.
    pub fn response(seq: Seq, payload: impl Into<String>) -> Self {
        Self::new(RecordState::Response, seq, payload)
    }

    /// Creates an error answer.
    pub fn error(seq: Seq, payload: impl Into<String>) -> Self {
        Self::new(RecordState::Error, seq, payload)
    }

    /// Returns true if this record answers the request with `seq`.
    pub fn answers(&self, seq: Seq) -> bool {
        self.seq == seq && !self.state.is_pending()
    }
}
