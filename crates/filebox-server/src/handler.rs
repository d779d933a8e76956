//! Request dispatch.
//!
//! Turns a pending request record into the record that answers it.

use tracing::{error, info};

use filebox_core::Record;

/// Payload answered to a `ping`.
pub const PONG: &str = "pong";

/// Payload answered to any unrecognized command.
pub const BAD_REQUEST: &str = "bad_request";

/// Prefix of the payload the server writes when it resets a corrupted mailbox.
pub const INVALID_STATE_PREFIX: &str = "invalid_state:";

/// Commands the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Liveness check, answered with [`PONG`].
    Ping,
}

impl Command {
    /// Parses a request payload, ignoring surrounding whitespace and case.
    pub fn parse(payload: &str) -> Option<Self> {
        match payload.trim().to_lowercase().as_str() {
            "ping" => Some(Self::Ping),
            _ => None,
        }
    }
}

/// Produces answers for pending requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestHandler;

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new() -> Self {
        Self
    }

    /// Builds the answer for `request`, echoing its sequence number.
    pub fn handle(&self, request: &Record) -> Record {
        match Command::parse(&request.payload) {
            Some(Command::Ping) => {
                info!(seq = request.seq, "Got request");
                Record::response(request.seq, PONG)
            }
            None => {
                error!(
                    seq = request.seq,
                    payload = %request.payload,
                    "Got bad request"
                );
                Record::error(request.seq, BAD_REQUEST)
            }
        }
    }

    /// Builds the record that replaces unparsable mailbox content.
    ///
    /// Its seq is always 0, so it never satisfies a waiting client.
    pub fn reset(&self, reason: &str) -> Record {
        Record::error(0, format!("{INVALID_STATE_PREFIX}{reason}"))
    }
}
