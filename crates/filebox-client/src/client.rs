//! Mailbox client: submits a request and polls for its answer.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{error, info, warn};

use filebox_core::{Record, RecordState, Seq};
use filebox_protocol::Mailbox;
use filebox_server::DEFAULT_POLL_INTERVAL;

use crate::error::{ClientError, ClientResult};

/// Default time to wait for an answer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Client timing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// How long `send` waits for an answer before giving up.
    pub timeout: Duration,
    /// Delay between two unlocked polls.
    pub poll_interval: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ClientOptions {
    /// Builder: set response timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: set poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// The server's answer to a request.
///
/// A remote error is a normal answer, not a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The server handled the request.
    Response { seq: Seq, payload: String },
    /// The server rejected the request.
    RemoteError { seq: Seq, detail: String },
}

impl Reply {
    /// Returns the reply for `seq` if `record` answers it.
    pub fn answering(record: &Record, seq: Seq) -> Option<Self> {
        if record.seq != seq {
            return None;
        }
        match record.state {
            RecordState::Response => Some(Self::Response {
                seq,
                payload: record.payload.clone(),
            }),
            RecordState::Error => Some(Self::RemoteError {
                seq,
                detail: record.payload.clone(),
            }),
            RecordState::Request => None,
        }
    }

    /// Sequence number of the answered request.
    pub fn seq(&self) -> Seq {
        match self {
            Self::Response { seq, .. } | Self::RemoteError { seq, .. } => *seq,
        }
    }

    /// Returns true for a successful response.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Response { .. })
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response { seq, payload } => write!(f, "[seq {seq}] {payload}"),
            Self::RemoteError { seq, detail } => write!(f, "[seq {seq}] error: {detail}"),
        }
    }
}

/// Client half of the mailbox protocol.
#[derive(Debug, Clone)]
pub struct MailboxClient {
    mailbox: Mailbox,
    options: ClientOptions,
}

impl MailboxClient {
    /// Creates a client over an existing mailbox handle.
    pub fn new(mailbox: Mailbox, options: ClientOptions) -> Self {
        Self { mailbox, options }
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sends `payload` and waits for the matching answer.
    ///
    /// Returns only once the outcome is known: a reply, `Busy`, `Timeout`
    /// or a transport error.
    pub async fn send(&self, payload: &str) -> ClientResult<Reply> {
        let seq = self.submit(payload)?;
        self.wait_response(seq).await
    }

    /// Writes a request under a fresh sequence number and returns that number.
    ///
    /// Refuses with `Busy` if a request is already pending, leaving it intact.
    /// Unreadable content is overwritten with a request numbered 1.
    pub fn submit(&self, payload: &str) -> ClientResult<Seq> {
        let mut locked = self.mailbox.open_read_write_locked().inspect_err(|e| {
            error!(path = %self.mailbox.path().display(), error = %e, "Cannot open mailbox");
        })?;

        let seq = match locked.read() {
            Ok(current) if current.state.is_pending() => {
                warn!(seq = current.seq, "Server busy (pending request)");
                return Err(ClientError::Busy { seq: current.seq });
            }
            Ok(current) => current.seq.checked_add(1).unwrap_or(1),
            Err(e) if e.is_malformed() => {
                error!(error = %e, "Invalid state in mailbox, starting over at seq=1");
                1
            }
            Err(e) => return Err(e.into()),
        };

        locked.write(RecordState::Request, seq, payload)?;
        info!(seq, payload, "Sent request");
        Ok(seq)
    }

    /// Polls the mailbox without locking until `seq` is answered or the
    /// timeout elapses.
    ///
    /// A record for another seq means the answer has not arrived yet. An
    /// unparsable record ends the wait immediately. On timeout the request
    /// stays in the mailbox; a later `send` shadows it with a higher seq.
    pub async fn wait_response(&self, seq: Seq) -> ClientResult<Reply> {
        let started = Instant::now();
        let deadline = started + self.options.timeout;

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }

            let record = self.mailbox.snapshot().inspect_err(|e| {
                error!(seq, error = %e, "Invalid response");
            })?;

            if let Some(reply) = Reply::answering(&record, seq) {
                match reply {
                    Reply::Response { .. } => {
                        info!(seq, payload = %record.payload, "Got response")
                    }
                    Reply::RemoteError { .. } => {
                        error!(seq, payload = %record.payload, "Got error")
                    }
                }
                return Ok(reply);
            }

            let remaining = deadline.saturating_duration_since(now);
            tokio::time::sleep(self.options.poll_interval.min(remaining)).await;
        }

        error!(seq, "Timeout waiting for response");
        Err(ClientError::Timeout {
            seq,
            waited: started.elapsed(),
        })
    }
}
