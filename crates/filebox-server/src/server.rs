//! The server poll loop.
//!
//! Each cycle takes the exclusive lock, reads the record and decides:
//! - unparsable content is replaced by `Error(0, "invalid_state:<reason>")`
//! - a pending request is answered under its own sequence number
//! - an answered record is left alone

use std::future::Future;

use tracing::{debug, error, info};

use filebox_core::{RecordState, Seq};
use filebox_protocol::Mailbox;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::RequestHandler;

/// What a single poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing pending; the record already answers `seq`.
    Idle { seq: Seq },
    /// A pending request was answered.
    Answered { seq: Seq, state: RecordState },
    /// Unparsable content was replaced by a reset record.
    Reset { reason: String },
}

/// Server answering requests found in the mailbox.
#[derive(Debug)]
pub struct MailboxServer {
    mailbox: Mailbox,
    config: ServerConfig,
    handler: RequestHandler,
}

impl MailboxServer {
    /// Creates a server over `mailbox` and initializes the mailbox file.
    ///
    /// Fails early if the directory that should hold the mailbox is missing.
    pub fn new(mailbox: Mailbox, config: ServerConfig) -> ServerResult<Self> {
        if let Some(parent) = mailbox.path().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            return Err(ServerError::mailbox_path_invalid(
                parent.to_string_lossy().to_string(),
            ));
        }

        mailbox.initialize()?;

        Ok(Self {
            mailbox,
            config,
            handler: RequestHandler::new(),
        })
    }

    /// Returns the mailbox this server answers.
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs one locked read-decide-write cycle.
    ///
    /// Malformed content never surfaces as an error; it is reset instead.
    pub fn poll_once(&self) -> ServerResult<PollOutcome> {
        let mut locked = self.mailbox.open_read_write_locked()?;

        let record = match locked.read() {
            Ok(record) => record,
            Err(e) => {
                let Some(reason) = e.malformed_reason() else {
                    return Err(e.into());
                };
                locked.write_record(&self.handler.reset(&reason))?;
                error!(reason = %reason, "Invalid mailbox state, reset");
                return Ok(PollOutcome::Reset { reason });
            }
        };

        if !record.state.is_pending() {
            return Ok(PollOutcome::Idle { seq: record.seq });
        }

        let reply = self.handler.handle(&record);
        locked.write_record(&reply)?;

        Ok(PollOutcome::Answered {
            seq: reply.seq,
            state: reply.state,
        })
    }

    /// Polls forever.
    pub async fn run(&self) -> ServerResult<()> {
        self.run_until_shutdown(std::future::pending()).await
    }

    /// Polls until `shutdown` completes.
    ///
    /// A failing cycle is logged and retried after the next interval.
    pub async fn run_until_shutdown<S>(&self, shutdown: S) -> ServerResult<()>
    where
        S: Future<Output = ()>,
    {
        info!(
            path = %self.mailbox.path().display(),
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "Server is started, polling mailbox"
        );

        tokio::pin!(shutdown);

        loop {
            match self.poll_once() {
                Ok(outcome) => debug!(?outcome, "Poll cycle finished"),
                Err(e) => error!(error = %e, "Poll cycle failed"),
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }
}
