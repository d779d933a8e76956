//! Server side of the filebox mailbox protocol.
//!
//! The server owns no socket. It polls the shared mailbox file, answers a
//! pending request under the request's sequence number and resets the
//! mailbox when it finds content it cannot parse.
//!
//! # Example
//!
//! ```rust,no_run
//! use filebox_protocol::Mailbox;
//! use filebox_server::{MailboxServer, ServerConfig, SignalHandler, default_mailbox_path};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mailbox = Mailbox::new(default_mailbox_path());
//!     let server = MailboxServer::new(mailbox, ServerConfig::default())?;
//!
//!     let signals = SignalHandler::new();
//!     signals.spawn_listener()?;
//!     server.run_until_shutdown(signals.shutdown().wait()).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod server;
mod signals;

pub use config::{DEFAULT_POLL_INTERVAL, ServerConfig, default_mailbox_path};
pub use error::{ServerError, ServerResult};
pub use handler::{BAD_REQUEST, Command, INVALID_STATE_PREFIX, PONG, RequestHandler};
pub use server::{MailboxServer, PollOutcome};
pub use signals::{ShutdownHandle, ShutdownSignal, SignalHandler};
