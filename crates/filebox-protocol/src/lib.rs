//! Mailbox file transport for filebox.
//!
//! Client and server talk through a single shared file holding one record:
//!
//! ```text
//! <state>;<seq>;<payload>\n
//! ```
//!
//! State codes are `-1` (error), `0` (response) and `1` (request). The
//! payload is everything after the second `;` and may itself contain `;`.
//!
//! # Locking
//!
//! Writers bracket their read-decide-write sequence with an exclusive
//! `flock(2)` held through a [`LockedMailbox`]. Pollers read through a
//! [`MailboxReader`] without taking the lock, so they may observe a torn or
//! stale record; such a record fails to parse or carries the wrong sequence
//! number and the poller simply looks again on its next tick.
//!
//! # Example
//!
//! ```rust,no_run
//! use filebox_core::RecordState;
//! use filebox_protocol::Mailbox;
//!
//! let mailbox = Mailbox::new("/tmp/filebox.mailbox");
//! mailbox.initialize()?;
//!
//! let mut locked = mailbox.open_read_write_locked()?;
//! let current = locked.read()?;
//! locked.write(RecordState::Request, current.seq + 1, "ping")?;
//! # Ok::<(), filebox_protocol::MailboxError>(())
//! ```

mod codec;
mod error;
mod mailbox;

pub use codec::{decode_contents, decode_line, encode_record};
pub use error::{MailboxError, MailboxResult, ParseError};
pub use mailbox::{LockedMailbox, Mailbox, MailboxReader};

/// Separator between the state, seq and payload fields.
pub const FIELD_DELIMITER: char = ';';
