//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default delay between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Server configuration.
///
/// The mailbox location is not part of it: the server receives an already
/// constructed [`Mailbox`](filebox_protocol::Mailbox).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Delay between two poll cycles.
    pub poll_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ServerConfig {
    /// Builder: set poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Returns the default mailbox path.
///
/// Uses `$XDG_RUNTIME_DIR/filebox.mailbox` if available,
/// otherwise falls back to `/tmp/filebox-$UID.mailbox`.
pub fn default_mailbox_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("filebox.mailbox")
    } else {
        #[cfg(unix)]
        let uid = unsafe { libc::getuid() };
        #[cfg(not(unix))]
        let uid = 0;
        PathBuf::from(format!("/tmp/filebox-{}.mailbox", uid))
    }
}
