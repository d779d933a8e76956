//! Shutdown on SIGINT/SIGTERM.
//!
//! Interrupting the server is a clean shutdown, not a failure: the poll
//! loop selects on a [`ShutdownSignal`] and returns `Ok(())` when it fires.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::ServerResult;

/// Turns process signals into a shutdown notification.
pub struct SignalHandler {
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalHandler {
    /// Creates a new signal handler. No signal is watched until
    /// [`spawn_listener`](Self::spawn_listener) is called.
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// Installs the signal handlers and spawns the task watching them.
    ///
    /// Must be called from within a tokio runtime.
    #[cfg(unix)]
    pub fn spawn_listener(&self) -> ServerResult<()> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let shutdown_tx = self.shutdown_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, initiating shutdown"),
                _ = sigint.recv() => info!("Received SIGINT, initiating shutdown"),
            }
            let _ = shutdown_tx.send(true);
            debug!("Signal listener stopped");
        });

        Ok(())
    }

    /// Installs a Ctrl+C handler and spawns the task watching it.
    #[cfg(not(unix))]
    pub fn spawn_listener(&self) -> ServerResult<()> {
        let shutdown_tx = self.shutdown_tx.clone();

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, initiating shutdown");
                let _ = shutdown_tx.send(true);
            }
        });

        Ok(())
    }

    /// Returns a signal that completes on shutdown.
    pub fn shutdown(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.shutdown_rx.clone(),
        }
    }

    /// Returns true if shutdown has been signaled.
    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Programmatically triggers a shutdown.
    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Creates a handle that can trigger or observe shutdown elsewhere.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
            rx: self.shutdown_rx.clone(),
        }
    }
}

/// Completes once shutdown is signaled.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Waits for the shutdown signal.
    ///
    /// Also returns if every sender is gone, since nothing can signal anymore.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|shutdown| *shutdown).await;
    }
}

/// Cloneable handle for triggering or checking shutdown.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    pub fn wait(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.rx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn trigger_shutdown_sets_flag() {
        let handler = SignalHandler::new();
        assert!(!handler.is_shutdown());

        handler.trigger_shutdown();

        assert!(handler.is_shutdown());
    }

    #[tokio::test]
    async fn shutdown_signal_completes_after_trigger() {
        let handler = SignalHandler::new();
        let signal = handler.shutdown();
        let handle = handler.shutdown_handle();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.trigger();
        });

        let result = tokio::time::timeout(Duration::from_millis(500), signal.wait()).await;
        assert!(result.is_ok());
        assert!(handler.is_shutdown());
    }

    #[tokio::test]
    async fn shutdown_signal_pending_without_trigger() {
        let handler = SignalHandler::new();
        let result =
            tokio::time::timeout(Duration::from_millis(20), handler.shutdown().wait()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn handle_wait_sees_earlier_trigger() {
        let handler = SignalHandler::new();
        let handle = handler.shutdown_handle();
        handle.trigger();

        assert!(handle.is_shutdown());
        let result =
            tokio::time::timeout(Duration::from_millis(50), handle.wait().wait()).await;
        assert!(result.is_ok());
    }
}
