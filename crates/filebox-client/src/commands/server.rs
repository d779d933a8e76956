//! Server command: runs the mailbox server in the foreground.

use tracing::info;

use filebox_server::{MailboxServer, SignalHandler};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Initializes the mailbox and answers requests until SIGINT/SIGTERM.
///
/// Interruption is a clean shutdown and returns `Ok(())`.
pub async fn run(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let mailbox = cli.mailbox(config);
    let server = MailboxServer::new(mailbox, cli.server_config(config))?;

    let signal_handler = SignalHandler::new();
    signal_handler.spawn_listener()?;

    server
        .run_until_shutdown(signal_handler.shutdown().wait())
        .await?;

    info!("Bye");
    Ok(())
}
