//! Interactive shell: each input line becomes one request.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

use crate::cli::Cli;
use crate::client::MailboxClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;

const PROMPT: &str = "> ";

/// Runs the shell on the process terminal.
pub async fn run(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let client = MailboxClient::new(cli.mailbox(config), cli.client_options(config));

    info!(path = %client.mailbox().path().display(), "Client is started");
    info!("Available commands: ping | any_text (as payload) | exit/quit/q");

    run_shell(
        &client,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// Reads lines from `input` until EOF or an exit word, sending each one.
///
/// Blank lines are skipped. Failed requests are reported and the shell
/// keeps going; only terminal IO errors end it early.
pub async fn run_shell<R, W>(client: &MailboxClient, input: R, mut output: W) -> ClientResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            break;
        };

        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if is_exit(command) {
            break;
        }

        let message = match client.send(command).await {
            Ok(reply) => reply.to_string(),
            Err(e) => format!("error: {}", e),
        };
        output.write_all(message.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }

    output.flush().await?;
    info!("Bye");
    Ok(())
}

fn is_exit(command: &str) -> bool {
    matches!(command.to_lowercase().as_str(), "exit" | "quit" | "q")
}
