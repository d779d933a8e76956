//! Send command: one request, one printed outcome.

use std::process::ExitCode;

use crate::cli::Cli;
use crate::client::MailboxClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Sends `payload` and prints the reply.
///
/// A remote error is printed like any reply but yields a failing exit code.
pub async fn run(cli: &Cli, config: &ClientConfig, payload: &str) -> ClientResult<ExitCode> {
    let client = MailboxClient::new(cli.mailbox(config), cli.client_options(config));
    let reply = client.send(payload).await?;

    println!("{}", reply);
    Ok(if reply.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
