//! Status command: prints the record currently in the mailbox.

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Reads the mailbox without taking the lock and prints its record.
pub fn run(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let mailbox = cli.mailbox(config);
    let record = mailbox.snapshot()?;

    println!("mailbox: {}", mailbox.path().display());
    println!("state:   {}", record.state);
    println!("seq:     {}", record.seq);
    println!("payload: {}", record.payload);
    Ok(())
}
