//! filebox CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use filebox_client::cli::{Cli, Command, ConfigAction};
use filebox_client::commands;
use filebox_client::config::ClientConfig;
use filebox_client::error::{ClientError, ClientResult};
use filebox_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tracing_config = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config.with_format(cli.log_format)) {
        eprintln!("warning: {}", e);
    }

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config),
        None => ClientConfig::load().map_err(ClientError::Config),
    }
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<ExitCode> {
    match cli.command {
        Some(Command::Server) => commands::server::run(&cli, &config).await?,
        Some(Command::Send { ref payload }) => {
            return commands::send::run(&cli, &config, payload).await;
        }
        Some(Command::Status) => commands::status::run(&cli, &config)?,
        Some(Command::Config { ref action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config)?,
            ConfigAction::Path => commands::config::path()?,
        },
        Some(Command::Shell) | None => commands::shell::run(&cli, &config).await?,
    }
    Ok(ExitCode::SUCCESS)
}
