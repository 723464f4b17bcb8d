use anyhow::{Context, Result};
use clap::Parser;
use pokedex::config::{CliArgs, ClientConfig, Command};
use pokedex::logging::{init_logging, LoggingConfig};
use pokedex::{HttpApi, PokedexSession};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = CliArgs::parse();
    init_logging(&LoggingConfig::from_env())?;

    let config = ClientConfig::from_args(&cli.connection).context("invalid configuration")?;
    let api = HttpApi::new(&config).context("failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling requests");
            on_interrupt.cancel();
        }
    });

    let mut session = PokedexSession::new(Arc::new(api), config, cancel);
    let (output, failed) = match cli.command {
        Command::List { kind, search } => {
            let text = session.list_entries(kind, &search).await;
            let failed = !session.catalog().diagnostics().is_empty();
            (text, failed)
        }
        Command::Show { id, shiny } => {
            let text = session.show_entry(id, shiny).await;
            (text, session.detail().is_not_found())
        }
    };

    if session.is_cancelled() {
        eprintln!("Cancelled.");
        return Ok(ExitCode::from(130));
    }

    print!("{}", output);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
