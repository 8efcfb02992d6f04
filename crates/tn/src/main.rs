use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::{build_client, CommandContext, CommandError};
use dispatch::{ApiCommand, ApiDispatch, LocalCommand, LocalDispatch};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": e.code(),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> commands::Result<()> {
    // Local commands still run with an unreadable config file.
    if let Some(dispatch) = LocalDispatch::try_from_cli(cli) {
        let config = load_config().unwrap_or_default();
        let ctx = CommandContext::from_cli(cli, &config);
        return dispatch.execute(&ctx);
    }

    let config = load_config()?;
    let ctx = CommandContext::from_cli(cli, &config);

    match ApiDispatch::from_cli(cli, &config)? {
        Some(dispatch) => {
            let client = build_client(cli, &config)?;
            tracing::debug!(api_url = client.base_url(), "client ready");
            dispatch.execute(&ctx, &client).await
        }
        None => Err(CommandError::Config(format!(
            "unhandled command: {:?}",
            cli.command
        ))),
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `--verbose` logs debug, `--quiet` errors only,
/// and the default is warnings.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Keep an already installed subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
