use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tuck::cli::wrap::WrapCommandOutput;
use tuck::cli::{Cli, Commands};
use tuck::error::TuckError;

const LOG_ENV: &str = "TUCK_LOG";

fn main() -> ExitCode {
    setup_tracing();

    match run() {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::debug!(%error, "command.failed");
            let serialized = serde_json::to_string_pretty(&error.to_error_response()).unwrap_or_else(
                |_| {
                    "{\"error\":{\"type\":\"serialization_error\",\"message\":\"Failed to serialize error response\"}}"
                        .to_string()
                },
            );
            println!("{serialized}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String, TuckError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Wrap(args) => match tuck::cli::wrap::run_wrap(args)? {
            WrapCommandOutput::Text(output) => Ok(output),
            WrapCommandOutput::Json(response) => serde_json::to_string_pretty(&response)
                .map(|json| format!("{json}\n"))
                .map_err(|source| TuckError::ResponseSerialization { source }),
        },
    }
}

/// Logs go to stderr so stdout stays the rewritten text or JSON.
fn setup_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
