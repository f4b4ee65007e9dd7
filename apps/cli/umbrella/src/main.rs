use umbrella::cli::{Cli, run};
use umbrella::error::AppError;
use umbrella::handlers::HandlerContext;
use umbrella::logger::initialize as LoggerInitialize;
use umbrella::paths::resolve_config_source;

use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger FIRST
    if let Err(e) = LoggerInitialize(cli.log_dir.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let context = HandlerContext::new(resolve_config_source(cli.config.as_deref()));
    info!("Umbrella connector starting: {}", cli.command.name());

    match run(&cli.command, &context, stdout().lock()).await {
        Ok(count) => {
            info!("{count} record(s) written");
            ExitCode::SUCCESS
        }
        // Handler failures were logged where they happened
        Err(AppError::Connector(_)) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
