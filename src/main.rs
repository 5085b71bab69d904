//! recent-langs - publish a breakdown of recently pushed languages to a gist

mod app;
mod cli;
mod client;
mod config;
mod domain;
mod id;
mod linguist;
mod logging;
mod report;
mod result;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crate::{
    cli::Args,
    config::AppConfig,
    logging::{LoggingConfig, init_logging},
};

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();
    let _log_guard = init_logging(LoggingConfig::from_env().with_log_dir(args.log_dir.clone()))?;
    info!(version = env!("CARGO_PKG_VERSION"), "recent-langs starting up");

    let outcome = match AppConfig::try_from(args) {
        Ok(config) => app::run(&config).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(content) => {
            println!("{content}");
            Ok(ExitCode::SUCCESS)
        },
        Err(e) => {
            error!(error = %e, "Run failed");
            Ok(ExitCode::FAILURE)
        },
    }
}
