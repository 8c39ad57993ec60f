//! # Keycloak configuration sync CLI

#![forbid(unsafe_code)]

use clap::Parser;
use kc_cli::{
    cli::{Cli, Command},
    commands::{run_config, run_import},
    config::CliConfig,
    output::error,
};
use kc_core::SyncConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let sync = SyncConfig::from_env();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&sync.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match CliConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };
    let format = cli.output.unwrap_or(config.output_format);

    let result = match cli.command {
        Command::Import(args) => run_import(args, &config, &sync, format).await,
        Command::Config(cmd) => run_config(cmd, &config),
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
