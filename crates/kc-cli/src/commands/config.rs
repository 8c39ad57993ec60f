//! Configuration management commands.

use crate::CliConfig;
use crate::cli::ConfigCommand;
use crate::error::CliResult;
use crate::output::info;

/// Runs a config command.
///
/// ## Errors
///
/// Returns an error if the configuration path cannot be resolved.
pub fn run_config(cmd: ConfigCommand, config: &CliConfig) -> CliResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config),
        ConfigCommand::Path => {
            println!("{}", CliConfig::config_path()?.display());
            Ok(())
        }
    }
}

fn show_config(config: &CliConfig) -> CliResult<()> {
    let path = CliConfig::config_path()?;
    let origin = if path.exists() { "" } else { " (not present, defaults)" };
    info(&format!("Configuration file: {}{origin}", path.display()));
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
