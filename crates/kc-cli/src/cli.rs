//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

/// Keycloak configuration sync.
#[derive(Debug, Parser)]
#[command(name = "kc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (overrides config).
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile configuration files against the persisted state.
    Import(ImportArgs),

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Import arguments.
#[derive(Debug, Default, clap::Args)]
pub struct ImportArgs {
    /// Configuration files (JSON or TOML), layered in order.
    pub files: Vec<PathBuf>,

    /// JSON state file backing the store.
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Delete persisted entities that are absent from the configuration.
    #[arg(long)]
    pub delete_all_others: bool,

    /// Report what would change without committing.
    #[arg(long)]
    pub verify_only: bool,

    /// Commit even if models were rejected.
    #[arg(long)]
    pub force: bool,
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,

    /// Print the configuration file location.
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_flags_parse() {
        let cli = Cli::parse_from([
            "kc",
            "import",
            "a.json",
            "b.toml",
            "--state",
            "state.json",
            "--delete-all-others",
            "-o",
            "json",
        ]);

        let Command::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(args.files, [PathBuf::from("a.json"), PathBuf::from("b.toml")]);
        assert_eq!(args.state, Some(PathBuf::from("state.json")));
        assert!(args.delete_all_others);
        assert!(!args.verify_only);
        assert!(matches!(cli.output, Some(OutputFormat::Json)));
    }

    #[test]
    fn config_path_parses() {
        let cli = Cli::parse_from(["kc", "config", "path"]);
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }
}
