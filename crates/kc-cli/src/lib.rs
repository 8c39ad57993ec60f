//! # kc-cli
//!
//! Command-line front end for Keycloak configuration sync.
//!
//! - `kc import`: layer configuration files, reconcile them against a JSON
//!   state file, print the report and commit
//! - `kc config`: show the CLI configuration and its location

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod state;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
