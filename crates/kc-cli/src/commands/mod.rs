//! Command implementations.

pub mod config;
pub mod import;

pub use config::run_config;
pub use import::run_import;
