//! # kc-core
//!
//! Core utilities, configuration, and error handling for Keycloak
//! configuration sync.
//!
//! This crate provides foundational types shared by the import engine and
//! the command-line front end.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - AU-2: Event logging for committed configuration changes
//! - SI-11: Error handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::SyncConfig;
pub use error::{Error, Result};
