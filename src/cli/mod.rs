//! CLI module for blogcore
//!
//! Provides command-line interface for:
//! - serve: load config and secret, then run the HTTP server
//! - gen-secret: print a value for BLOGCORE_COOKIE_SECRET
//! - hash-password: print a credential string

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{resolve_config, run, run_command, run_command_with_output, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
