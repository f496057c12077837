//! CLI argument definitions using clap
//!
//! Commands:
//! - blogcore serve [--config <path>] [--host <host>] [--port <port>]
//! - blogcore gen-secret
//! - blogcore hash-password <name> <password>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// blogcore - a small blog with signed-cookie sessions
#[derive(Parser, Debug)]
#[command(name = "blogcore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (requires BLOGCORE_COOKIE_SECRET)
    Serve {
        /// Path to a JSON configuration file
        #[arg(long, env = "BLOGCORE_CONFIG")]
        config: Option<PathBuf>,

        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a fresh random cookie secret
    GenSecret,

    /// Print the stored credential string for a name and password
    HashPassword {
        name: String,
        password: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["blogcore", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Command::Serve { port, host, .. } => {
                assert_eq!(port, Some(9000));
                assert_eq!(host, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_hash_password() {
        let cli = Cli::try_parse_from(["blogcore", "hash-password", "alice", "secret1"]).unwrap();
        assert!(matches!(cli.command, Command::HashPassword { .. }));
    }
}
