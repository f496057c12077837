//! CLI command implementations
//!
//! `serve` resolves everything it needs (config file, CLI overrides, cookie
//! secret) before binding a socket. A missing secret stops the process here.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::auth::crypto::hash_password;
use crate::config::{AppConfig, CookieSecret};
use crate::http_server::{AppState, HttpServer};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let stdout = io::stdout();
    run_command_with_output(cmd, &mut stdout.lock())
}

/// Run a command, writing any printed value to `out`
pub fn run_command_with_output(cmd: Command, out: &mut dyn Write) -> CliResult<()> {
    match cmd {
        Command::Serve { config, host, port } => serve(config.as_deref(), host, port),
        Command::GenSecret => {
            writeln!(out, "{}", CookieSecret::generate_hex())?;
            Ok(())
        }
        Command::HashPassword { name, password } => {
            writeln!(out, "{}", hash_password(&name, &password))?;
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("blogcore=info,tower_http=info"));
    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Resolve configuration from an optional file plus CLI overrides
pub fn resolve_config(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<AppConfig> {
    let mut config = match config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    Ok(config)
}

/// Start the HTTP server
pub fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    init_tracing();

    let config = resolve_config(config_path, host, port)?;
    let secret = CookieSecret::from_env().map_err(|e| {
        tracing::error!(error = %e, "refusing to start");
        CliError::from(e)
    })?;

    let state = Arc::new(AppState::new(&config, &secret)?);
    let server = HttpServer::new(config.server.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto::verify_password;
    use crate::cli::CliErrorCode;

    /// A sink whose every write fails
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let config = resolve_config(None, None, None).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"server": {{"host": "0.0.0.0", "port": 9000}}}}"#).unwrap();

        let config = resolve_config(Some(file.path()), None, Some(9100)).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_bad_config_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = resolve_config(Some(file.path()), None, None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_hash_password_prints_credential() {
        let mut out = Vec::new();
        let cmd = Command::HashPassword {
            name: "alice".to_string(),
            password: "secret1".to_string(),
        };
        run_command_with_output(cmd, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(verify_password("alice", "secret1", printed.trim_end()));
    }

    #[test]
    fn test_gen_secret_prints_hex() {
        let mut out = Vec::new();
        run_command_with_output(Command::GenSecret, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end().len(), 64);
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let err = run_command_with_output(Command::GenSecret, &mut ClosedPipe).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::IoError);
        assert!(err.message().contains("closed"));
    }
}
