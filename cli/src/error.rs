//! Error types for the shell binary.

use std::path::PathBuf;

use command_shell_core::{ConfigError, Error as DispatchError};
use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::tokenize::TokenizeError;

#[derive(Debug, Error)]
pub enum ShellError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The config file could not be read or parsed.
    #[error("failed to load config {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: Box<ShellError>,
    },

    /// The command tree could not be built.
    #[error("invalid command setup: {0}")]
    Config(#[from] ConfigError),

    /// A command line failed to parse or its handler failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// Line editor failure.
    #[error("readline error: {0}")]
    Readline(#[from] ReadlineError),

    /// Invalid tracing filter directive.
    #[error("invalid log level '{0}'")]
    LogLevel(String),
}

impl ShellError {
    /// Process exit status for this error. Setup problems exit with 2,
    /// everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigFile { .. } | Self::Config(_) | Self::LogLevel(_) => 2,
            _ => 1,
        }
    }
}

/// Convenience alias for results with [`ShellError`].
pub type Result<T> = std::result::Result<T, ShellError>;
