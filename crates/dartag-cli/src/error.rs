use dartag::core::io::table::TableError;
use dartag::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit status for bad arguments or configuration, matching clap's usage errors.
pub const USAGE_EXIT_CODE: i32 = 2;
/// Exit status for every failure that happens while processing reactions.
pub const FAILURE_EXIT_CODE: i32 = 1;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot load config file '{path}': {source}", path = path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cannot read reactions from '{path}': {source}", path = path.display())]
    ReadTable {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("Cannot write reactions to '{path}': {source}", path = path.display())]
    WriteTable {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Status the `dartag` binary exits with when a command returns this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::ConfigFile { .. } | Self::Argument(_) => USAGE_EXIT_CODE,
            Self::Engine(EngineError::InvalidArgument(_)) => USAGE_EXIT_CODE,
            _ => FAILURE_EXIT_CODE,
        }
    }
}
