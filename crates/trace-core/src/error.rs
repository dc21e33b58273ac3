use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while normalising trace files.
#[derive(Error, Debug)]
pub enum TraceError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A token in a trace file is not an integer.
    #[error("Invalid value '{token}' in {path} at line {line}")]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    /// A JSON config document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The delta vector and column count do not agree, or a config value is
    /// missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required argument was not supplied.
    #[error("Invalid argument: {0} must be provided")]
    InvalidArgument(&'static str),

    /// A glob pattern in a path specification is malformed.
    #[error("Invalid search pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    /// The directory part of a path specification does not exist.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}

/// Convenience alias used throughout the trace crates.
pub type Result<T> = std::result::Result<T, TraceError>;
