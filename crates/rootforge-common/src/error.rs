//! Unified error types for the rootforge workspace.
//!
//! Every fallible operation in the library crates returns [`Result`]; the
//! binary converts into `anyhow::Error` at the top level.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum RootforgeError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// A permission or privilege error.
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Description of the denied operation.
        message: String,
    },

    /// An execution was requested with no program to run.
    #[error("refusing to execute an empty command")]
    EmptyCommand,

    /// The process could not be started at all.
    #[error("could not start {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("command `{command}` exited with code {code}")]
    CommandFailed {
        /// Full command line, space-joined.
        command: String,
        /// Exit code, or -1 when terminated by a signal.
        code: i32,
    },

    /// A supervision service directory could not be created.
    #[error("could not make supervision directory {path}: {source}")]
    SupervisionDirectory {
        /// Directory being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A run script could not be created.
    #[error("could not create runfile {path}: {source}")]
    CreateRunFile {
        /// Run script path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A run script was created but its body could not be written.
    #[error("could not write runfile {path}: {source}")]
    WriteRunFile {
        /// Run script path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RootforgeError>;
