//! Error types for the MCP server

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
///
/// A non-zero exit of the external tool is not an error here; it is a
/// [`CommandOutput`](crate::executor::CommandOutput) with `success == false`.
#[derive(Debug, Error)]
pub enum Error {
    /// The `--version` probe failed
    #[error("OpenSpec is not installed")]
    ToolNotInstalled,

    /// Resolved working directory does not exist
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The external command exceeded its wall-clock bound and was killed
    #[error("Command timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The external command could not be started or awaited
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Unknown tool requested
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Invalid argument provided
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fault raised inside a dispatch task
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error stands in for the external tool's stderr
    ///
    /// Timeouts and spawn faults are reported like a failed command, with the
    /// error description in place of captured output.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, Error::Timeout { .. } | Error::Spawn { .. })
    }
}
