//! Runtime configuration for the server

use std::path::PathBuf;
use std::time::Duration;

/// Executable name looked up on `PATH` when no program is configured
pub const DEFAULT_PROGRAM: &str = "openspec";

/// Wall-clock bound for a single OpenSpec command
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Wall-clock bound for the `--version` probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings shared by every invocation
///
/// Built once at start-up from command-line arguments and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// OpenSpec executable (bare name or path)
    pub program: PathBuf,
    /// Timeout applied to every OpenSpec command
    pub timeout: Duration,
    /// Timeout applied to the installation probe
    pub probe_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl Config {
    /// Use a different OpenSpec executable
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Use a different command timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a different probe timeout
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Program name for log and error messages
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}
