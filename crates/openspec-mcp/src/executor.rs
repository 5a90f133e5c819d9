//! OpenSpec subprocess execution
//!
//! Runs one OpenSpec command at a time with a wall-clock bound. Output is
//! captured in full and returned only once the process has exited; nothing is
//! streamed. The timeout bounds both the child's exit and the draining of its
//! pipes; on expiry the child is killed and reaped before returning.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::command::{CommandLine, version_command};
use crate::config::Config;
use crate::{Error, Result};

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A failure whose stderr is replaced by a host-side message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
        }
    }
}

/// Launches the OpenSpec executable
#[derive(Debug, Clone)]
pub struct CommandRunner {
    config: Config,
}

impl CommandRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check whether OpenSpec can be launched, returning its version
    ///
    /// Any failure to start, a non-zero exit, or a probe timeout counts as
    /// "not installed".
    pub async fn probe(&self) -> Option<String> {
        let result = self
            .execute(&version_command(), None, self.config.probe_timeout)
            .await;

        match result {
            Ok(output) if output.success => Some(output.stdout.trim().to_string()),
            Ok(output) => {
                tracing::debug!(stderr = %output.stderr.trim(), "openspec probe exited non-zero");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "openspec probe failed");
                None
            }
        }
    }

    /// Run a command with the configured timeout
    ///
    /// `cwd` of `None` runs in the server's own working directory.
    pub async fn run(&self, command: &CommandLine, cwd: Option<&Path>) -> Result<CommandOutput> {
        self.execute(command, cwd, self.config.timeout).await
    }

    async fn execute(
        &self,
        command: &CommandLine,
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        let program = self.config.program_name();

        let mut cmd = Command::new(&self.config.program);
        cmd.args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        tracing::debug!(program = %program, args = ?command.args(), cwd = ?cwd, "spawning openspec");

        let mut child = cmd.spawn().map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

        let mut stdout = collect(child.stdout.take());
        let mut stderr = collect(child.stderr.take());

        // Background processes may hold the pipes open past the child's exit
        let finished = tokio::time::timeout(timeout, async {
            let status = child.wait().await.map_err(|source| Error::Spawn {
                program: program.clone(),
                source,
            })?;
            let stdout = join_output(&mut stdout).await?;
            let stderr = join_output(&mut stderr).await?;
            Ok::<_, Error>((status, stdout, stderr))
        })
        .await;

        let (status, stdout, stderr) = match finished {
            Ok(result) => result?,
            Err(_elapsed) => {
                tracing::warn!(
                    program = %program,
                    args = ?command.args(),
                    timeout = ?timeout,
                    "openspec command timed out, killing"
                );
                if let Err(e) = child.kill().await {
                    tracing::debug!(error = %e, "openspec process already exited");
                }
                stdout.abort();
                stderr.abort();
                return Err(Error::Timeout { timeout });
            }
        };

        tracing::debug!(program = %program, status = ?status.code(), "openspec exited");

        Ok(CommandOutput {
            success: status.success(),
            stdout,
            stderr,
        })
    }
}

/// Drain a child pipe on its own task so a full pipe cannot stall the child
fn collect<R>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok(buf)
    })
}

async fn join_output(handle: &mut JoinHandle<std::io::Result<Vec<u8>>>) -> Result<String> {
    let bytes = handle
        .await
        .map_err(|e| Error::Internal(format!("output reader failed: {e}")))??;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
