//! MCP Tool Handlers
//!
//! The dispatcher behind `tools/call`. Every invocation follows the same
//! pipeline: resolve the tool, decode arguments, build the command line,
//! probe for OpenSpec, resolve the working directory, run the command and
//! render its output. Each failure along the way becomes an error-flagged
//! [`ToolResult`]; nothing is propagated to the host as a protocol error.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::command::{ToolArguments, build_command};
use crate::config::Config;
use crate::executor::{CommandOutput, CommandRunner};
use crate::tools::{Operation, ToolResult, find_operation};
use crate::{Error, Result};

/// Install command suggested whenever OpenSpec cannot be found
pub const INSTALL_COMMAND: &str = "npm install -g @fission-ai/openspec";

/// Response for every operation when the probe fails
pub const NOT_INSTALLED_MESSAGE: &str =
    "❌ OpenSpec is not installed. Please install it manually: npm install -g @fission-ai/openspec";

const NEXT_STEPS: &str = "\n\n📋 Next steps:\n\
    1. Use 'openspec_list' to list changes and specs\n\
    2. Use 'openspec_change_show' to view change proposals\n\
    3. Use 'openspec_validate' to validate your work\n";

/// Routes tool calls to OpenSpec commands
///
/// Holds no per-call state; clones share nothing mutable.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    runner: CommandRunner,
}

impl Dispatcher {
    pub fn new(config: Config) -> Self {
        Self {
            runner: CommandRunner::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        self.runner.config()
    }

    /// Invoke a tool and always produce a response
    ///
    /// The call runs on its own task, so a panic inside dispatch is reported
    /// like any other error instead of tearing down the server.
    pub async fn invoke(&self, tool_name: &str, arguments: Value) -> ToolResult {
        tracing::info!(tool = tool_name, "Handling tool call");

        let dispatcher = self.clone();
        let name = tool_name.to_string();
        let task = tokio::spawn(async move { dispatcher.dispatch(&name, arguments).await });

        match task.await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::warn!(tool = tool_name, error = %e, "Tool call failed");
                error_result(&e)
            }
            Err(e) => {
                tracing::error!(tool = tool_name, error = %e, "Tool call aborted");
                error_result(&Error::Internal(e.to_string()))
            }
        }
    }

    async fn dispatch(&self, tool_name: &str, arguments: Value) -> Result<ToolResult> {
        let operation = find_operation(tool_name)
            .ok_or_else(|| Error::UnknownTool(tool_name.to_string()))?
            .operation;
        let args = ToolArguments::from_value(arguments)?;

        if operation == Operation::CheckStatus {
            return Ok(status_report(self.runner.probe().await));
        }

        let command = build_command(operation, &args)?;

        if self.runner.probe().await.is_none() {
            return Err(Error::ToolNotInstalled);
        }

        let directory = expand_home(args.directory());
        let cwd = if operation.uses_directory() {
            if !directory.is_dir() {
                return Err(Error::DirectoryNotFound { path: directory });
            }
            Some(directory.as_path())
        } else {
            None
        };

        let output = match self.runner.run(&command, cwd).await {
            Ok(output) => output,
            Err(e) if e.is_execution_failure() => {
                tracing::warn!(tool = operation.name(), error = %e, "OpenSpec command did not complete");
                CommandOutput::failed(e.to_string())
            }
            Err(e) => return Err(e),
        };

        Ok(render(operation, &args, &directory, &output))
    }
}

/// Expand a leading `~` to the user's home directory
///
/// No other normalization is applied. `~user` forms are left unchanged, as is
/// everything when no home directory is known.
pub fn expand_home(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Map a dispatch error to the response shown to the host
pub fn error_result(error: &Error) -> ToolResult {
    let text = match error {
        Error::ToolNotInstalled => NOT_INSTALLED_MESSAGE.to_string(),
        Error::DirectoryNotFound { .. } => format!("❌ {error}"),
        Error::UnknownTool(name) => format!("❌ Unknown tool: {name}"),
        Error::InvalidArgument(message) => format!("❌ Invalid arguments: {message}"),
        other => format!("❌ Error: {other}"),
    };
    ToolResult::error(text)
}

fn status_report(version: Option<String>) -> ToolResult {
    match version {
        Some(version) => {
            let version = if version.is_empty() {
                "Unknown".to_string()
            } else {
                version
            };
            ToolResult::text(format!(
                "✅ OpenSpec is installed!\n\n📦 Version: {version}\n\n\
                 You can now use OpenSpec commands through this MCP server."
            ))
        }
        None => ToolResult::error(format!(
            "❌ OpenSpec is not installed.\n\n\
             Please install OpenSpec manually:\n\
             ```bash\n{INSTALL_COMMAND}\n```\n\n\
             📝 Note: Node.js and npm are required. Visit https://nodejs.org/ to install.\n"
        )),
    }
}

fn identifier(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// One-line summary shown above a successful command's stdout
fn success_summary(operation: Operation, args: &ToolArguments, directory: &Path) -> String {
    match operation {
        Operation::CheckStatus => "OpenSpec is installed!".to_string(),
        Operation::Init => format!("OpenSpec initialized in: {}", directory.display()),
        Operation::Update => "OpenSpec instruction files updated!".to_string(),
        Operation::List => format!("List of {}:", args.list_type()),
        Operation::Show => format!("Item: {}", identifier(&args.item_name)),
        Operation::ChangeShow => format!("Change proposal: {}", identifier(&args.change_name)),
        Operation::ChangeValidate => "Change validation successful!".to_string(),
        Operation::SpecShow => format!("Specification: {}", identifier(&args.spec_id)),
        Operation::SpecList => "Available specifications:".to_string(),
        Operation::SpecValidate => "Spec validation successful!".to_string(),
        Operation::Validate => "Validation successful!".to_string(),
        Operation::Archive => {
            format!("Change archived successfully: {}", identifier(&args.change_name))
        }
        Operation::Help => "OpenSpec Help:".to_string(),
    }
}

/// One-line summary shown above a failed command's stderr
fn failure_summary(operation: Operation, args: &ToolArguments) -> String {
    match operation {
        Operation::CheckStatus => "Failed to check OpenSpec status".to_string(),
        Operation::Init => "Initialization failed".to_string(),
        Operation::Update => "Update failed".to_string(),
        Operation::List => format!("Failed to list {}", args.list_type()),
        Operation::Show => "Failed to show item".to_string(),
        Operation::ChangeShow => "Failed to show change".to_string(),
        Operation::ChangeValidate => "Change validation failed".to_string(),
        Operation::SpecShow => "Failed to show spec".to_string(),
        Operation::SpecList => "Failed to list specs".to_string(),
        Operation::SpecValidate => "Spec validation failed".to_string(),
        Operation::Validate => "Validation failed".to_string(),
        Operation::Archive => "Archive failed".to_string(),
        Operation::Help => "Failed to get help".to_string(),
    }
}

/// Build the response text; captured output is embedded unchanged
fn render(
    operation: Operation,
    args: &ToolArguments,
    directory: &Path,
    output: &CommandOutput,
) -> ToolResult {
    if !output.success {
        return ToolResult::error(format!(
            "❌ {}:\n\n{}",
            failure_summary(operation, args),
            output.stderr
        ));
    }

    let summary = success_summary(operation, args, directory);
    let text = match operation {
        Operation::Help => format!("📖 {summary}\n\n```\n{}\n```", output.stdout),
        Operation::Init => format!("✅ {summary}\n\n{}{NEXT_STEPS}", output.stdout),
        _ => format!("✅ {summary}\n\n{}", output.stdout),
    };
    ToolResult::text(text)
}
