//! OpenSpec command-line construction
//!
//! Each operation maps to one fixed verb sequence. Tokens are appended in a
//! fixed order: verbs, then the positional identifier (required or
//! optional), then the non-interactive flag, then the output-format flag.
//! The OpenSpec parser is positional, so identifiers never follow the flag.

use serde::Deserialize;
use serde_json::Value;

use crate::tools::Operation;
use crate::{Error, Result};

/// Flag that stops OpenSpec from prompting on show/validate commands
pub const NO_INTERACTIVE: &str = "--no-interactive";

/// Flag that auto-confirms `archive`
pub const ASSUME_YES: &str = "-y";

/// Arguments accepted by any tool call
///
/// Fields that an operation does not declare are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToolArguments {
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default, rename = "type")]
    pub list_type: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub change_name: Option<String>,
    #[serde(default)]
    pub spec_id: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
}

impl ToolArguments {
    /// Decode the `arguments` member of a tool call
    ///
    /// A missing or `null` value decodes to no arguments.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| Error::InvalidArgument(e.to_string()))
    }

    /// The `directory` argument, `.` when absent
    ///
    /// An empty string is returned as given and fails the existence check.
    pub fn directory(&self) -> &str {
        self.directory.as_deref().unwrap_or(".")
    }

    /// The `type` argument as given, `changes` when absent
    pub fn list_type(&self) -> &str {
        present(&self.list_type).unwrap_or(ListKind::Changes.as_str())
    }
}

/// Treat empty strings like absent values
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn require<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    present(value)
        .ok_or_else(|| Error::InvalidArgument(format!("missing required argument: {name}")))
}

/// Which collection `openspec list` reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Changes,
    Specs,
}

impl ListKind {
    /// Parse a `type` argument; absent means changes
    ///
    /// Unrecognised values yield `None` and the list runs without a flag.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value {
            None | Some("changes") => Some(ListKind::Changes),
            Some("specs") => Some(ListKind::Specs),
            Some(_) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Changes => "changes",
            ListKind::Specs => "specs",
        }
    }

    fn flag(self) -> &'static str {
        match self {
            ListKind::Changes => "--changes",
            ListKind::Specs => "--specs",
        }
    }
}

/// Requested output format for show commands
///
/// Only JSON changes the command line; markdown is OpenSpec's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    /// Parse a format argument; unrecognised values mean "default output"
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value {
            Some("json") => Some(OutputFormat::Json),
            Some("markdown") => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

/// Argument vector passed to the OpenSpec executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    args: Vec<String>,
}

impl CommandLine {
    pub(crate) fn verbs(verbs: &[&str]) -> Self {
        Self {
            args: verbs.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn identifier(mut self, id: &str) -> Self {
        self.args.push(id.to_string());
        self
    }

    fn optional_identifier(self, id: Option<&str>) -> Self {
        match id {
            Some(id) => self.identifier(id),
            None => self,
        }
    }

    fn no_interactive(mut self) -> Self {
        self.args.push(NO_INTERACTIVE.to_string());
        self
    }

    fn assume_yes(mut self) -> Self {
        self.args.push(ASSUME_YES.to_string());
        self
    }

    fn output_format(mut self, format: Option<OutputFormat>) -> Self {
        if format == Some(OutputFormat::Json) {
            self.args.push("--json".to_string());
        }
        self
    }

    fn flag(mut self, flag: &str) -> Self {
        self.args.push(flag.to_string());
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// The probe command line
pub fn version_command() -> CommandLine {
    CommandLine::verbs(&["--version"])
}

/// Build the OpenSpec command line for an operation
///
/// Fails only when a required identifier is missing or an enumerated
/// argument is out of range.
pub fn build_command(operation: Operation, args: &ToolArguments) -> Result<CommandLine> {
    let format = || OutputFormat::parse(present(&args.format));

    let line = match operation {
        Operation::CheckStatus => version_command(),
        Operation::Init => CommandLine::verbs(&["init", ".", "--tools", "cursor"]),
        Operation::Update => CommandLine::verbs(&["update", "."]),
        Operation::List => match ListKind::parse(present(&args.list_type)) {
            Some(kind) => CommandLine::verbs(&["list"]).flag(kind.flag()),
            None => CommandLine::verbs(&["list"]),
        },
        Operation::Show => CommandLine::verbs(&["show"])
            .identifier(require(&args.item_name, "item_name")?)
            .no_interactive()
            .output_format(format()),
        Operation::ChangeShow => CommandLine::verbs(&["change", "show"])
            .identifier(require(&args.change_name, "change_name")?)
            .no_interactive()
            .output_format(format()),
        Operation::ChangeValidate => CommandLine::verbs(&["change", "validate"])
            .optional_identifier(present(&args.change_name))
            .no_interactive(),
        Operation::SpecShow => CommandLine::verbs(&["spec", "show"])
            .identifier(require(&args.spec_id, "spec_id")?)
            .no_interactive()
            .output_format(format()),
        Operation::SpecList => CommandLine::verbs(&["spec", "list"]),
        Operation::SpecValidate => CommandLine::verbs(&["spec", "validate"])
            .optional_identifier(present(&args.spec_id))
            .no_interactive(),
        Operation::Validate => CommandLine::verbs(&["validate"])
            .optional_identifier(present(&args.item_name))
            .no_interactive(),
        Operation::Archive => CommandLine::verbs(&["archive"])
            .identifier(require(&args.change_name, "change_name")?)
            .assume_yes(),
        Operation::Help => CommandLine::verbs(&[])
            .optional_identifier(present(&args.command))
            .flag("--help"),
    };

    Ok(line)
}
