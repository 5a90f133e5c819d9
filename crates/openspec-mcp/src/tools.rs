//! MCP Tool registry
//!
//! The static catalog of operations exposed to the host. Each operation maps
//! 1:1 to an OpenSpec command shape (see [`crate::command`]).
//!
//! # Tools
//!
//! ## Installation
//! - `check_openspec_status` - Check whether OpenSpec is installed
//! - `openspec_help` - Show OpenSpec help, optionally for one command
//!
//! ## Project Lifecycle
//! - `openspec_init` - Initialize OpenSpec in a directory
//! - `openspec_update` - Update OpenSpec instruction files
//!
//! ## Changes and Specs
//! - `openspec_list` - List changes or specs
//! - `openspec_show` - Show a change or spec
//! - `openspec_change_show` - Show a change proposal
//! - `openspec_change_validate` - Validate a change proposal
//! - `openspec_spec_show` - Show a specification
//! - `openspec_spec_list` - List specifications
//! - `openspec_spec_validate` - Validate a specification
//! - `openspec_validate` - Validate changes and specs
//! - `openspec_archive` - Archive a completed change

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Every operation the server can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CheckStatus,
    Init,
    Update,
    List,
    Show,
    ChangeShow,
    ChangeValidate,
    SpecShow,
    SpecList,
    SpecValidate,
    Validate,
    Archive,
    Help,
}

impl Operation {
    /// Tool name exposed over MCP
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Descriptor registered for this operation
    pub fn descriptor(self) -> &'static OperationDescriptor {
        OPERATIONS
            .iter()
            .find(|d| d.operation == self)
            .unwrap_or_else(|| unreachable!("every operation is registered"))
    }

    /// Whether the operation works against a project directory
    pub fn uses_directory(self) -> bool {
        !matches!(self, Operation::CheckStatus | Operation::Help)
    }
}

/// One named parameter of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
    /// Allowed values; empty means any string
    pub allowed: &'static [&'static str],
}

impl ParamSpec {
    const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: true,
            default: None,
            allowed: &[],
        }
    }

    const fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: false,
            default: None,
            allowed: &[],
        }
    }

    const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    const fn with_allowed(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!("string"));
        schema.insert("description".into(), json!(self.description));
        if !self.allowed.is_empty() {
            schema.insert("enum".into(), json!(self.allowed));
        }
        if let Some(default) = self.default {
            schema.insert("default".into(), json!(default));
        }
        Value::Object(schema)
    }
}

/// Immutable description of one operation and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub operation: Operation,
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl OperationDescriptor {
    /// Names of the required parameters, in declaration order
    pub fn required_params(&self) -> Vec<&'static str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect()
    }

    /// JSON Schema for the operation's arguments object
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_params(),
        })
    }
}

pub const FORMAT_VALUES: &[&str] = &["json", "markdown"];
pub const LIST_TYPE_VALUES: &[&str] = &["changes", "specs"];

const DIRECTORY: ParamSpec = ParamSpec::optional(
    "directory",
    "Working directory (default: current directory)",
)
.with_default(".");

const FORMAT: ParamSpec =
    ParamSpec::optional("format", "Output format (optional)").with_allowed(FORMAT_VALUES);

/// The operation catalog, in the order presented to hosts
pub static OPERATIONS: [OperationDescriptor; 13] = [
    OperationDescriptor {
        operation: Operation::CheckStatus,
        name: "check_openspec_status",
        description: "Check if OpenSpec is installed and get version information. \
            Only call this once at the beginning or when the user explicitly asks.",
        params: &[],
    },
    OperationDescriptor {
        operation: Operation::Init,
        name: "openspec_init",
        description: "Initialize OpenSpec in a directory. \
            This runs: openspec init . --tools cursor",
        params: &[ParamSpec::optional(
            "directory",
            "Directory to initialize OpenSpec (default: current directory)",
        )
        .with_default(".")],
    },
    OperationDescriptor {
        operation: Operation::Update,
        name: "openspec_update",
        description: "Update OpenSpec instruction files. This runs: openspec update [path]",
        params: &[ParamSpec::optional(
            "directory",
            "Directory to update (default: current directory)",
        )
        .with_default(".")],
    },
    OperationDescriptor {
        operation: Operation::List,
        name: "openspec_list",
        description: "List changes or specs. This runs: openspec list [--specs|--changes]",
        params: &[
            DIRECTORY,
            ParamSpec::optional("type", "List changes or specs (default: changes)")
                .with_allowed(LIST_TYPE_VALUES)
                .with_default("changes"),
        ],
    },
    OperationDescriptor {
        operation: Operation::Show,
        name: "openspec_show",
        description: "Show a change or spec. This runs: openspec show [item-name]",
        params: &[
            DIRECTORY,
            ParamSpec::required("item_name", "Name of the change or spec to show"),
            FORMAT,
        ],
    },
    OperationDescriptor {
        operation: Operation::ChangeShow,
        name: "openspec_change_show",
        description: "Show a change proposal in JSON or markdown format. \
            This runs: openspec change show [change-name]",
        params: &[
            DIRECTORY,
            ParamSpec::required("change_name", "Name of the change proposal to show"),
            FORMAT,
        ],
    },
    OperationDescriptor {
        operation: Operation::ChangeValidate,
        name: "openspec_change_validate",
        description: "Validate a change proposal. \
            This runs: openspec change validate [change-name]",
        params: &[
            DIRECTORY,
            ParamSpec::optional(
                "change_name",
                "Name of the change proposal to validate (optional)",
            ),
        ],
    },
    OperationDescriptor {
        operation: Operation::SpecShow,
        name: "openspec_spec_show",
        description: "Display a specific specification. This runs: openspec spec show [spec-id]",
        params: &[
            DIRECTORY,
            ParamSpec::required("spec_id", "ID of the specification to show"),
            FORMAT,
        ],
    },
    OperationDescriptor {
        operation: Operation::SpecList,
        name: "openspec_spec_list",
        description: "List all available specifications. This runs: openspec spec list",
        params: &[DIRECTORY],
    },
    OperationDescriptor {
        operation: Operation::SpecValidate,
        name: "openspec_spec_validate",
        description: "Validate a specification structure. \
            This runs: openspec spec validate [spec-id]",
        params: &[
            DIRECTORY,
            ParamSpec::optional(
                "spec_id",
                "ID of the specification to validate (optional)",
            ),
        ],
    },
    OperationDescriptor {
        operation: Operation::Validate,
        name: "openspec_validate",
        description: "Validate changes and specs. This runs: openspec validate [item-name]",
        params: &[
            DIRECTORY,
            ParamSpec::optional("item_name", "Name of the item to validate (optional)"),
        ],
    },
    OperationDescriptor {
        operation: Operation::Archive,
        name: "openspec_archive",
        description: "Archive a completed change and update main specs. \
            This runs: openspec archive [change-name]",
        params: &[
            DIRECTORY,
            ParamSpec::required("change_name", "Name of the change to archive"),
        ],
    },
    OperationDescriptor {
        operation: Operation::Help,
        name: "openspec_help",
        description: "Get help information about OpenSpec commands",
        params: &[ParamSpec::optional(
            "command",
            "Specific command to get help for (optional)",
        )],
    },
];

/// All operation descriptors, in a stable order
pub fn list_operations() -> &'static [OperationDescriptor] {
    &OPERATIONS
}

/// Resolve a tool name against the catalog
pub fn find_operation(name: &str) -> Option<&'static OperationDescriptor> {
    OPERATIONS.iter().find(|d| d.name == name)
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl From<&OperationDescriptor> for ToolDefinition {
    fn from(descriptor: &OperationDescriptor) -> Self {
        Self {
            name: descriptor.name.to_string(),
            description: descriptor.description.to_string(),
            input_schema: descriptor.input_schema(),
        }
    }
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    list_operations().iter().map(ToolDefinition::from).collect()
}

/// Result from a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    /// Whether the result is flagged as a failure
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Concatenated text of all content blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect()
    }
}
