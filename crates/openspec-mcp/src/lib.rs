//! MCP Server for the OpenSpec CLI
//!
//! This crate exposes OpenSpec subcommands via the Model Context Protocol (MCP),
//! allowing agentic IDEs (like Claude Desktop, Windsurf, Cursor) to initialize
//! projects, inspect changes and specs, validate them, and archive finished work.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client (Claude/IDE) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ server ] --> [ handlers::Dispatcher ]
//!                      |  tools::find_operation
//!                      |  command::build_command
//!                      v
//!               [ executor::CommandRunner ]
//!                      | (child process, 300s timeout)
//!                      v
//!               [ openspec CLI ]
//! ```
//!
//! # Tools
//!
//! See [`tools`] for the full catalog. Every tool returns a single text block;
//! failures (OpenSpec missing, bad directory, non-zero exit, timeout) are
//! reported with `isError: true` rather than as protocol errors.

pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::Config;
pub use error::{Error, Result};
pub use handlers::Dispatcher;
pub use server::OpenSpecMcpServer;
pub use tools::{
    OperationDescriptor, ToolContent, ToolDefinition, ToolResult, get_tool_definitions,
    list_operations,
};
