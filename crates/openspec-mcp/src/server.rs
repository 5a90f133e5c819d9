//! MCP Server implementation
//!
//! The main server struct that coordinates MCP protocol handling
//! with OpenSpec command dispatch.

use std::io::{BufRead, Write};

use serde_json::{Value, json};

use crate::config::Config;
use crate::handlers::Dispatcher;
use crate::protocol::{
    InitializeParams, InitializeResult, JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse,
    ToolCallParams, error_codes,
};
use crate::tools::{ToolDefinition, ToolResult, get_tool_definitions};
use crate::{Error, Result};

/// MCP Server for the OpenSpec CLI
///
/// Exposes OpenSpec subcommands as MCP tools over a line-delimited JSON-RPC
/// stream.
///
/// # Example
///
/// ```ignore
/// use openspec_mcp::{Config, OpenSpecMcpServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut server = OpenSpecMcpServer::new(Config::default());
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct OpenSpecMcpServer {
    /// Dispatcher shared by every tool call
    dispatcher: Dispatcher,

    /// Whether the server has been initialized
    initialized: bool,

    /// Available MCP tools
    tools: Vec<ToolDefinition>,
}

impl OpenSpecMcpServer {
    /// Create a new MCP server instance
    pub fn new(config: Config) -> Self {
        Self {
            dispatcher: Dispatcher::new(config),
            initialized: false,
            tools: Vec::new(),
        }
    }

    /// Initialize the server
    ///
    /// Loads the tool catalog. OpenSpec itself is not probed here; every
    /// tool call checks for it.
    pub async fn initialize(&mut self) -> Result<()> {
        tracing::info!(program = %self.dispatcher.config().program_name(), "Initializing MCP server");

        self.tools = get_tool_definitions();
        self.initialized = true;
        Ok(())
    }

    /// Run the MCP server
    ///
    /// This starts the server and begins processing MCP protocol
    /// messages over stdin/stdout.
    pub async fn run(&mut self) -> Result<()> {
        self.initialize().await?;

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        tracing::info!("MCP server ready, listening on stdio");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "Received message");

            let response = match self.handle_message(&line).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to handle message");
                    serde_json::to_string(&failure_response(&e))?
                }
            };

            if !response.is_empty() {
                writeln!(stdout, "{}", response)?;
                stdout.flush()?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Parses the JSON-RPC request and dispatches to the appropriate handler.
    ///
    /// # Returns
    ///
    /// The JSON-RPC response as a string, or empty string for notifications.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let request: JsonRpcRequest = serde_json::from_str(message)?;

        if request.method.starts_with("notifications/") || request.method == "initialized" {
            tracing::debug!(method = %request.method, "Notification received");
            return Ok(String::new());
        }

        if request.jsonrpc != JSONRPC_VERSION {
            let response = JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            );
            return serde_json::to_string(&response).map_err(Error::from);
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    /// Handle the initialize request
    ///
    /// Returns server capabilities and info.
    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        match serde_json::from_value::<InitializeParams>(params) {
            Ok(params) => tracing::info!(
                client = %params.client_info.name,
                client_version = %params.client_info.version,
                protocol = %params.protocol_version,
                "Client connected"
            ),
            Err(e) => tracing::debug!(error = %e, "initialize without client info"),
        }

        let result = InitializeResult::new("openspec-mcp", env!("CARGO_PKG_VERSION"));

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.tools }))
    }

    /// Handle tools/call request
    ///
    /// Tool failures are successful JSON-RPC responses carrying
    /// `isError: true`; only malformed params are protocol errors.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        let result: ToolResult = self
            .dispatcher
            .invoke(&tool_params.name, tool_params.arguments)
            .await;

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Settings the server was started with
    pub fn config(&self) -> &Config {
        self.dispatcher.config()
    }

    /// Check if the server is initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

}

/// Response for a line that could not be handled at all
///
/// The request id is unknown here, so it is written as `null`.
fn failure_response(error: &Error) -> JsonRpcResponse {
    let code = match error {
        Error::Json(_) => error_codes::PARSE_ERROR,
        _ => error_codes::INTERNAL_ERROR,
    };
    JsonRpcResponse::error(None, code, error.to_string())
}
