//! MCP Protocol Compliance Integration Tests
//!
//! Tests that the MCP server correctly implements JSON-RPC 2.0 and
//! MCP protocol requirements, including ID preservation, error codes,
//! required field validation, and end-to-end tool execution.

use openspec_mcp::{Config, OpenSpecMcpServer};
use serde_json::{Value, json};

/// Create an initialized server whose OpenSpec executable does not exist.
async fn setup_server() -> OpenSpecMcpServer {
    let mut server =
        OpenSpecMcpServer::new(Config::default().with_program("/nonexistent/bin/openspec"));
    server.initialize().await.unwrap();
    server
}

async fn call(server: &OpenSpecMcpServer, request: &str) -> Value {
    serde_json::from_str(&server.handle_message(request).await.unwrap()).unwrap()
}

// ==========================================================================
// JSON-RPC 2.0 ID Preservation
// ==========================================================================

#[tokio::test]
async fn test_numeric_id_preserved_in_response() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":42,"method":"initialize","params":{}}"#,
    )
    .await;

    assert_eq!(response["id"], 42, "Numeric ID must be echoed back exactly");
    assert_eq!(response["jsonrpc"], "2.0");
}

#[tokio::test]
async fn test_string_id_preserved_in_response() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":"req-abc-123","method":"initialize","params":{}}"#,
    )
    .await;

    assert_eq!(
        response["id"], "req-abc-123",
        "String ID must be echoed back exactly"
    );
}

#[tokio::test]
async fn test_id_preserved_in_error_response() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":"err-test","method":"nonexistent/method","params":{}}"#,
    )
    .await;

    assert_eq!(
        response["id"], "err-test",
        "ID must be preserved even in error responses"
    );
    assert!(
        response.get("error").is_some(),
        "Should be an error response"
    );
}

#[tokio::test]
async fn test_id_preserved_in_tool_call_response() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":999999999,"method":"tools/call","params":{"name":"openspec_spec_list","arguments":{}}}"#,
    )
    .await;

    assert_eq!(response["id"], 999999999);
}

// ==========================================================================
// Error Code Correctness (JSON-RPC 2.0 / MCP spec)
// ==========================================================================

#[tokio::test]
async fn test_method_not_found_returns_32601() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"completely/unknown","params":{}}"#,
    )
    .await;

    assert_eq!(
        response["error"]["code"], -32601,
        "Unknown method must return -32601 (Method not found)"
    );
    let msg = response["error"]["message"].as_str().unwrap();
    assert!(
        msg.contains("completely/unknown"),
        "Error message should include the unknown method name, got: {}",
        msg
    );
}

#[tokio::test]
async fn test_invalid_json_returns_parse_error() {
    let server = setup_server().await;

    // Malformed JSON - handle_message returns Err which the stdio loop maps to -32700
    let result = server.handle_message(r#"{"not valid json"#).await;
    assert!(
        matches!(result, Err(openspec_mcp::Error::Json(_))),
        "Malformed JSON should cause handle_message to return a JSON error"
    );
}

#[tokio::test]
async fn test_missing_method_field_is_parse_error() {
    let server = setup_server().await;

    // Valid JSON but missing required "method" field
    let result = server
        .handle_message(r#"{"jsonrpc":"2.0","id":1,"params":{}}"#)
        .await;
    assert!(
        result.is_err(),
        "Missing 'method' field should fail deserialization"
    );
}

#[tokio::test]
async fn test_invalid_params_for_tools_call_returns_32602() {
    let server = setup_server().await;

    // tools/call requires params with "name" field; send garbage params
    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":"not-an-object"}"#,
    )
    .await;

    assert_eq!(
        response["error"]["code"], -32602,
        "tools/call with non-object params should be an invalid-params error"
    );
    assert_eq!(response["id"], 1);
}

// ==========================================================================
// Protocol Version Negotiation
// ==========================================================================

#[tokio::test]
async fn test_initialize_returns_protocol_version() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1.0"}}}"#,
    )
    .await;

    let protocol_version = response["result"]["protocolVersion"].as_str().unwrap();
    assert_eq!(
        protocol_version, "2024-11-05",
        "Server must respond with its supported protocol version"
    );
}

#[tokio::test]
async fn test_initialize_returns_server_info() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    )
    .await;

    let server_info = &response["result"]["serverInfo"];
    assert_eq!(
        server_info["name"].as_str().unwrap(),
        "openspec-mcp",
        "Server name must be 'openspec-mcp'"
    );
    // Version should look like a semver
    let version = server_info["version"].as_str().unwrap();
    assert!(
        version.contains('.'),
        "Version should be semver-like, got: {}",
        version
    );
}

#[tokio::test]
async fn test_initialize_returns_tools_capability_only() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    )
    .await;

    let capabilities = &response["result"]["capabilities"];
    assert!(
        capabilities.get("tools").is_some(),
        "Server must declare tools capability"
    );
    assert!(
        capabilities.get("resources").is_none(),
        "Server exposes no resources"
    );
}

// ==========================================================================
// Notification Handling
// ==========================================================================

#[tokio::test]
async fn test_initialized_notification_returns_empty() {
    let server = setup_server().await;

    let response = server
        .handle_message(r#"{"jsonrpc":"2.0","method":"initialized"}"#)
        .await
        .unwrap();

    assert!(
        response.is_empty(),
        "Notifications must return empty string, got: {}",
        response
    );
}

#[tokio::test]
async fn test_notifications_initialized_returns_empty() {
    let server = setup_server().await;

    let response = server
        .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await
        .unwrap();

    assert!(
        response.is_empty(),
        "notifications/initialized must return empty string"
    );
}

// ==========================================================================
// Response Structure Validation
// ==========================================================================

#[tokio::test]
async fn test_success_response_has_result_not_error() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    )
    .await;

    assert!(
        response.get("result").is_some(),
        "Success response must have 'result' field"
    );
    assert!(
        response.get("error").is_none(),
        "Success response must NOT have 'error' field"
    );
    assert_eq!(response["jsonrpc"], "2.0");
}

#[tokio::test]
async fn test_error_response_has_error_not_result() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"no/such/method","params":{}}"#,
    )
    .await;

    assert!(
        response.get("error").is_some(),
        "Error response must have 'error' field"
    );
    assert!(
        response.get("result").is_none(),
        "Error response must NOT have 'result' field"
    );
    assert!(
        response["error"]["code"].is_i64(),
        "Error code must be an integer"
    );
}

// ==========================================================================
// Tools List Verification
// ==========================================================================

#[tokio::test]
async fn test_tools_list_returns_all_defined_tools() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#,
    )
    .await;

    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 13, "Should list every OpenSpec operation");

    // Verify each tool has required MCP fields
    for tool in tools {
        assert!(
            tool["name"].is_string(),
            "Each tool must have a 'name' string"
        );
        assert!(
            tool["description"].is_string(),
            "Each tool must have a 'description' string"
        );
        assert_eq!(
            tool["inputSchema"]["type"], "object",
            "Each tool must have an object 'inputSchema'"
        );
    }
}

#[tokio::test]
async fn test_tools_list_order_is_stable() {
    let server = setup_server().await;
    let request = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#;

    let names = |response: Value| -> Vec<String> {
        response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect()
    };

    let first = names(call(&server, request).await);
    let second = names(call(&server, request).await);
    assert_eq!(first, second);
    assert_eq!(first[0], "check_openspec_status");
    assert_eq!(first[12], "openspec_help");
}

#[tokio::test]
async fn test_tools_list_declares_required_identifiers() {
    let server = setup_server().await;

    let response = call(
        &server,
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#,
    )
    .await;

    let tools = response["result"]["tools"].as_array().unwrap();
    let archive = tools
        .iter()
        .find(|t| t["name"] == "openspec_archive")
        .unwrap();
    assert_eq!(archive["inputSchema"]["required"], json!(["change_name"]));
}

// ==========================================================================
// Tool Call Error Envelope
// ==========================================================================

#[tokio::test]
async fn test_tool_call_unknown_tool_returns_is_error() {
    let server = setup_server().await;

    let request = serde_json::to_string(&json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {
            "name": "completely_fake_tool",
            "arguments": {}
        }
    }))
    .unwrap();

    let response = call(&server, &request).await;

    // Per MCP spec, tool errors are returned as successful JSON-RPC responses with isError=true
    let result = &response["result"];
    assert_eq!(
        result["isError"], true,
        "Unknown tool should return isError=true in result"
    );
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(
        text.contains("Unknown tool: completely_fake_tool"),
        "Error text should name the unknown tool, got: {}",
        text
    );
}

#[tokio::test]
async fn test_tool_call_without_openspec_returns_install_guidance() {
    let server = setup_server().await;

    let request = r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"openspec_list","arguments":{"type":"specs"}}}"#;
    let response = call(&server, request).await;

    assert_eq!(response["result"]["isError"], true);
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("npm install -g @fission-ai/openspec"), "got: {text}");
}

// ==========================================================================
// Multiple Sequential Requests (statelessness check)
// ==========================================================================

#[tokio::test]
async fn test_sequential_requests_use_correct_ids() {
    let server = setup_server().await;

    // Send multiple requests and verify each gets its own ID back
    let requests = vec![
        (
            r#"{"jsonrpc":"2.0","id":100,"method":"initialize","params":{}}"#,
            100,
        ),
        (
            r#"{"jsonrpc":"2.0","id":200,"method":"tools/list","params":{}}"#,
            200,
        ),
        (r#"{"jsonrpc":"2.0","id":300,"method":"ping"}"#, 300),
    ];

    for (request, expected_id) in requests {
        let response = call(&server, request).await;
        assert_eq!(
            response["id"], expected_id,
            "Request with id={} should get that id back",
            expected_id
        );
    }
}

#[tokio::test]
async fn test_error_after_success_does_not_corrupt_state() {
    let server = setup_server().await;

    // First: valid request
    let r1 = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#;
    let resp1 = call(&server, r1).await;
    assert!(resp1.get("result").is_some());

    // Second: unknown tool (error-flagged result)
    let r2 = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"bogus"}}"#;
    let resp2 = call(&server, r2).await;
    assert_eq!(resp2["result"]["isError"], true);

    // Third: valid request again (should still work)
    let resp3 = call(&server, r1).await;
    assert!(
        resp3.get("result").is_some(),
        "Server should still work after an error response"
    );
    let tools = resp3["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 13, "Should still list all 13 tools");
}
