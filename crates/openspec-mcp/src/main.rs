//! OpenSpec MCP Server
//!
//! A Model Context Protocol server that exposes the OpenSpec CLI
//! to agentic IDEs like Claude Desktop, Windsurf, and Cursor.
//!
//! # Usage
//!
//! ```bash
//! openspec-mcp [--program <path>] [--timeout-secs <n>] [--probe-timeout-secs <n>]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `openspec_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use openspec_mcp::config::{DEFAULT_PROBE_TIMEOUT, DEFAULT_PROGRAM, DEFAULT_TIMEOUT};
use openspec_mcp::{Config, OpenSpecMcpServer};

/// MCP server for the OpenSpec CLI
#[derive(Parser)]
#[command(name = "openspec-mcp")]
#[command(about = "MCP server for the OpenSpec CLI")]
#[command(version)]
struct Args {
    /// OpenSpec executable to run
    #[arg(short, long, default_value = DEFAULT_PROGRAM)]
    program: PathBuf,

    /// Seconds before a running OpenSpec command is killed
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Seconds allowed for the `openspec --version` installation probe
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT.as_secs())]
    probe_timeout_secs: u64,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config::default()
            .with_program(args.program)
            .with_timeout(Duration::from_secs(args.timeout_secs))
            .with_probe_timeout(Duration::from_secs(args.probe_timeout_secs))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("openspec_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from(Args::parse());

    tracing::info!(program = ?config.program, timeout = ?config.timeout, "Starting openspec-mcp server");

    let mut server = OpenSpecMcpServer::new(config);
    server.run().await?;

    Ok(())
}
