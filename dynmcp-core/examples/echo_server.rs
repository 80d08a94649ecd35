//! Minimal MCP server over stdio with one static and one dynamic tool.
//!
//! Run with:
//! ```sh
//! cargo run --example echo_server
//! ```
//! then speak newline-delimited JSON-RPC on stdin, e.g.
//! `{"jsonrpc":"2.0","id":1,"method":"tools/list"}`.

use async_trait::async_trait;
use dynmcp_core::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

/// Dynamic tool whose description reports the caller it is serving
struct DynamicEcho;

#[async_trait]
impl DynamicTool for DynamicEcho {
    fn name(&self) -> &str {
        "dynamic_echo"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(json!({
            "type": "object",
            "properties": { "text": { "type": "string" } },
            "required": ["text"]
        }))
    }

    async fn describe(&self, ctx: &RequestContext) -> anyhow::Result<String> {
        let subject = ctx
            .identity()
            .map(|id| id.subject.as_str())
            .unwrap_or("anonymous");
        Ok(format!("Echoes the input back to {subject}"))
    }

    async fn call(&self, args: Value, ctx: &RequestContext) -> anyhow::Result<Value> {
        let text = args["text"].as_str().unwrap_or_default();
        let subject = ctx
            .identity()
            .map(|id| id.subject.as_str())
            .unwrap_or("anonymous");
        Ok(json!(format!("Echo to {subject}: {text}")))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the protocol on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::load()?;

    let mut builder = McpServer::builder()
        .name(config.name)
        .version(config.version)
        .enable_tools(config.enable_tools);
    if let Some(allowlist) = config.tool_allowlist {
        builder = builder.with_tool_allowlist(allowlist);
    }

    let server = builder
        .with_static_tool(StaticTool::new(
            "echo",
            "Echoes the input text",
            ToolSchema::new(json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })),
            |args| async move {
                let text = args["text"].as_str().unwrap_or_default();
                Ok(json!(format!("Echo: {text}")))
            },
        ))
        .with_dynamic_tool("dynamic_echo", Arc::new(DynamicEcho))
        .build()?;

    tracing::info!("echo server listening on stdio");
    server.run(StdioTransport::new()).await
}
