//! # dynmcp - Context-Aware Tool Dispatch for MCP Servers
//!
//! dynmcp is a tool dispatch layer whose tool listings can change per
//! request. Tools come in two authoring models:
//! - **Static tools**: fixed name, description, and schema, with an async
//!   handler that may optionally receive the request context
//! - **Dynamic tools**: fixed name and schema, but a description resolved
//!   against each request's context at listing time
//!
//! Both sit behind one descriptor type, so the registry, the manager, and
//! the MCP server never care which model a tool was authored in.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dynmcp_core::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let server = McpServer::builder()
//!         .name("echo-server")
//!         .with_static_tool(StaticTool::new(
//!             "echo",
//!             "Echoes the input text",
//!             ToolSchema::new(json!({
//!                 "type": "object",
//!                 "properties": { "text": { "type": "string" } },
//!                 "required": ["text"]
//!             })),
//!             |args| async move { Ok(args["text"].clone()) },
//!         ))
//!         .build()?;
//!
//!     server.run(StdioTransport::new()).await
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Registry**: insertion-ordered tool storage with duplicate rejection
//! - **Manager**: context-resolved listing and validated invocation
//! - **MCP server**: JSON-RPC 2.0 surface over stdio or in-memory transports

pub mod config;
pub mod context;
pub mod error;
pub mod mcp;
pub mod tools;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ServerConfig;
    pub use crate::context::{CallerIdentity, RequestContext};
    pub use crate::error::{DynmcpError, Result};
    pub use crate::mcp::{
        ContentBlock, IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcRequest,
        JsonRpcResponse, McpServer, McpServerBuilder, McpServerConfig, McpTool, MemoryTransport,
        RequestId, StdioTransport, Transport,
    };
    pub use crate::tools::{
        DispatchError, DynamicTool, DynamicToolAdapter, RegistryError, StaticTool, ToolDescriptor,
        ToolInfo, ToolListEntry, ToolManager, ToolOutput, ToolRegistry, ToolSchema,
        ValidationError,
    };
}
