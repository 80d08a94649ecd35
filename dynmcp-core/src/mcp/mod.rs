//! Model Context Protocol (MCP) Server Implementation
//!
//! This module provides an MCP server over the tool dispatch layer, exposing
//! static and dynamic tools to MCP-compatible clients via JSON-RPC 2.0.
//!
//! # Example
//!
//! ```rust,ignore
//! use dynmcp_core::mcp::{McpServer, StdioTransport};
//!
//! let server = McpServer::builder()
//!     .name("my-server")
//!     .with_static_tool(echo_tool)
//!     .with_dynamic_tool("greet", Arc::new(GreetTool))
//!     .build()?;
//!
//! server.run(StdioTransport::new()).await?;
//! ```
//!
//! # Protocol Overview
//!
//! MCP uses JSON-RPC 2.0 with the following main methods:
//! - `initialize` / `initialized` - Connection setup
//! - `tools/list` - List available tools, descriptions resolved per request
//! - `tools/call` - Call a tool
//!
//! # References
//!
//! - [MCP Specification](https://modelcontextprotocol.io/specification)

mod protocol;
mod server;
mod transport;

pub use protocol::*;
pub use server::{McpServer, McpServerBuilder, McpServerConfig};
pub use transport::{MemoryTransport, StdioTransport, Transport};
