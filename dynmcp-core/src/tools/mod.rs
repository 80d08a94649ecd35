//! Tool system: two authoring models behind one dispatch contract
//!
//! This module provides the tool-resolution-and-dispatch engine:
//! - Static and dynamic tool definitions behind a single descriptor type
//! - A registry with duplicate detection and insertion-ordered listing
//! - A manager that resolves descriptions per request and performs
//!   validated invocation with result normalization
//!
//! # Example
//!
//! ```rust,ignore
//! use dynmcp_core::tools::{StaticTool, ToolManager, ToolRegistry, ToolSchema};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register_static(StaticTool::new(
//!     "echo",
//!     "Echoes the input text",
//!     ToolSchema::new(schema_json),
//!     |args| async move { Ok(args["text"].clone()) },
//! ))?;
//!
//! let manager = ToolManager::new(registry);
//! let entries = manager.list(&ctx).await;
//! let output = manager.invoke("echo", args, &ctx).await?;
//! ```

mod adapter;
mod manager;
mod registry;
mod result;
mod tool;

pub use adapter::DynamicToolAdapter;
pub use manager::{BoxError, DispatchError, ToolManager};
pub use registry::{RegistryError, ToolRegistry};
pub use result::{ToolInfo, ToolListEntry, ToolOutput, ValidationError};
pub use tool::{DynamicTool, HandlerFuture, StaticTool, ToolDescriptor, ToolSchema};
