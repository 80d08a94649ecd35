//! MCP Server Implementation
//!
//! The server that handles MCP requests and dispatches to the tool manager.
//! Every request handler takes a [`RequestContext`]; dynamic descriptions and
//! context-accepting handlers see exactly the context of the request being
//! served, never state left over from an earlier one.

use super::protocol::*;
use super::transport::Transport;
use crate::context::RequestContext;
use crate::tools::{
    DispatchError, DynamicTool, RegistryError, StaticTool, ToolListEntry, ToolManager,
    ToolOutput, ToolRegistry,
};
use serde_json::Value;
use std::sync::Arc;

/// MCP Server configuration
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
    /// Whether to expose tools
    pub enable_tools: bool,
    /// Tool allowlist (None = allow all registered tools)
    pub tool_allowlist: Option<Vec<String>>,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            name: "dynmcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            enable_tools: true,
            tool_allowlist: None,
        }
    }
}

/// MCP Server state
///
/// The tool set is fixed at build time; request handling only reads it, so
/// the server shares freely across tasks behind an `Arc`.
#[derive(Debug)]
pub struct McpServer {
    config: McpServerConfig,
    manager: ToolManager,
}

impl McpServer {
    /// Create a new MCP server builder
    pub fn builder() -> McpServerBuilder {
        McpServerBuilder::new()
    }

    /// The tool manager backing this server
    pub fn manager(&self) -> &ToolManager {
        &self.manager
    }

    /// Handle an incoming JSON-RPC request
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        ctx: &RequestContext,
    ) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await,
            "tools/list" => self.handle_tools_list(request, ctx).await,
            "tools/call" => self.handle_tools_call(request, ctx).await,
            _ => JsonRpcResponse::error(request.id, JsonRpcError::method_not_found()),
        }
    }

    /// Handle an incoming notification. Notifications never get a response.
    pub fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "notifications/initialized" | "initialized" => {
                tracing::debug!("client reported ready");
            }
            other => {
                tracing::debug!(method = other, "ignoring notification");
            }
        }
    }

    /// Handle initialize request
    async fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: InitializeParams = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing initialize params"),
                );
            }
        };

        tracing::debug!(client = %params.client_info.name, "client initialized");

        let mut capabilities = ServerCapabilities::default();
        if self.config.enable_tools {
            capabilities.tools = Some(ToolsCapability {
                list_changed: false,
            });
        }

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities,
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            },
        };

        JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result).unwrap_or(Value::Null),
        )
    }

    fn allowed(&self, name: &str) -> bool {
        match &self.config.tool_allowlist {
            Some(allowlist) => allowlist.iter().any(|allowed| allowed == name),
            None => true,
        }
    }

    /// Handle tools/list request
    async fn handle_tools_list(
        &self,
        request: JsonRpcRequest,
        ctx: &RequestContext,
    ) -> JsonRpcResponse {
        if !self.config.enable_tools {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::new(-32001, "Tools not enabled"),
            );
        }

        let mut tools = Vec::new();
        let mut failed = Vec::new();

        // Filter before resolution so disallowed dynamic tools never run
        let entries = self
            .manager
            .list_filtered(ctx, |name| self.allowed(name))
            .await;
        for entry in entries {
            match entry {
                ToolListEntry::Resolved(info) => tools.push(McpTool {
                    name: info.name,
                    description: info.description,
                    input_schema: info.input_schema,
                    structured_output: info.structured_output,
                }),
                ToolListEntry::Failed { name, error } => {
                    failed.push(FailedTool { name, error })
                }
            }
        }

        let result = ToolsListResult { tools, failed };

        JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result).unwrap_or(Value::Null),
        )
    }

    /// Handle tools/call request
    async fn handle_tools_call(
        &self,
        request: JsonRpcRequest,
        ctx: &RequestContext,
    ) -> JsonRpcResponse {
        if !self.config.enable_tools {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::new(-32001, "Tools not enabled"),
            );
        }

        let params: ToolCallParams = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid tool call params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing tool call params"),
                );
            }
        };

        if !self.allowed(&params.name) {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::new(-32002, format!("Tool '{}' not allowed", params.name)),
            );
        }

        let result = match self.manager.invoke(&params.name, params.arguments, ctx).await {
            Ok(ToolOutput::Text(text)) => ToolCallResult {
                content: vec![ContentBlock::text(text)],
                structured_content: None,
                is_error: None,
            },
            Ok(ToolOutput::Structured(value)) => ToolCallResult {
                content: vec![ContentBlock::text(
                    serde_json::to_string_pretty(&value).unwrap_or_default(),
                )],
                structured_content: Some(value),
                is_error: None,
            },
            Err(DispatchError::UnknownTool(name)) => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::new(-32002, format!("Tool '{}' not found", name)),
                );
            }
            Err(DispatchError::InvalidArguments { tool, errors }) => {
                let data = serde_json::json!({
                    "errors": errors
                        .iter()
                        .map(|e| serde_json::json!({
                            "field": e.field,
                            "message": e.message,
                        }))
                        .collect::<Vec<_>>()
                });
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params(format!("Invalid arguments for tool '{tool}'"))
                        .with_data(data),
                );
            }
            // Handler failures are tool results, not protocol errors
            Err(err) => ToolCallResult {
                content: vec![ContentBlock::text(format!("Error: {}", err))],
                structured_content: None,
                is_error: Some(true),
            },
        };

        JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result).unwrap_or(Value::Null),
        )
    }

    /// Run the server with a transport.
    ///
    /// Each request is served under a fresh [`RequestContext`] carrying the
    /// raw request payload. Notifications are handled without a response.
    /// The loop ends when the peer disconnects or the transport reports an
    /// I/O failure; malformed traffic is recovered inside the transport and
    /// never ends the session.
    pub async fn run<T: Transport>(&self, mut transport: T) -> crate::error::Result<()> {
        loop {
            match transport.receive().await {
                Ok(Some(IncomingMessage::Request(request))) => {
                    let ctx = RequestContext::new().with_raw_request(
                        serde_json::to_value(&request).unwrap_or(Value::Null),
                    );
                    let response = self.handle_request(request, &ctx).await;
                    transport.send(response).await?;
                }
                Ok(Some(IncomingMessage::Notification(notification))) => {
                    self.handle_notification(notification);
                }
                Ok(None) => {
                    // Connection closed
                    break;
                }
                Err(e) => {
                    tracing::error!("Transport error: {}", e);
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Builder for MCP Server
///
/// Registrations are checked eagerly; the first registry failure is
/// remembered and reported by [`McpServerBuilder::build`], so a duplicate
/// name never silently disappears.
pub struct McpServerBuilder {
    config: McpServerConfig,
    registry: ToolRegistry,
    registration_error: Option<RegistryError>,
}

impl McpServerBuilder {
    pub fn new() -> Self {
        Self {
            config: McpServerConfig::default(),
            registry: ToolRegistry::new(),
            registration_error: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Replace the registry wholesale with a pre-populated one
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a static tool
    pub fn with_static_tool(mut self, tool: StaticTool) -> Self {
        if self.registration_error.is_none() {
            if let Err(e) = self.registry.register_static(tool) {
                self.registration_error = Some(e);
            }
        }
        self
    }

    /// Register a dynamic tool under `name`
    pub fn with_dynamic_tool(
        mut self,
        name: impl Into<String>,
        tool: Arc<dyn DynamicTool>,
    ) -> Self {
        if self.registration_error.is_none() {
            if let Err(e) = self.registry.register_dynamic(name, tool) {
                self.registration_error = Some(e);
            }
        }
        self
    }

    pub fn with_tool_allowlist(mut self, tools: Vec<String>) -> Self {
        self.config.tool_allowlist = Some(tools);
        self
    }

    pub fn enable_tools(mut self, enable: bool) -> Self {
        self.config.enable_tools = enable;
        self
    }

    pub fn build(self) -> Result<McpServer, RegistryError> {
        if let Some(e) = self.registration_error {
            return Err(e);
        }
        Ok(McpServer {
            config: self.config,
            manager: ToolManager::new(self.registry),
        })
    }
}

impl Default for McpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
