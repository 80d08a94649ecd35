//! Tool manager: context-resolved listing and validated invocation
//!
//! The manager owns the registry and exposes the two request-shaped
//! operations. Both take a [`RequestContext`]; neither keeps any state
//! across calls, so dropping an in-flight future is all cancellation needs.

use super::registry::ToolRegistry;
use super::result::{ToolInfo, ToolListEntry, ToolOutput, ValidationError};
use super::tool::{StaticHandler, ToolDescriptor};
use crate::context::RequestContext;
use serde_json::Value;

/// Boxed error raised inside a tool handler or dynamic implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for list/invoke operations
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No tool registered under this name
    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    /// Argument binding failed; carries every offending field
    #[error("Invalid arguments for tool '{tool}': {}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidArguments {
        /// Tool name
        tool: String,
        /// All validation failures, not just the first
        errors: Vec<ValidationError>,
    },

    /// A handler or dynamic implementation failed during invocation
    #[error("Tool '{tool}' execution failed: {source}")]
    Execution {
        /// Tool name
        tool: String,
        /// Original failure, preserved as the cause
        #[source]
        source: BoxError,
    },

    /// A dynamic tool's description resolution failed
    #[error("Description resolution failed for tool '{tool}': {source}")]
    DescriptionResolution {
        /// Tool name
        tool: String,
        /// Original failure, preserved as the cause
        #[source]
        source: BoxError,
    },
}

/// Orchestrates listing and invocation over a registry
///
/// The registry is fixed once the manager is built; request handling only
/// ever reads it.
#[derive(Debug)]
pub struct ToolManager {
    registry: ToolRegistry,
}

impl ToolManager {
    /// Create a manager over a populated registry
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// List all tools, resolving dynamic descriptions against `ctx`.
    ///
    /// Entries come back in registration order. A dynamic tool whose
    /// resolution fails yields a [`ToolListEntry::Failed`] marker; the
    /// failure is isolated and every other entry still resolves.
    pub async fn list(&self, ctx: &RequestContext) -> Vec<ToolListEntry> {
        self.list_filtered(ctx, |_| true).await
    }

    /// List the tools whose names pass `allow`, resolving dynamic
    /// descriptions against `ctx`.
    ///
    /// The filter runs before any resolution, so an excluded dynamic tool's
    /// `describe` is never awaited.
    pub async fn list_filtered<F>(&self, ctx: &RequestContext, allow: F) -> Vec<ToolListEntry>
    where
        F: Fn(&str) -> bool,
    {
        let mut entries = Vec::with_capacity(self.registry.len());
        for descriptor in self.registry.iter() {
            if !allow(descriptor.name()) {
                continue;
            }
            match descriptor {
                ToolDescriptor::Static(tool) => {
                    entries.push(ToolListEntry::Resolved(ToolInfo {
                        name: tool.name().to_string(),
                        description: tool.description().to_string(),
                        input_schema: tool.schema().parameters.clone(),
                        structured_output: tool.structured_output(),
                    }));
                }
                ToolDescriptor::Dynamic(adapter) => {
                    match adapter.resolve_description(ctx).await {
                        Ok(description) => {
                            entries.push(ToolListEntry::Resolved(ToolInfo {
                                name: adapter.name().to_string(),
                                description,
                                input_schema: adapter.schema().parameters,
                                structured_output: adapter.structured_output(),
                            }));
                        }
                        Err(error) => {
                            tracing::warn!(
                                tool = adapter.name(),
                                %error,
                                "description resolution failed, emitting marker entry"
                            );
                            entries.push(ToolListEntry::Failed {
                                name: adapter.name().to_string(),
                                error: error.to_string(),
                            });
                        }
                    }
                }
            }
        }
        entries
    }

    /// Invoke a tool by name with raw arguments.
    ///
    /// Arguments are validated against the declared schema before the
    /// handler runs; on validation failure the handler is never called.
    /// Context-accepting static handlers and all dynamic tools receive
    /// `ctx`; handler failures surface as [`DispatchError::Execution`] and
    /// are never retried here.
    pub async fn invoke(
        &self,
        name: &str,
        args: Value,
        ctx: &RequestContext,
    ) -> Result<ToolOutput, DispatchError> {
        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        if let Err(errors) = descriptor.schema().validate(&args) {
            return Err(DispatchError::InvalidArguments {
                tool: name.to_string(),
                errors,
            });
        }

        tracing::debug!(tool = name, "dispatching tool call");

        let raw = match descriptor {
            ToolDescriptor::Static(tool) => {
                let future = match &tool.handler {
                    StaticHandler::Plain(handler) => handler(args),
                    StaticHandler::WithContext(handler) => handler(args, ctx.clone()),
                };
                future.await.map_err(|source| DispatchError::Execution {
                    tool: name.to_string(),
                    source: source.into(),
                })?
            }
            ToolDescriptor::Dynamic(adapter) => adapter.dispatch(args, ctx).await?,
        };

        Ok(ToolOutput::normalize(raw, descriptor.structured_output()))
    }
}

#[cfg(test)]
mod manager_tests {
    use super::*;
    use crate::tools::{StaticTool, ToolSchema};
    use serde_json::json;

    fn echo_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register_static(StaticTool::new(
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
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_invoke_echo() {
        let manager = ToolManager::new(echo_registry());
        let out = manager
            .invoke("echo", json!({"text": "hi"}), &RequestContext::new())
            .await
            .unwrap();
        assert_eq!(out, ToolOutput::Text("Echo: hi".to_string()));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let manager = ToolManager::new(echo_registry());
        let err = manager
            .invoke("missing", json!({}), &RequestContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTool(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_invoke_reports_all_invalid_fields() {
        let mut registry = ToolRegistry::new();
        registry
            .register_static(StaticTool::new(
                "pair",
                "Needs two fields",
                ToolSchema::new(json!({
                    "type": "object",
                    "properties": {
                        "a": { "type": "string" },
                        "b": { "type": "integer" }
                    },
                    "required": ["a", "b"]
                })),
                |_args| async { Ok(json!(null)) },
            ))
            .unwrap();
        let manager = ToolManager::new(registry);

        let err = manager
            .invoke("pair", json!({"b": "nope"}), &RequestContext::new())
            .await
            .unwrap_err();
        match err {
            DispatchError::InvalidArguments { tool, errors } => {
                assert_eq!(tool, "pair");
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert!(fields.contains(&"a"));
                assert!(fields.contains(&"b"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_execution_failure_wrapped_with_cause() {
        let mut registry = ToolRegistry::new();
        registry
            .register_static(StaticTool::new(
                "boom",
                "Always fails",
                ToolSchema::empty(),
                |_args| async { Err(anyhow::anyhow!("kaboom")) },
            ))
            .unwrap();
        let manager = ToolManager::new(registry);

        let err = manager
            .invoke("boom", json!({}), &RequestContext::new())
            .await
            .unwrap_err();
        match err {
            DispatchError::Execution { tool, source } => {
                assert_eq!(tool, "boom");
                assert!(source.to_string().contains("kaboom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_filtered_list_never_resolves_excluded_tools() {
        use crate::tools::DynamicTool;
        use async_trait::async_trait;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        struct CountingDescribe {
            describes: AtomicUsize,
        }

        #[async_trait]
        impl DynamicTool for CountingDescribe {
            fn name(&self) -> &str {
                "counted"
            }

            fn schema(&self) -> ToolSchema {
                ToolSchema::empty()
            }

            async fn describe(&self, _ctx: &RequestContext) -> anyhow::Result<String> {
                self.describes.fetch_add(1, Ordering::SeqCst);
                Ok("counted".to_string())
            }

            async fn call(
                &self,
                _args: serde_json::Value,
                _ctx: &RequestContext,
            ) -> anyhow::Result<serde_json::Value> {
                Ok(serde_json::Value::Null)
            }
        }

        let tool = Arc::new(CountingDescribe {
            describes: AtomicUsize::new(0),
        });
        let mut registry = echo_registry();
        registry
            .register_dynamic("counted", Arc::clone(&tool) as Arc<dyn DynamicTool>)
            .unwrap();
        let manager = ToolManager::new(registry);

        let entries = manager
            .list_filtered(&RequestContext::new(), |name| name == "echo")
            .await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "echo");
        assert_eq!(tool.describes.load(Ordering::SeqCst), 0);

        let entries = manager.list(&RequestContext::new()).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(tool.describes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_context_withheld_from_plain_handler() {
        // A plain handler runs fine even when the request carries identity;
        // a contextual handler sees exactly the request's context.
        let mut registry = ToolRegistry::new();
        registry
            .register_static(StaticTool::new_with_context(
                "whoami",
                "Reports the caller",
                ToolSchema::empty(),
                |_args, ctx| async move {
                    let subject = ctx
                        .identity()
                        .map(|id| id.subject.clone())
                        .unwrap_or_else(|| "anonymous".to_string());
                    Ok(json!(subject))
                },
            ))
            .unwrap();
        let manager = ToolManager::new(registry);

        let ctx = RequestContext::new()
            .with_identity(crate::context::CallerIdentity::new("alice"));
        let out = manager.invoke("whoami", json!({}), &ctx).await.unwrap();
        assert_eq!(out, ToolOutput::Text("alice".to_string()));

        let out = manager
            .invoke("whoami", json!({}), &RequestContext::new())
            .await
            .unwrap();
        assert_eq!(out, ToolOutput::Text("anonymous".to_string()));
    }
}
