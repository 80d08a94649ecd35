//! Adapter that gives a dynamic implementation the static descriptor shape
//!
//! The rest of the system talks to tools through two operations: "get the
//! current description" and "invoke with arguments". A static tool answers
//! both from fixed fields; [`DynamicToolAdapter`] answers them by deferring
//! to the wrapped [`DynamicTool`] with the current request context, so the
//! manager never needs to know which authoring model it is holding.

use super::manager::DispatchError;
use super::tool::{DynamicTool, ToolSchema};
use crate::context::RequestContext;
use serde_json::Value;
use std::sync::Arc;

/// Wraps a [`DynamicTool`] so it satisfies the same contract as a static
/// descriptor.
#[derive(Clone)]
pub struct DynamicToolAdapter {
    inner: Arc<dyn DynamicTool>,
}

impl std::fmt::Debug for DynamicToolAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicToolAdapter")
            .field("name", &self.inner.name())
            .finish()
    }
}

impl DynamicToolAdapter {
    /// Wrap a dynamic tool implementation
    pub fn new(tool: Arc<dyn DynamicTool>) -> Self {
        Self { inner: tool }
    }

    /// Tool name (fixed; never depends on context)
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Parameter schema, as declared by the implementation
    pub fn schema(&self) -> ToolSchema {
        self.inner.schema()
    }

    /// Structured-output declaration, delegated to the implementation
    pub fn structured_output(&self) -> Option<bool> {
        self.inner.structured_output()
    }

    /// Resolve the description for this request.
    ///
    /// The result is returned verbatim and never cached: two listings under
    /// different contexts may legitimately yield different strings.
    pub async fn resolve_description(
        &self,
        ctx: &RequestContext,
    ) -> Result<String, DispatchError> {
        self.inner
            .describe(ctx)
            .await
            .map_err(|source| DispatchError::DescriptionResolution {
                tool: self.inner.name().to_string(),
                source: source.into(),
            })
    }

    /// Forward an invocation to the implementation's handler.
    ///
    /// The return value passes through unchanged; failures are wrapped with
    /// the original error kept as the cause.
    pub async fn dispatch(
        &self,
        args: Value,
        ctx: &RequestContext,
    ) -> Result<Value, DispatchError> {
        self.inner
            .call(args, ctx)
            .await
            .map_err(|source| DispatchError::Execution {
                tool: self.inner.name().to_string(),
                source: source.into(),
            })
    }
}

#[cfg(test)]
mod adapter_tests {
    use super::*;
    use crate::context::RequestContext;
    use async_trait::async_trait;
    use serde_json::json;

    struct GreetTool;

    #[async_trait]
    impl DynamicTool for GreetTool {
        fn name(&self) -> &str {
            "greet"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema::empty()
        }

        async fn describe(&self, ctx: &RequestContext) -> anyhow::Result<String> {
            let id = ctx
                .path_param("id")
                .ok_or_else(|| anyhow::anyhow!("no id in path"))?;
            Ok(format!("Hello {id}"))
        }

        async fn call(&self, _args: Value, _ctx: &RequestContext) -> anyhow::Result<Value> {
            Ok(json!("hi"))
        }
    }

    #[tokio::test]
    async fn test_description_resolves_from_context() {
        let adapter = DynamicToolAdapter::new(Arc::new(GreetTool));

        let ctx = RequestContext::new().with_path_param("id", "42");
        assert_eq!(adapter.resolve_description(&ctx).await.unwrap(), "Hello 42");

        // A different context yields a different string; the name does not move
        let ctx = RequestContext::new().with_path_param("id", "7");
        assert_eq!(adapter.resolve_description(&ctx).await.unwrap(), "Hello 7");
        assert_eq!(adapter.name(), "greet");
    }

    #[tokio::test]
    async fn test_description_failure_is_wrapped() {
        let adapter = DynamicToolAdapter::new(Arc::new(GreetTool));

        let err = adapter
            .resolve_description(&RequestContext::new())
            .await
            .unwrap_err();
        match err {
            DispatchError::DescriptionResolution { tool, source } => {
                assert_eq!(tool, "greet");
                assert!(source.to_string().contains("no id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
