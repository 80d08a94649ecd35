//! Tool definitions: schemas, static tools, and the dynamic tool trait
//!
//! Two authoring models sit behind one descriptor contract:
//! - [`StaticTool`]: fixed name, description, and schema, with a handler
//!   closure bound at registration.
//! - [`DynamicTool`]: an implementation object whose description (and
//!   behavior, if it wants) is computed per request from a
//!   [`RequestContext`].
//!
//! Whether a static handler receives the request context is decided at
//! registration time by which constructor is used, not by inspecting
//! anything at call time.

use super::adapter::DynamicToolAdapter;
use super::result::ValidationError;
use crate::context::RequestContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// JSON Schema for tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// JSON Schema for input parameters
    pub parameters: Value,

    /// Whether unknown fields are rejected
    pub strict: bool,
}

impl ToolSchema {
    /// Create a schema from a JSON Schema value
    pub fn new(parameters: Value) -> Self {
        Self {
            parameters,
            strict: true,
        }
    }

    /// Create an empty schema (tool takes no parameters)
    pub fn empty() -> Self {
        Self {
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
            strict: true,
        }
    }

    /// Set strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Validate arguments against this schema.
    ///
    /// Collects every offending field rather than stopping at the first:
    /// missing required fields, type mismatches on declared properties, and
    /// (in strict mode) unexpected fields.
    pub fn validate(&self, args: &Value) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let Some(args_map) = args.as_object() else {
            return Err(vec![ValidationError::new(
                "arguments",
                "expected an object",
            )]);
        };

        let properties = self
            .parameters
            .get("properties")
            .and_then(Value::as_object);

        if let Some(required) = self.parameters.get("required").and_then(Value::as_array) {
            for field in required.iter().filter_map(Value::as_str) {
                if !args_map.contains_key(field) {
                    errors.push(ValidationError::new(field, "missing required field"));
                }
            }
        }

        for (field, value) in args_map {
            match properties.and_then(|p| p.get(field)) {
                Some(spec) => {
                    if let Some(expected) = spec.get("type").and_then(Value::as_str) {
                        if !type_matches(expected, value) {
                            errors.push(ValidationError::new(
                                field,
                                format!("expected {expected}, got {}", type_name(value)),
                            ));
                        }
                    }
                }
                None if self.strict => {
                    errors.push(ValidationError::new(field, "unexpected field"));
                }
                None => {}
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Check a value against a JSON Schema `type` keyword
fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

/// JSON type name of a value, for error messages
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Boxed future returned by tool handlers
pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;

/// Handler bound to a static tool.
///
/// The variant records, at registration time, whether the handler declared a
/// context parameter; dispatch matches on it instead of reflecting on the
/// callable.
#[derive(Clone)]
pub(crate) enum StaticHandler {
    /// Handler that takes only the bound arguments
    Plain(Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>),
    /// Handler that also receives the request context
    WithContext(Arc<dyn Fn(Value, RequestContext) -> HandlerFuture + Send + Sync>),
}

/// A tool whose exposed metadata is fixed at registration time
#[derive(Clone)]
pub struct StaticTool {
    name: String,
    description: String,
    schema: ToolSchema,
    structured_output: Option<bool>,
    pub(crate) handler: StaticHandler,
}

impl std::fmt::Debug for StaticTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("accepts_context", &self.accepts_context())
            .finish()
    }
}

impl StaticTool {
    /// Create a static tool whose handler takes only the bound arguments
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ToolSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            structured_output: None,
            handler: StaticHandler::Plain(Arc::new(move |args| Box::pin(handler(args)))),
        }
    }

    /// Create a static tool whose handler also receives the request context
    pub fn new_with_context<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ToolSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(Value, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            structured_output: None,
            handler: StaticHandler::WithContext(Arc::new(move |args, ctx| {
                Box::pin(handler(args, ctx))
            })),
        }
    }

    /// Declare whether results are structured (unset means inferred)
    pub fn with_structured_output(mut self, structured: bool) -> Self {
        self.structured_output = Some(structured);
        self
    }

    /// Tool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tool description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameter schema
    pub fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    /// Structured-output declaration (tri-state)
    pub fn structured_output(&self) -> Option<bool> {
        self.structured_output
    }

    /// Whether the handler was registered with a context parameter
    pub fn accepts_context(&self) -> bool {
        matches!(self.handler, StaticHandler::WithContext(_))
    }
}

/// A tool whose description (and optionally behavior) is computed per request
///
/// Implement this trait to expose metadata that depends on the caller, the
/// tenant, or any other per-request data. `describe` is asked for a fresh
/// description on every listing; nothing is cached between requests.
#[async_trait]
pub trait DynamicTool: Send + Sync {
    /// Tool name; must equal the name the tool is registered under
    fn name(&self) -> &str;

    /// Parameter schema, declared once (context parameter excluded)
    fn schema(&self) -> ToolSchema;

    /// Structured-output declaration (tri-state)
    fn structured_output(&self) -> Option<bool> {
        None
    }

    /// Resolve the description for the given request context
    async fn describe(&self, ctx: &RequestContext) -> anyhow::Result<String>;

    /// Handle an invocation with validated arguments and the request context
    async fn call(&self, args: Value, ctx: &RequestContext) -> anyhow::Result<Value>;
}

/// Internal representation of a registered tool
///
/// A tagged union rather than a trait object, so the manager's list/invoke
/// logic pattern-matches explicitly and adding a third variant forces every
/// match site to be revisited.
#[derive(Debug)]
pub enum ToolDescriptor {
    /// Fixed metadata and handler
    Static(StaticTool),
    /// Context-dependent implementation behind the adapter
    Dynamic(DynamicToolAdapter),
}

impl ToolDescriptor {
    /// Tool name
    pub fn name(&self) -> &str {
        match self {
            ToolDescriptor::Static(tool) => tool.name(),
            ToolDescriptor::Dynamic(adapter) => adapter.name(),
        }
    }

    /// Parameter schema
    pub fn schema(&self) -> ToolSchema {
        match self {
            ToolDescriptor::Static(tool) => tool.schema().clone(),
            ToolDescriptor::Dynamic(adapter) => adapter.schema(),
        }
    }

    /// Structured-output declaration (tri-state)
    pub fn structured_output(&self) -> Option<bool> {
        match self {
            ToolDescriptor::Static(tool) => tool.structured_output(),
            ToolDescriptor::Dynamic(adapter) => adapter.structured_output(),
        }
    }
}

#[cfg(test)]
mod tool_tests {
    use super::*;
    use serde_json::json;

    fn echo_schema() -> ToolSchema {
        ToolSchema::new(json!({
            "type": "object",
            "properties": {
                "text": { "type": "string" }
            },
            "required": ["text"]
        }))
    }

    #[test]
    fn test_validate_ok() {
        let schema = echo_schema();
        assert!(schema.validate(&json!({"text": "hi"})).is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let schema = ToolSchema::new(json!({
            "type": "object",
            "properties": {
                "text": { "type": "string" },
                "count": { "type": "integer" }
            },
            "required": ["text", "count"]
        }));

        // Missing `text`, wrong type for `count`, unexpected `extra`
        let errors = schema
            .validate(&json!({"count": "three", "extra": true}))
            .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(errors.len(), 3);
        assert!(fields.contains(&"text"));
        assert!(fields.contains(&"count"));
        assert!(fields.contains(&"extra"));
    }

    #[test]
    fn test_validate_non_object_args() {
        let schema = echo_schema();
        let errors = schema.validate(&json!("not an object")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "arguments");
    }

    #[test]
    fn test_validate_lenient_allows_extra_fields() {
        let schema = echo_schema().with_strict(false);
        assert!(schema.validate(&json!({"text": "hi", "extra": 1})).is_ok());
    }

    #[test]
    fn test_empty_schema_rejects_arguments() {
        let schema = ToolSchema::empty();
        assert!(schema.validate(&json!({})).is_ok());
        assert!(schema.validate(&json!({"anything": 1})).is_err());
    }

    #[test]
    fn test_accepts_context_flag() {
        let plain = StaticTool::new("a", "plain", ToolSchema::empty(), |_args| async {
            Ok(Value::Null)
        });
        assert!(!plain.accepts_context());

        let contextual =
            StaticTool::new_with_context("b", "ctx", ToolSchema::empty(), |_args, _ctx| async {
                Ok(Value::Null)
            });
        assert!(contextual.accepts_context());
    }

    #[test]
    fn test_structured_output_declaration() {
        let tool = StaticTool::new("a", "d", ToolSchema::empty(), |_args| async {
            Ok(Value::Null)
        });
        assert_eq!(tool.structured_output(), None);

        let tool = tool.with_structured_output(true);
        assert_eq!(tool.structured_output(), Some(true));
    }
}
