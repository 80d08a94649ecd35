//! Listing and invocation result types
//!
//! Covers the three observable outputs of the manager:
//! - [`ToolInfo`]: the metadata tuple emitted for each listed tool
//! - [`ToolListEntry`]: a listing row, resolved or failed in isolation
//! - [`ToolOutput`]: a normalized invocation result, structured or text

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata for one listed tool
///
/// For a static tool every field is fixed at registration; for a dynamic tool
/// the description is resolved against the request context at listing time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Tool description (possibly context-resolved)
    pub description: String,
    /// JSON Schema for input parameters
    pub input_schema: Value,
    /// Whether results are structured (tri-state; `None` means inferred)
    pub structured_output: Option<bool>,
}

/// One entry of a listing result
///
/// A dynamic tool whose description resolution fails produces a `Failed`
/// marker instead of hiding the rest of the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolListEntry {
    /// Tool metadata resolved successfully
    Resolved(ToolInfo),
    /// Description resolution failed for this entry only
    Failed {
        /// Tool name
        name: String,
        /// Resolution error message
        error: String,
    },
}

impl ToolListEntry {
    /// Name of the tool this entry refers to
    pub fn name(&self) -> &str {
        match self {
            ToolListEntry::Resolved(info) => &info.name,
            ToolListEntry::Failed { name, .. } => name,
        }
    }

    /// The resolved metadata, if resolution succeeded
    pub fn info(&self) -> Option<&ToolInfo> {
        match self {
            ToolListEntry::Resolved(info) => Some(info),
            ToolListEntry::Failed { .. } => None,
        }
    }

    /// Whether this entry is a failure marker
    pub fn is_failed(&self) -> bool {
        matches!(self, ToolListEntry::Failed { .. })
    }
}

/// Normalized result of a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolOutput {
    /// Plain text content
    Text(String),
    /// Structured content, serialized as-is on the wire
    Structured(Value),
}

impl ToolOutput {
    /// Normalize a raw handler return value.
    ///
    /// - `Some(true)`: the value is structured data, kept as-is.
    /// - `Some(false)`: the value is coerced to text; string payloads are
    ///   taken verbatim, anything else is rendered as compact JSON.
    /// - `None`: inferred from the value's shape — objects and arrays are
    ///   structured, strings and other scalars are text. This inference
    ///   changes observable wire output, so it is pinned down by tests.
    pub fn normalize(value: Value, structured: Option<bool>) -> Self {
        match structured {
            Some(true) => ToolOutput::Structured(value),
            Some(false) => ToolOutput::Text(coerce_text(value)),
            None => match value {
                Value::Object(_) | Value::Array(_) => ToolOutput::Structured(value),
                scalar => ToolOutput::Text(coerce_text(scalar)),
            },
        }
    }

    /// The text content, if this output is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolOutput::Text(text) => Some(text),
            ToolOutput::Structured(_) => None,
        }
    }

    /// The structured value, if this output is structured
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            ToolOutput::Structured(value) => Some(value),
            ToolOutput::Text(_) => None,
        }
    }
}

/// Strings pass through unquoted; everything else renders as compact JSON.
fn coerce_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Validation error for a specific argument field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field name (e.g. "text")
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
