//! Tool registry: registration, lookup, and insertion-ordered iteration
//!
//! The registry maps tool names to descriptors. It is populated during a
//! setup phase and read-only while serving; listing order is registration
//! order and never depends on request context.

use super::adapter::DynamicToolAdapter;
use super::tool::{DynamicTool, StaticTool, ToolDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

/// Error type for registry operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    /// Tool with this name already exists
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    /// A dynamic tool declared a different name than it was registered under
    #[error("Dynamic tool registered as '{registered}' declares name '{declared}'")]
    NameMismatch {
        /// Name supplied at registration
        registered: String,
        /// Name the implementation reports
        declared: String,
    },
}

/// Registry of static and dynamic tool descriptors
///
/// Insertion order is preserved and is the canonical listing order.
#[derive(Default)]
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.descriptors.len())
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor of either variant.
    ///
    /// Fails with [`RegistryError::DuplicateTool`] if the name is taken; the
    /// registry is left unchanged on failure.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), RegistryError> {
        let name = descriptor.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        self.index.insert(name, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Register a static tool
    pub fn register_static(&mut self, tool: StaticTool) -> Result<(), RegistryError> {
        self.register(ToolDescriptor::Static(tool))
    }

    /// Register a dynamic tool under an explicit name.
    ///
    /// The implementation's declared name must match `name`; a mismatch is a
    /// registration-time error, never a runtime one.
    pub fn register_dynamic(
        &mut self,
        name: impl Into<String>,
        tool: Arc<dyn DynamicTool>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if tool.name() != name {
            return Err(RegistryError::NameMismatch {
                registered: name,
                declared: tool.name().to_string(),
            });
        }
        self.register(ToolDescriptor::Dynamic(DynamicToolAdapter::new(tool)))
    }

    /// Get a descriptor by name
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate descriptors in registration order.
    ///
    /// The iterator is lazy and restartable; iterating never mutates the
    /// registry.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.descriptors.iter()
    }

    /// All tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(ToolDescriptor::name).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
