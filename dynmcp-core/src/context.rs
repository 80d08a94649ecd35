//! Per-request context threaded through tool resolution and dispatch
//!
//! A [`RequestContext`] is built by the transport for every incoming request
//! and passed into the manager's list/invoke operations. The core only ever
//! reads from it and never holds on to it past the request; concurrent
//! requests each carry their own context, so nothing can leak between them.

use serde_json::Value;
use std::collections::HashMap;

/// Identity of the caller, as established by the transport's authentication
/// layer (token verification itself happens outside this crate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Subject identifier (e.g. client id or username)
    pub subject: String,

    /// Granted scopes
    pub scopes: Vec<String>,
}

impl CallerIdentity {
    /// Create an identity with no scopes
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            scopes: Vec::new(),
        }
    }

    /// Add a scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }
}

/// Context for one request/invocation
///
/// Carries the caller identity, path parameters extracted by the router, and
/// a handle to the raw transport request for advanced needs. Supplied fresh
/// per request; the core never caches it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Option<CallerIdentity>,
    path_params: HashMap<String, String>,
    raw_request: Value,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the caller identity
    pub fn with_identity(mut self, identity: CallerIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Add a path parameter
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Attach the raw transport request
    pub fn with_raw_request(mut self, raw: Value) -> Self {
        self.raw_request = raw;
        self
    }

    /// Caller identity, if the transport established one
    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.identity.as_ref()
    }

    /// Look up a single path parameter
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// All path parameters
    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    /// The raw transport request (Null when the transport supplies none)
    pub fn raw_request(&self) -> &Value {
        &self.raw_request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let ctx = RequestContext::new()
            .with_identity(CallerIdentity::new("alice").with_scope("tools"))
            .with_path_param("tenant", "acme")
            .with_raw_request(serde_json::json!({"method": "tools/list"}));

        assert_eq!(ctx.identity().unwrap().subject, "alice");
        assert_eq!(ctx.path_param("tenant"), Some("acme"));
        assert_eq!(ctx.path_param("missing"), None);
        assert_eq!(ctx.raw_request()["method"], "tools/list");
    }

    #[test]
    fn test_empty_context() {
        let ctx = RequestContext::new();
        assert!(ctx.identity().is_none());
        assert!(ctx.path_params().is_empty());
        assert!(ctx.raw_request().is_null());
    }
}
