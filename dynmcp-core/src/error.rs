//! Error types for dynmcp operations

/// Result type for dynmcp operations
pub type Result<T> = std::result::Result<T, DynmcpError>;

/// Error types for the dynmcp crate
#[derive(Debug, thiserror::Error)]
pub enum DynmcpError {
    /// Tool registration failed
    #[error("Registry error: {0}")]
    Registry(#[from] crate::tools::RegistryError),

    /// Transport-level failure (read, write, framing)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
