//! Configuration types for the dispatch server

use serde::{Deserialize, Serialize};

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name advertised during the initialize handshake
    pub name: String,

    /// Server version advertised during the initialize handshake
    pub version: String,

    /// Whether to expose tools at all
    pub enable_tools: bool,

    /// Tool allowlist (None = allow all registered tools)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_allowlist: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "dynmcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            enable_tools: true,
            tool_allowlist: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order, later sources overriding earlier ones:
    /// 1. Default configuration
    /// 2. `dynmcp.toml`, then the file named by DYNMCP_CONFIG_PATH
    /// 3. Environment variable overrides (DYNMCP_ prefix)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid.
    pub fn load() -> crate::error::Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file("dynmcp.toml"));

        if let Ok(path) = std::env::var("DYNMCP_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        // Env comes last so it beats every file
        let figment = figment.merge(Env::prefixed("DYNMCP_"));

        let config: ServerConfig = figment.extract().map_err(|e| {
            crate::error::DynmcpError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        use figment::{
            providers::{Format, Serialized, Toml},
            Figment,
        };

        let config: ServerConfig = Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                crate::error::DynmcpError::Configuration(format!(
                    "Failed to load configuration file: {}",
                    e
                ))
            })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.name.is_empty() {
            return Err(crate::error::DynmcpError::Configuration(
                "Server name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.name, "dynmcp");
        assert!(config.enable_tools);
        assert!(config.tool_allowlist.is_none());
    }

    #[test]
    fn test_load_from_toml_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "dynmcp.toml",
                r#"
                name = "configured"
                enable_tools = true
                tool_allowlist = ["echo"]
            "#,
            )?;
            jail.set_env("DYNMCP_NAME", "from-env");

            let config = ServerConfig::load().expect("load should succeed");
            assert_eq!(config.name, "from-env");
            assert_eq!(config.tool_allowlist.as_deref(), Some(&["echo".to_string()][..]));
            Ok(())
        });
    }

    #[test]
    fn test_alternate_config_path_yields_to_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("dynmcp.toml", r#"name = "base""#)?;
            jail.create_file("alt.toml", r#"name = "from-file""#)?;
            jail.set_env("DYNMCP_CONFIG_PATH", "alt.toml");

            // The alternate file overrides dynmcp.toml...
            let config = ServerConfig::load().expect("load should succeed");
            assert_eq!(config.name, "from-file");

            // ...but env still overrides every file
            jail.set_env("DYNMCP_NAME", "from-env");
            let config = ServerConfig::load().expect("load should succeed");
            assert_eq!(config.name, "from-env");
            Ok(())
        });
    }

    #[test]
    fn test_empty_name_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("server.toml", r#"name = """#)?;
            let err = ServerConfig::from_file("server.toml").unwrap_err();
            assert!(err.to_string().contains("must not be empty"));
            Ok(())
        });
    }
}
