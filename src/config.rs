// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{GatewayError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mcp: McpConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
}

/// Address the gateway itself binds to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Location of the external GitHub Chat MCP server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct McpConfig {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub max_in_flight: usize,
    pub failure_policy: FailurePolicy,
}

/// What happens to errors raised by fire-and-forget index calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Log,
    Warn,
    Ignore,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8001,
            timeout_secs: 30,
        }
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 4,
            failure_policy: FailurePolicy::Log,
        }
    }
}

impl McpConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// `host:port` as reported by the status endpoint.
    pub fn server_label(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FailurePolicy {
    /// Level a failed background index is reported at.
    pub fn level(self) -> Level {
        match self {
            FailurePolicy::Log => Level::ERROR,
            FailurePolicy::Warn => Level::WARN,
            FailurePolicy::Ignore => Level::DEBUG,
        }
    }
}

impl GithubConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GITHUB_CHAT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        config.apply_legacy_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Applies `GITHUB_API_KEY`, `MCP_SERVER_HOST` and `MCP_SERVER_PORT` on top of
    /// whatever the file and prefixed environment produced. Empty values count as unset.
    pub fn apply_legacy_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup("GITHUB_API_KEY") {
            self.github.api_key = Some(key);
        }

        if let Some(host) = lookup("MCP_SERVER_HOST") {
            self.mcp.host = host.trim().to_string();
        }

        if let Some(port) = lookup("MCP_SERVER_PORT") {
            self.mcp.port = port.trim().parse().map_err(|e| {
                GatewayError::Config(format!("MCP_SERVER_PORT must be a port number: {}", e))
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.mcp.host.trim().is_empty() {
            return Err(GatewayError::Config("mcp.host must not be empty".to_string()));
        }

        if self.mcp.port == 0 {
            return Err(GatewayError::Config(
                "mcp.port must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(GatewayError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if self.mcp.timeout_secs == 0 {
            return Err(GatewayError::Config(
                "mcp.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.background.max_in_flight == 0 {
            return Err(GatewayError::Config(
                "background.max_in_flight must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
