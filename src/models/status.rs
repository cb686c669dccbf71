// file: src/models/status.rs
// description: fixed-shape descriptors for the root, health and status endpoints
// reference: internal data structures

use crate::config::{Config, GithubConfig, McpConfig};
use serde::{Deserialize, Serialize};

pub const SERVICE_MESSAGE: &str = "Tutor Copiloto - GitHub Chat MCP Integration";
pub const HEALTH_SERVICE: &str = "github-integration";
pub const STATUS_SERVICE: &str = "github-chat-mcp-integration";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub service: String,
    pub status: String,
    pub mcp_server: String,
    pub github_api_configured: bool,
}

impl ServiceInfo {
    pub fn running() -> Self {
        Self {
            message: SERVICE_MESSAGE.to_string(),
            status: "running".to_string(),
        }
    }
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: HEALTH_SERVICE.to_string(),
        }
    }
}

impl StatusReport {
    pub fn new(mcp: &McpConfig, github: &GithubConfig) -> Self {
        Self {
            service: STATUS_SERVICE.to_string(),
            status: "active".to_string(),
            mcp_server: mcp.server_label(),
            github_api_configured: github.is_configured(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.mcp, &config.github)
    }

    pub fn format(&self) -> String {
        format!(
            "Service: {}\n\
             Status: {}\n\
             MCP server: {}\n\
             GitHub API configured: {}",
            self.service, self.status, self.mcp_server, self.github_api_configured
        )
    }
}
