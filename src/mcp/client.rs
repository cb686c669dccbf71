// file: src/mcp/client.rs
// description: shared outbound client for the GitHub Chat MCP index and query tools
// reference: https://docs.rs/reqwest

use crate::config::McpConfig;
use crate::error::{GatewayError, Result};
use crate::models::ConversationMessage;
use crate::utils::{OperationTimer, Validator};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const INDEX_REPOSITORY_PATH: &str = "/tools/index_repository";
pub const QUERY_REPOSITORY_PATH: &str = "/tools/query_repository";

const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Serialize)]
struct IndexRepositoryPayload<'a> {
    repo_url: &'a str,
}

#[derive(Debug, Serialize)]
struct QueryRepositoryPayload<'a> {
    repo_url: &'a str,
    question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_history: Option<&'a [ConversationMessage]>,
}

/// One connection pool for every request; clone or share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct McpClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl McpClient {
    pub fn new(config: &McpConfig) -> Result<Self> {
        Self::with_base_url(config.base_url(), config.timeout())
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn index_repository(&self, repo_url: &str) -> Result<Value> {
        self.call_tool(INDEX_REPOSITORY_PATH, &IndexRepositoryPayload { repo_url })
            .await
    }

    pub async fn query_repository(
        &self,
        repo_url: &str,
        question: &str,
        conversation_history: Option<&[ConversationMessage]>,
    ) -> Result<Value> {
        let payload = QueryRepositoryPayload {
            repo_url,
            question,
            conversation_history: conversation_history.filter(|history| !history.is_empty()),
        };

        self.call_tool(QUERY_REPOSITORY_PATH, &payload).await
    }

    async fn call_tool<P: Serialize>(&self, path: &str, payload: &P) -> Result<Value> {
        let endpoint = self.endpoint(path);
        let timer = OperationTimer::new(path);

        debug!(endpoint = %endpoint, "Calling MCP tool");

        let response = self
            .client
            .post(&endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(&endpoint, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::UpstreamStatus {
                endpoint,
                status: status.as_u16(),
                body: Validator::truncate_text(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let value: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(&endpoint, e)
            } else {
                GatewayError::Decode {
                    endpoint: endpoint.clone(),
                    source: e,
                }
            }
        })?;

        timer.warn_if_slow(self.timeout / 2);
        timer.finish();
        Ok(value)
    }

    fn transport_error(&self, endpoint: &str, source: reqwest::Error) -> GatewayError {
        if source.is_timeout() {
            GatewayError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            GatewayError::Transport {
                endpoint: endpoint.to_string(),
                source,
            }
        }
    }
}
