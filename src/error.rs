// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request to {endpoint} timed out after {timeout_secs}s")]
    Timeout { endpoint: String, timeout_secs: u64 },

    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("MCP server returned {status} for {endpoint}: {body}")]
    UpstreamStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("Background dispatch error: {0}")]
    Dispatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// True for failures that never reached a well-formed upstream response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_endpoint() {
        let err = GatewayError::Timeout {
            endpoint: "http://localhost:8001/tools/query_repository".to_string(),
            timeout_secs: 30,
        };

        let message = err.to_string();
        assert!(message.contains("timed out after 30s"));
        assert!(message.contains("/tools/query_repository"));
        assert!(err.is_transport());
    }

    #[test]
    fn test_upstream_status_is_not_transport() {
        let err = GatewayError::UpstreamStatus {
            endpoint: "http://localhost:8001/tools/index_repository".to_string(),
            status: 503,
            body: "busy".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "MCP server returned 503 for http://localhost:8001/tools/index_repository: busy"
        );
        assert!(!err.is_transport());
    }
}
