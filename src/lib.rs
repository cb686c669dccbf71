// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod mcp;
pub mod models;
pub mod utils;

pub use config::{BackgroundConfig, Config, FailurePolicy, GithubConfig, McpConfig, ServerConfig};
pub use error::{GatewayError, Result};
pub use gateway::{AppState, BackgroundDispatcher, Gateway, IndexJob, build_router, run_server};
pub use mcp::McpClient;
pub use models::{
    ConversationMessage, HealthResponse, IndexRequest, QueryRequest, ResponseEnvelope,
    ServiceInfo, StatusReport,
};
pub use utils::{OperationTimer, Validator};
