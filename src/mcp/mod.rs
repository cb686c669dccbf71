// file: src/mcp/mod.rs
// description: HTTP client for the external GitHub Chat MCP server
// reference: https://docs.rs/reqwest

pub mod client;

pub use client::{INDEX_REPOSITORY_PATH, McpClient, QUERY_REPOSITORY_PATH};
