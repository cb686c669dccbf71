// file: src/gateway/state.rs
// description: shared handler state injected into the axum router
// reference: https://docs.rs/axum/latest/axum/extract/struct.State.html

use crate::config::Config;
use crate::gateway::dispatcher::BackgroundDispatcher;
use crate::mcp::McpClient;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mcp: Arc<McpClient>,
    pub dispatcher: BackgroundDispatcher,
}

impl AppState {
    pub fn new(config: Arc<Config>, mcp: Arc<McpClient>, dispatcher: BackgroundDispatcher) -> Self {
        Self {
            config,
            mcp,
            dispatcher,
        }
    }
}
