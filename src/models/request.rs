// file: src/models/request.rs
// description: inbound request bodies for the index and query endpoints
// reference: internal data structures

use crate::error::Result;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};

fn default_branch() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRequest {
    pub repo_url: String,

    /// Accepted for compatibility; indexing always targets the server's default.
    #[serde(default = "default_branch")]
    pub branch: String,
}

/// One prior turn of a conversation, forwarded untouched to the MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub repo_url: String,
    pub question: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<ConversationMessage>>,
}

impl IndexRequest {
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            branch: default_branch(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_repo_url(&self.repo_url)
    }
}

impl QueryRequest {
    pub fn new(repo_url: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            question: question.into(),
            conversation_history: None,
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationMessage>) -> Self {
        self.conversation_history = Some(history);
        self
    }

    /// Only presence is checked; the MCP server decides what a repository reference means.
    pub fn validate(&self) -> Result<()> {
        Validator::validate_not_blank("repo_url", &self.repo_url)?;
        Validator::validate_not_blank("question", &self.question)
    }

    /// History worth forwarding; an empty list is treated like no history at all.
    pub fn history(&self) -> Option<&[ConversationMessage]> {
        self.conversation_history
            .as_deref()
            .filter(|history| !history.is_empty())
    }
}
