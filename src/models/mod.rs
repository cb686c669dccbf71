// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod envelope;
pub mod request;
pub mod status;

pub use envelope::ResponseEnvelope;
pub use request::{ConversationMessage, IndexRequest, QueryRequest};
pub use status::{HealthResponse, ServiceInfo, StatusReport};
