// file: src/models/envelope.rs
// description: uniform success/failure response body returned by the gateway
// reference: internal data structures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Option<Map<String, Value>>,
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn ok(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.to_string()),
        }
    }

    /// Wraps an arbitrary upstream body so `data` is always a mapping.
    pub fn data_from_value(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
        }
    }
}
