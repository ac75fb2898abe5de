//! Uniform response body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::HandlerError;

/// Every response, success or failure, is wrapped in this envelope.
///
/// ```json
/// { "statusCode": 200, "message": "OK", "data": { ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

impl ResponseEnvelope {
    pub fn ok(data: Value) -> Self {
        Self {
            status_code: 200,
            message: "OK".to_string(),
            data,
        }
    }

    pub fn from_error(err: &HandlerError) -> Self {
        Self {
            status_code: err.status_code(),
            message: err.to_string(),
            data: Value::Null,
        }
    }

    pub fn from_result(result: Result<Value, HandlerError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::from_error(&err),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
