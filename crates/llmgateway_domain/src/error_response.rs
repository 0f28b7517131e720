use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error payload returned by the gateway alongside a non-2xx status.
///
/// The inner object is free-form; only `message` is conventionally present.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: Map<String, Value>,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<&str> {
        self.error.get("message").and_then(Value::as_str)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(message) => f.write_str(message),
            None => f.write_str(
                &serde_json::to_string(&self.error).map_err(|_| std::fmt::Error)?,
            ),
        }
    }
}
