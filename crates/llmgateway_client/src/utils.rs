use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Helper function to format HTTP request/response context for logging and
/// error reporting
pub(crate) fn format_http_context<U: AsRef<str>>(
    status: Option<StatusCode>,
    method: &str,
    url: U,
) -> String {
    if let Some(status) = status {
        format!("{} {} {}", status.as_u16(), method, url.as_ref())
    } else {
        format!("{} {}", method, url.as_ref())
    }
}

/// Decodes a complete response body, naming what was expected on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8], expected: &str, context: &str) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::validation(format!("{expected} from {context}"), e))
}
