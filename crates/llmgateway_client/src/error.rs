use std::pin::Pin;

use llmgateway_domain::ErrorResponse;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{method} {url} failed with status {status}: {}", .body.as_deref().unwrap_or("[Unknown]"))]
    Http {
        status: u16,
        method: &'static str,
        url: String,
        body: Option<String>,
    },

    #[error("Failed to decode {context}: {source}")]
    Validation {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Transport failure: {context}")]
    Transport {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("Client has been closed")]
    Closed,

    #[error("No API key found. Please set LLMGATEWAY_API_KEY")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("API key can not be sent as a header value")]
    InvalidApiKey(#[source] reqwest::header::InvalidHeaderValue),
}

impl Error {
    pub(crate) fn validation(context: impl ToString, source: serde_json::Error) -> Self {
        Error::Validation { context: context.to_string(), source }
    }

    pub(crate) fn transport(context: impl ToString, source: impl Into<BoxError>) -> Self {
        Error::Transport { context: context.to_string(), source: source.into() }
    }

    /// Status code of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parses the body of a rejected request as the gateway's error payload.
    pub fn error_response(&self) -> Option<ErrorResponse> {
        match self {
            Error::Http { body: Some(body), .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Error::Http { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }
}

pub type Result<A> = std::result::Result<A, Error>;
pub type BoxStream<A> = Pin<Box<dyn futures::Stream<Item = Result<A>> + Send>>;
pub type ResultStream<A> = Result<BoxStream<A>>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn http_fixture(body: Option<&str>) -> Error {
        Error::Http {
            status: 401,
            method: "GET",
            url: "https://api.llmgateway.io/v1/models".to_string(),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn test_http_error_display() {
        let actual = http_fixture(Some("unauthorized")).to_string();
        let expected = "GET https://api.llmgateway.io/v1/models failed with status 401: unauthorized";
        assert_eq!(actual, expected);

        let actual = http_fixture(None).to_string();
        assert!(actual.ends_with("[Unknown]"));
    }

    #[test]
    fn test_error_response_from_body() {
        let fixture = http_fixture(Some(r#"{"error": {"message": "Invalid API key"}}"#));

        assert_eq!(fixture.status(), Some(401));
        let actual = fixture.error_response().unwrap();
        assert_eq!(actual.message(), Some("Invalid API key"));
    }

    #[test]
    fn test_error_response_from_plain_body() {
        let fixture = http_fixture(Some("Internal Server Error"));
        assert_eq!(fixture.error_response(), None);
    }

    #[test]
    fn test_validation_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let fixture = Error::validation("stream chunk", source);

        assert!(fixture.is_validation());
        assert!(std::error::Error::source(&fixture).is_some());
        assert!(fixture.to_string().starts_with("Failed to decode stream chunk"));
        assert_eq!(fixture.status(), None);
    }

    #[test]
    fn test_transport_error_from_io() {
        let source = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let fixture = Error::transport("POST /v1/chat/completions", source);

        assert!(fixture.is_transport());
        assert_eq!(fixture.to_string(), "Transport failure: POST /v1/chat/completions");
    }
}
