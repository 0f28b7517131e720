use serde::{Deserialize, Serialize};

/// A complete answer, or one streamed chunk of an answer.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatCompletionResponse {
    pub message: String,
}

impl ChatCompletionResponse {
    pub fn new(message: impl ToString) -> Self {
        Self { message: message.to_string() }
    }

    pub fn as_str(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decodes_message() {
        let actual: ChatCompletionResponse =
            serde_json::from_str(r#"{"message": "Hello! How can I help you?"}"#).unwrap();
        assert_eq!(actual, ChatCompletionResponse::new("Hello! How can I help you?"));
    }

    #[test]
    fn test_missing_message_is_rejected() {
        let actual = serde_json::from_value::<ChatCompletionResponse>(json!({"text": "hi"}));
        assert!(actual.is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let actual = serde_json::from_value::<ChatCompletionResponse>(json!({"message": 42}));
        assert!(actual.is_err());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let actual: ChatCompletionResponse =
            serde_json::from_value(json!({"message": "ok", "id": "abc"})).unwrap();
        assert_eq!(actual.as_str(), "ok");
    }
}
