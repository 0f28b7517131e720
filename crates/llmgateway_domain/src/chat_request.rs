use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{Message, ModelId};

/// Output shapes the gateway can be asked to produce.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseFormatType {
    #[default]
    Text,
    JsonObject,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseFormat {
    pub r#type: ResponseFormatType,
}

impl ResponseFormat {
    pub fn text() -> Self {
        Self { r#type: ResponseFormatType::Text }
    }

    pub fn json_object() -> Self {
        Self { r#type: ResponseFormatType::JsonObject }
    }
}

impl From<ResponseFormatType> for ResponseFormat {
    fn from(r#type: ResponseFormatType) -> Self {
        Self { r#type }
    }
}

/// Body of `POST /v1/chat/completions`.
///
/// Tuning fields left unset are omitted from the wire payload entirely, so
/// the gateway applies its own defaults. `stream` is always sent and decides
/// whether the gateway answers with one object or with newline-delimited
/// chunks.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Setters)]
#[setters(strip_option)]
pub struct ChatCompletionRequest {
    #[setters(into)]
    pub model: ModelId,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(default)]
    pub stream: bool,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<ModelId>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            response_format: None,
            stream: false,
        }
    }

    pub fn add_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
