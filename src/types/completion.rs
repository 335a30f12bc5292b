use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Message, MessageRole};

/// Body of a `POST chat/completions` request.
///
/// Built fresh for every turn and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,

    /// System prompt, then history, then the new user message.
    pub messages: Vec<Message>,

    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a new `CompletionRequest`.
    pub fn new(model: impl Into<String>, messages: Vec<Message>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
        }
    }

    /// The system prompt, if the first message carries one.
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role() == MessageRole::System)
            .map(Message::content)
    }
}

/// Body of a successful `chat/completions` response.
///
/// Only the fields MentorAI reads are modelled; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Candidate replies.
    pub choices: Vec<CompletionChoice>,
}

/// One candidate reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChoice {
    /// The reply message.
    pub message: ChoiceMessage,
}

/// The message inside a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Reply text.  Providers send `null` for some non-text replies.
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Extracts the first choice's text.
    pub fn into_text(self) -> Result<String> {
        let Some(choice) = self.choices.into_iter().next() else {
            return Err(Error::serialization("response contained no choices", None));
        };
        choice
            .message
            .content
            .ok_or_else(|| Error::serialization("first choice has no text content", None))
    }
}

/// Response from the list models endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelListResponse {
    /// Models returned by the API.
    pub data: Vec<ModelInfo>,
}

/// A model entry; only the identifier is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Unique model identifier.
    pub id: String,
}

impl ModelListResponse {
    /// The model identifiers in the order the provider listed them.
    pub fn ids(self) -> Vec<String> {
        self.data.into_iter().map(|m| m.id).collect()
    }
}
