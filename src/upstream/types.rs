//! OpenRouter-compatible chat-completion wire types
//!
//! Only the fields the relay reads or writes are modelled; unknown response
//! fields are ignored.

use crate::error::UpstreamError;
use serde::{Deserialize, Serialize};

/// Role of an outgoing chat message; the relay only ever sends user turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A single chat message sent upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

/// Request body for `POST /chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Single-turn request carrying exactly one user message, verbatim
    pub fn single_user_message(model: &'a str, content: &'a str) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: Role::User,
                content,
            }],
        }
    }
}

/// Response body of `POST /chat/completions`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Option<AssistantMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Extract `choices[0].message.content`
    pub fn into_reply(self) -> Result<String, UpstreamError> {
        let first = self
            .choices
            .into_iter()
            .next()
            .ok_or(UpstreamError::EmptyChoices)?;
        first
            .message
            .and_then(|message| message.content)
            .ok_or(UpstreamError::MissingContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_user_message_serializes_one_entry() {
        let request = ChatCompletionRequest::single_user_message("deepseek/deepseek-chat", "hello");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "deepseek/deepseek-chat",
                "messages": [{"role": "user", "content": "hello"}]
            })
        );
    }

    #[test]
    fn test_into_reply_reads_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "gen-123",
            "choices": [
                {"message": {"role": "assistant", "content": "hi there"}, "finish_reason": "stop"},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.into_reply().unwrap(), "hi there");
    }

    #[test]
    fn test_into_reply_empty_choices_fails() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            response.into_reply(),
            Err(UpstreamError::EmptyChoices)
        ));
    }

    #[test]
    fn test_into_reply_missing_choices_fails() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"error": {"message": "rate limited"}})).unwrap();
        assert!(matches!(
            response.into_reply(),
            Err(UpstreamError::EmptyChoices)
        ));
    }

    #[test]
    fn test_into_reply_null_content_fails() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert!(matches!(
            response.into_reply(),
            Err(UpstreamError::MissingContent)
        ));
    }

    #[test]
    fn test_into_reply_empty_content_is_valid() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": ""}}]})).unwrap();
        assert_eq!(response.into_reply().unwrap(), "");
    }
}
