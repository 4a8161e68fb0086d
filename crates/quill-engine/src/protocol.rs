//! Chat-completion wire format
//!
//! The minimal subset of the OpenAI-compatible protocol the engine
//! needs: one request shape, one response shape, reported usage.

use serde::{Deserialize, Serialize};

/// Chat completion request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages, system prompt first when present
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// A single conversation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role ("system", "user", "assistant")
    pub role: String,
    /// Text content
    pub content: String,
}

impl ChatMessage {
    /// A system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_owned(),
            content: content.into(),
        }
    }

    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_owned(),
            content: content.into(),
        }
    }
}

/// Chat completion response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Generated choices; the engine reads the first
    pub choices: Vec<ChatChoice>,
    /// Provider-reported token usage
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// One completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: AssistantMessage,
}

/// Assistant message within a response choice
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    /// Text content; may be absent on refusals
    #[serde(default)]
    pub content: Option<String>,
}

/// Provider-reported token usage
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion)
    #[serde(default)]
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_optionals() {
        let request = ChatRequest {
            model: "deepseek/deepseek-chat".to_owned(),
            messages: vec![ChatMessage::user("hello")],
            temperature: None,
            max_tokens: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn response_parses_usage() {
        let raw = serde_json::json!({
            "id": "gen-123",
            "choices": [{"message": {"role": "assistant", "content": "hi"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        });

        let response: ChatResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.choices[0].message.content.as_deref(), Some("hi"));
        assert_eq!(response.usage.unwrap().total_tokens, 16);
    }

    #[test]
    fn response_tolerates_missing_usage() {
        let raw = serde_json::json!({
            "choices": [{"message": {"content": "hi"}}]
        });

        let response: ChatResponse = serde_json::from_value(raw).unwrap();
        assert!(response.usage.is_none());
    }
}
