//! LLM integration via OpenRouter's OpenAI-compatible API.
//!
//! The agent only ever needs one operation: send the full message history
//! plus the available tool schemas, get back the assistant's reply. That
//! seam is the [`LlmClient`] trait so tests can substitute a stub model.

mod types;

pub use types::{AssistantReply, ChatMessage, FunctionCall, Role, ToolCall, ToolSchema};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Base URL for the OpenRouter API.
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("LLM response contained no choices")]
    MissingChoices,

    #[error("LLM returned an empty response (no content, no tool calls)")]
    EmptyResponse,
}

/// A client capable of one chat-completion round trip.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the full message history and return the assistant's reply.
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<AssistantReply, LlmError>;
}

/// OpenRouter-backed implementation of [`LlmClient`].
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantReply,
}

impl OpenRouterClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENROUTER_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<AssistantReply, LlmError> {
        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = serde_json::json!(tools);
            }
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(LlmError::MissingChoices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_response_parses() {
        let raw = r#"{
            "id": "gen-123",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "There are 5 orders."},
                "finish_reason": "stop"
            }]
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("There are 5 orders.")
        );
    }

    #[test]
    fn empty_choices_is_an_error() {
        let raw = r#"{"choices": []}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices.is_empty());
    }
}
