//! Model invocation adapter.
//!
//! One call in, one reply out. The adapter converts the domain transcript
//! into wire messages, sends the full history on every call (the model is
//! stateless between turns), and classifies the reply as either a final
//! answer or a batch of tool requests. Retries are deliberately absent: a
//! failed model call fails the whole query cycle.

use std::sync::Arc;

use serde_json::json;

use crate::llm::{
    AssistantReply, ChatMessage, FunctionCall, LlmClient, LlmError, Role, ToolCall, ToolSchema,
};

use super::transcript::{Message, ToolCallRequest, Transcript};

/// What the model decided on this turn.
#[derive(Debug)]
pub enum ModelTurn {
    /// Terminal: the model answered in text.
    Answer(String),
    /// Non-terminal: the model wants tools run. Any text alongside the
    /// requests is kept so it stays on the transcript.
    ToolRequests {
        content: Option<String>,
        requests: Vec<ToolCallRequest>,
    },
}

/// Adapter over an [`LlmClient`] for one agent's model.
pub struct ModelAdapter {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl ModelAdapter {
    pub fn new(llm: Arc<dyn LlmClient>, model: String) -> Self {
        Self { llm, model }
    }

    /// Present the full transcript and tool schemas to the model and
    /// classify its reply.
    pub async fn ask(
        &self,
        transcript: &Transcript,
        tools: &[ToolSchema],
    ) -> Result<ModelTurn, LlmError> {
        let messages = to_wire(transcript);
        let reply = self
            .llm
            .chat_completion(&self.model, &messages, Some(tools))
            .await?;
        classify(reply)
    }
}

/// Convert the domain transcript into chat-completions wire messages.
fn to_wire(transcript: &Transcript) -> Vec<ChatMessage> {
    transcript
        .messages()
        .iter()
        .map(|message| match message {
            Message::User { content } => ChatMessage {
                role: Role::User,
                content: Some(content.clone()),
                tool_calls: None,
                tool_call_id: None,
            },
            Message::Assistant {
                content,
                tool_calls,
            } => ChatMessage {
                role: Role::Assistant,
                content: content.clone(),
                tool_calls: if tool_calls.is_empty() {
                    None
                } else {
                    Some(tool_calls.iter().map(to_wire_call).collect())
                },
                tool_call_id: None,
            },
            Message::ToolResult {
                tool_call_id,
                content,
            } => ChatMessage {
                role: Role::Tool,
                content: Some(content.render()),
                tool_calls: None,
                tool_call_id: Some(tool_call_id.clone()),
            },
        })
        .collect()
}

fn to_wire_call(request: &ToolCallRequest) -> ToolCall {
    ToolCall {
        id: request.id.clone(),
        call_type: "function".to_string(),
        function: FunctionCall {
            name: request.name.clone(),
            arguments: request.arguments.to_string(),
        },
    }
}

/// Decide whether a reply is terminal.
///
/// A non-empty tool-call list makes the turn non-terminal even when text
/// is present; a reply with neither text nor calls is malformed.
fn classify(reply: AssistantReply) -> Result<ModelTurn, LlmError> {
    match reply.tool_calls {
        Some(calls) if !calls.is_empty() => {
            let requests = calls
                .into_iter()
                .map(|call| ToolCallRequest {
                    id: call.id,
                    name: call.function.name,
                    // Unparseable argument JSON becomes an empty object;
                    // validation downstream reports what is missing.
                    arguments: serde_json::from_str(&call.function.arguments)
                        .unwrap_or_else(|_| json!({})),
                })
                .collect();
            Ok(ModelTurn::ToolRequests {
                content: reply.content,
                requests,
            })
        }
        _ => match reply.content {
            Some(text) => Ok(ModelTurn::Answer(text)),
            None => Err(LlmError::EmptyResponse),
        },
    }
}
