//! Conversation transcript and result extraction.
//!
//! The transcript is the append-only message history for one query cycle.
//! It is owned by that cycle alone and discarded once the response has
//! been extracted from it.

use serde_json::Value;

/// Name of the tool whose calls carry executable SQL.
pub const SQL_QUERY_TOOL: &str = "run_sql_query";

/// Argument of [`SQL_QUERY_TOOL`] holding the SQL text.
const SQL_QUERY_ARG: &str = "query";

/// A tool invocation requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    /// Identifier unique within the assistant turn; the matching result
    /// message carries the same id.
    pub id: String,
    pub name: String,
    /// Arguments object as decoded from the model's call.
    pub arguments: Value,
}

/// Payload of a tool result message.
#[derive(Debug, Clone)]
pub enum ToolContent {
    /// Plain text, e.g. an error the model should read.
    Text(String),
    /// Structured output from a successful tool call.
    Structured(Value),
}

impl ToolContent {
    /// Render the content the way it is shown to the model.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// One entry in the transcript.
#[derive(Debug, Clone)]
pub enum Message {
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    },
    ToolResult {
        tool_call_id: String,
        content: ToolContent,
    },
}

/// Append-only message history for one query cycle.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Seed a transcript with the system instructions, the user's
    /// question, and an optional database-key note.
    pub fn seed(system_prompt: &str, question: &str, db_key: Option<&str>) -> Self {
        let mut transcript = Self::default();

        transcript.messages.push(Message::User {
            content: format!("{}\n\nUser question: {}", system_prompt, question),
        });

        if let Some(key) = db_key {
            transcript.messages.push(Message::Assistant {
                content: Some(format!(
                    "Note: Use database key '{}' for all operations.",
                    key
                )),
                tool_calls: Vec::new(),
            });
        }

        transcript
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// The externally visible output of one query cycle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AgentResponse {
    /// The final natural-language answer.
    pub result: String,

    /// SQL text of the last executed query, if any query ran.
    pub sql_query: Option<String>,
}

/// Derive the response from a finished transcript.
///
/// The SQL query is taken from the last `run_sql_query` call anywhere in
/// the history; the answer is the text of the final message. A transcript
/// that ends on something other than an assistant answer still yields its
/// last entry's text rather than failing.
pub fn extract_response(transcript: &Transcript) -> AgentResponse {
    let mut sql_query = None;

    for message in transcript.messages() {
        if let Message::Assistant { tool_calls, .. } = message {
            for call in tool_calls {
                if call.name == SQL_QUERY_TOOL {
                    if let Some(query) = call.arguments[SQL_QUERY_ARG].as_str() {
                        sql_query = Some(query.to_string());
                    }
                }
            }
        }
    }

    let result = match transcript.last() {
        Some(Message::Assistant {
            content: Some(text),
            ..
        }) => text.clone(),
        Some(Message::Assistant {
            content: None,
            tool_calls,
        }) => tool_calls
            .iter()
            .map(|c| format!("{}({})", c.name, c.arguments))
            .collect::<Vec<_>>()
            .join(", "),
        Some(Message::ToolResult { content, .. }) => content.render(),
        Some(Message::User { content }) => content.clone(),
        None => String::new(),
    };

    AgentResponse { result, sql_query }
}
