//! Agent module - the natural-language-to-SQL loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Seed the transcript with instructions and the user's question
//! 2. Call the LLM with the discovered database tools
//! 3. If the LLM requests tool calls, execute them in order and feed
//!    each result back
//! 4. Repeat until the LLM answers in text or the turn ceiling is hit
//!
//! The finished transcript then yields the answer and the last executed
//! SQL statement.

mod agent_loop;
mod model;
mod prompt;
mod transcript;

pub use agent_loop::{AgentError, AgentPlan, SqlAgent};
pub use prompt::build_system_prompt;
pub use transcript::{
    extract_response, AgentResponse, Message, ToolCallRequest, ToolContent, Transcript,
    SQL_QUERY_TOOL,
};
