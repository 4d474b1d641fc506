//! Core agent loop implementation.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::config::Config;
use crate::llm::{LlmClient, LlmError, OpenRouterClient, ToolSchema};
use crate::mcp::{HttpToolProvider, ProviderError, ToolProvider};
use crate::tools::{ToolRegistry, ToolResult};

use super::model::{ModelAdapter, ModelTurn};
use super::prompt::build_system_prompt;
use super::transcript::{
    extract_response, AgentResponse, Message, ToolCallRequest, ToolContent, Transcript,
};

/// Fatal conditions for one query cycle.
///
/// Tool failures are not here: they are transcript content the model
/// reacts to, never faults.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Tool discovery failed: {0}")]
    Discovery(#[from] ProviderError),

    #[error("Model invocation failed: {0}")]
    Model(#[from] LlmError),

    #[error("No final answer after {max_turns} turns")]
    TurnLimitExceeded { max_turns: usize },
}

/// Immutable per-session state built once by [`SqlAgent::initialize`] and
/// shared read-only across concurrent query cycles.
pub struct AgentPlan {
    tools: ToolRegistry,
    schemas: Vec<ToolSchema>,
    system_prompt: String,
}

/// The natural-language-to-SQL agent.
///
/// Holds the session-scoped pieces: the model adapter, the tool provider,
/// and the lazily built [`AgentPlan`]. Each `query()` call runs its own
/// cycle over a private transcript, so one agent instance can serve
/// concurrent callers.
pub struct SqlAgent {
    config: Config,
    adapter: ModelAdapter,
    provider: Arc<dyn ToolProvider>,
    plan: OnceCell<AgentPlan>,
}

impl SqlAgent {
    /// Create an agent wired to OpenRouter and the configured MCP server.
    pub fn new(config: Config) -> Self {
        let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterClient::new(config.api_key.clone()));
        let provider: Arc<dyn ToolProvider> =
            Arc::new(HttpToolProvider::new(config.mcp_server_url.clone()));
        Self::with_clients(config, llm, provider)
    }

    /// Create an agent with explicit clients (used by tests to stub the
    /// model and the tool server).
    pub fn with_clients(
        config: Config,
        llm: Arc<dyn LlmClient>,
        provider: Arc<dyn ToolProvider>,
    ) -> Self {
        let adapter = ModelAdapter::new(llm, config.default_model.clone());
        Self {
            config,
            adapter,
            provider,
            plan: OnceCell::new(),
        }
    }

    /// Discover tools and build the session plan.
    ///
    /// Safe to call repeatedly and from concurrent tasks; discovery runs
    /// exactly once and later callers share the same plan.
    pub async fn initialize(&self) -> Result<&AgentPlan, AgentError> {
        self.plan
            .get_or_try_init(|| async {
                tracing::info!("Discovering tools from MCP server");
                let descriptors = self.provider.list_tools().await?;
                let tools =
                    ToolRegistry::from_descriptors(descriptors, Arc::clone(&self.provider));
                let schemas = tools.get_tool_schemas();
                let system_prompt = build_system_prompt(&tools);
                tracing::info!(tools = tools.len(), "SQL agent initialized");
                Ok(AgentPlan {
                    tools,
                    schemas,
                    system_prompt,
                })
            })
            .await
    }

    /// Answer a natural-language question, optionally pinned to a
    /// database key.
    pub async fn query(
        &self,
        question: &str,
        db_key: Option<&str>,
    ) -> Result<AgentResponse, AgentError> {
        let plan = self.initialize().await?;
        let transcript = self.run_cycle(plan, question, db_key).await?;
        Ok(extract_response(&transcript))
    }

    /// Run one full model/tools cycle and return the finished transcript.
    async fn run_cycle(
        &self,
        plan: &AgentPlan,
        question: &str,
        db_key: Option<&str>,
    ) -> Result<Transcript, AgentError> {
        let cycle_id = Uuid::new_v4();
        tracing::info!(%cycle_id, question, "starting query cycle");

        let mut transcript = Transcript::seed(&plan.system_prompt, question, db_key);

        for turn in 0..self.config.max_turns {
            tracing::debug!(%cycle_id, turn = turn + 1, "model turn");

            match self.adapter.ask(&transcript, &plan.schemas).await? {
                ModelTurn::Answer(text) => {
                    transcript.push(Message::Assistant {
                        content: Some(text),
                        tool_calls: Vec::new(),
                    });
                    return Ok(transcript);
                }
                ModelTurn::ToolRequests { content, requests } => {
                    transcript.push(Message::Assistant {
                        content,
                        tool_calls: requests.clone(),
                    });

                    // Dispatch strictly in request order; the model relies
                    // on results lining up with its calls.
                    for request in requests {
                        let ToolCallRequest {
                            id,
                            name,
                            arguments,
                        } = request;

                        tracing::debug!(%cycle_id, tool = %name, "executing tool call");
                        let result = plan.tools.execute(&name, arguments).await;

                        let content = match result {
                            ToolResult::Success(value) => ToolContent::Structured(value),
                            ToolResult::Failure(message) => {
                                tracing::warn!(%cycle_id, tool = %name, error = %message, "tool call failed");
                                ToolContent::Text(format!("Error: {}", message))
                            }
                        };

                        transcript.push(Message::ToolResult {
                            tool_call_id: id,
                            content,
                        });
                    }
                }
            }
        }

        tracing::warn!(%cycle_id, max_turns = self.config.max_turns, "turn ceiling reached");
        Err(AgentError::TurnLimitExceeded {
            max_turns: self.config.max_turns,
        })
    }
}
