//! Tool registry: the set of database tools the model may call.
//!
//! Tools are not hard-coded; they are compiled at session start from the
//! descriptors the MCP server advertises (see [`remote::RemoteTool`]).
//! The registry dispatches by name and never lets an invocation failure
//! escape as a fault; the model has to see failures to react to them.

mod remote;

pub use remote::{ParamKind, ParamSpec, RemoteTool};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::ToolSchema;
use crate::mcp::{ToolDescriptor, ToolProvider};

/// Outcome of one tool invocation.
///
/// A `Failure` is ordinary data, not an error: it is serialized into the
/// transcript so the model can correct itself on the next turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(Value),
    Failure(String),
}

/// A named, schema-described operation the model may request.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name (the model calls it by this).
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON schema for the tool's arguments object.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> ToolResult;
}

/// Registry of all available tools.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

/// Name + description pair, used when building the system prompt.
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Compile a registry from the descriptors an MCP server advertised.
    pub fn from_descriptors(
        descriptors: Vec<ToolDescriptor>,
        provider: Arc<dyn ToolProvider>,
    ) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(Arc::new(RemoteTool::from_descriptor(
                descriptor,
                Arc::clone(&provider),
            )));
        }
        registry
    }

    /// Add a tool to the registry.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    /// List registered tools (name + description).
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Build the function-calling schemas advertised to the LLM.
    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|t| {
                ToolSchema::function(
                    t.name().to_string(),
                    t.description().to_string(),
                    t.parameters_schema(),
                )
            })
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a tool call by name.
    ///
    /// An unknown name is a `Failure` like any other; the model can read
    /// it and pick a real tool on its next turn.
    pub async fn execute(&self, name: &str, args: Value) -> ToolResult {
        match self.tools.iter().find(|t| t.name() == name) {
            Some(tool) => tool.execute(args).await,
            None => ToolResult::Failure(format!("Unknown tool: {}", name)),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the arguments back"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, args: Value) -> ToolResult {
            ToolResult::Success(args)
        }
    }

    #[tokio::test]
    async fn dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let result = registry.execute("echo", json!({"x": 1})).await;
        assert_eq!(result, ToolResult::Success(json!({"x": 1})));
    }

    #[tokio::test]
    async fn unknown_tool_is_a_failure_not_a_panic() {
        let registry = ToolRegistry::new();
        let result = registry.execute("nope", json!({})).await;
        assert_eq!(
            result,
            ToolResult::Failure("Unknown tool: nope".to_string())
        );
    }

    #[test]
    fn schemas_cover_all_registered_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let schemas = registry.get_tool_schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].function.name, "echo");
    }
}
