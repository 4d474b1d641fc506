//! Client for the MCP tool server.
//!
//! The tool server exposes two JSON endpoints: `GET /v1/tools` for
//! discovery and `POST /v1/tools/call` for invocation. The transport is
//! abstracted behind the [`ToolProvider`] trait so the registry and agent
//! loop can be exercised against an in-process stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Tool server request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tool server returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The server reached the tool but the tool itself reported an error.
    #[error("{0}")]
    Tool(String),
}

/// A tool advertised by the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// JSON schema for the tool's arguments object
    #[serde(rename = "inputSchema", default)]
    pub input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct ToolsListResponse {
    #[serde(default)]
    tools: Vec<ToolDescriptor>,
}

/// Body for `POST /v1/tools/call`.
#[derive(Debug, Serialize)]
struct ToolCallBody<'a> {
    name: &'a str,
    args: &'a Value,
}

/// Response envelope from `POST /v1/tools/call`.
#[derive(Debug, Deserialize)]
struct ToolCallResponse {
    status: String,

    #[serde(default)]
    output: Option<Value>,

    #[serde(default)]
    error: Option<String>,
}

/// A provider of named, schema-described tools.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// List every tool the provider exposes.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ProviderError>;

    /// Invoke a tool by name. A provider-side error status becomes
    /// `ProviderError::Tool`; the caller decides how to surface it.
    async fn call_tool(&self, name: &str, args: &Value) -> Result<Value, ProviderError>;
}

/// HTTP implementation of [`ToolProvider`] against the MCP server.
pub struct HttpToolProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpToolProvider {
    /// Create a provider for the given server base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl ToolProvider for HttpToolProvider {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1/tools", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let list: ToolsListResponse = response.json().await?;
        Ok(list.tools)
    }

    async fn call_tool(&self, name: &str, args: &Value) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/tools/call", self.base_url))
            .json(&ToolCallBody { name, args })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: ToolCallResponse = response.json().await?;
        if result.status == "error" {
            return Err(ProviderError::Tool(
                result.error.unwrap_or_else(|| "Tool call failed".to_string()),
            ));
        }

        Ok(result.output.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_parses_input_schema() {
        let raw = r#"{
            "name": "run_sql_query",
            "description": "Executes a SQL query",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "db_key": {"type": "string"},
                    "query": {"type": "string"}
                },
                "required": ["db_key", "query"]
            }
        }"#;

        let descriptor: ToolDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(descriptor.name, "run_sql_query");
        assert_eq!(descriptor.input_schema["required"][0], "db_key");
    }

    #[test]
    fn descriptor_tolerates_missing_schema() {
        let descriptor: ToolDescriptor =
            serde_json::from_str(r#"{"name": "list_tables"}"#).unwrap();
        assert_eq!(descriptor.name, "list_tables");
        assert!(descriptor.description.is_empty());
        assert!(descriptor.input_schema.is_null());
    }

    #[test]
    fn call_response_success_shape() {
        let raw = r#"{
            "status": "success",
            "name": "list_tables",
            "args": {"db_key": "X"},
            "output": {"tables": [{"schema": "public", "table_name": "orders"}]}
        }"#;

        let parsed: ToolCallResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, "success");
        assert_eq!(
            parsed.output.unwrap()["tables"][0]["table_name"],
            "orders"
        );
    }

    #[test]
    fn call_response_error_shape() {
        let raw = r#"{"status": "error", "error": "connection refused"}"#;
        let parsed: ToolCallResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, "error");
        assert_eq!(parsed.error.as_deref(), Some("connection refused"));
    }
}
