//! API request and response types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agent::AgentResponse;
use crate::config::{DatabaseCatalog, DatabaseInfo};

/// Request to answer a natural-language question.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub question: String,

    /// Optional database key the agent should use for all operations
    pub db_key: Option<String>,
}

/// Response for one query cycle.
///
/// `sql_query` is `null` when no query was executed, including when the
/// cycle failed and `result` carries an inline error message.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// The answer text (or a short error description)
    pub result: String,

    /// SQL text of the last executed query
    pub sql_query: Option<String>,
}

impl From<AgentResponse> for QueryResponse {
    fn from(response: AgentResponse) -> Self {
        Self {
            result: response.result,
            sql_query: response.sql_query,
        }
    }
}

/// One database the front-end can offer in its selector.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSummary {
    /// Catalog key, e.g. `project_db`
    pub key: String,

    /// Environment variable the tool server resolves for this key
    pub env_key: String,

    /// Display name
    pub name: String,

    /// What the database contains
    pub description: String,

    /// Keywords for suggesting a database from the question
    pub keywords: Vec<String>,

    /// Table name -> short description
    pub tables: BTreeMap<String, String>,
}

impl DatabaseSummary {
    pub fn from_catalog_entry(key: &str, info: &DatabaseInfo) -> Self {
        Self {
            key: key.to_string(),
            env_key: DatabaseCatalog::env_key(key),
            name: info.name.clone(),
            description: info.description.clone(),
            keywords: info.keywords.clone(),
            tables: info.tables.clone(),
        }
    }
}

/// Response listing the configured databases.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseListResponse {
    pub databases: Vec<DatabaseSummary>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
