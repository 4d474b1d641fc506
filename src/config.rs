//! Configuration management for Kueri.
//!
//! Configuration can be set via environment variables:
//! - `OPENROUTER_API_KEY` - Required. API key for the chat-completions endpoint.
//! - `DEFAULT_MODEL` - Optional. The default LLM model to use. Defaults to `openai/gpt-4o`.
//! - `MCP_SERVER_URL` - Optional. Base URL of the MCP tool server. Defaults to `http://localhost:8001`.
//! - `DB_CONFIG_PATH` - Optional. Path to the database catalog file. Defaults to `db_config.json`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_TURNS` - Optional. Maximum agent loop turns per query. Defaults to `50`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to read database catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse database catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the chat-completions endpoint
    pub api_key: String,

    /// Default LLM model identifier (OpenRouter format)
    pub default_model: String,

    /// Base URL of the MCP tool server
    pub mcp_server_url: String,

    /// Path to the database catalog file
    pub db_config_path: PathBuf,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum turns for the agent loop
    pub max_turns: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let default_model =
            std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| "openai/gpt-4o".to_string());

        let mcp_server_url = std::env::var("MCP_SERVER_URL")
            .unwrap_or_else(|_| "http://localhost:8001".to_string());

        let db_config_path = std::env::var("DB_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("db_config.json"));

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_turns = std::env::var("MAX_TURNS")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_TURNS".to_string(), format!("{}", e)))?;

        Ok(Self {
            api_key,
            default_model,
            mcp_server_url,
            db_config_path,
            host,
            port,
            max_turns,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, default_model: String, mcp_server_url: String) -> Self {
        Self {
            api_key,
            default_model,
            mcp_server_url,
            db_config_path: PathBuf::from("db_config.json"),
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_turns: 50,
        }
    }
}

/// Catalog of named databases the agent can be pointed at.
///
/// The catalog only describes databases for the front-end selector; actual
/// connection resolution happens inside the MCP tool server, which looks the
/// key up in its own environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseCatalog {
    pub databases: BTreeMap<String, DatabaseInfo>,
}

/// Descriptor for a single database entry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseInfo {
    /// Human-readable display name
    pub name: String,

    /// What the database contains, for the selector UI
    pub description: String,

    /// Keywords used by front-ends to suggest a database for a question
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Table name -> short description
    #[serde(default)]
    pub tables: BTreeMap<String, String>,
}

impl DatabaseCatalog {
    /// Load the catalog from a JSON file.
    ///
    /// A missing file yields an empty catalog; the agent still works, the
    /// front-end just has nothing to list.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Environment-variable key the MCP server resolves for a catalog entry,
    /// e.g. `project_db` -> `PROJECT_DB_URL`.
    pub fn env_key(db_key: &str) -> String {
        let upper = db_key.to_uppercase();
        if upper.ends_with("_DB") {
            format!("{}_URL", upper)
        } else {
            format!("{}_DB_URL", upper)
        }
    }
}
