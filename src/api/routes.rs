//! HTTP routes for the query API.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::agent::SqlAgent;
use crate::config::{Config, DatabaseCatalog};

use super::types::{
    DatabaseListResponse, DatabaseSummary, HealthResponse, QueryRequest, QueryResponse,
};

/// Shared application state.
pub struct AppState {
    pub agent: SqlAgent,
    pub catalog: DatabaseCatalog,
}

/// Load the catalog, bind the listener, and serve until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let catalog = DatabaseCatalog::load(&config.db_config_path)?;
    let addr = format!("{}:{}", config.host, config.port);

    let state = Arc::new(AppState {
        agent: SqlAgent::new(config),
        catalog,
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Build the router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/databases", get(list_databases))
        .route("/v1/query", post(run_query))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// POST /v1/query - answer a natural-language question.
///
/// Fatal cycle errors come back inline as the `result` text with a null
/// `sql_query`; the front-end renders them in the chat like any answer.
async fn run_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    match state
        .agent
        .query(&request.question, request.db_key.as_deref())
        .await
    {
        Ok(response) => Json(response.into()),
        Err(e) => {
            tracing::error!(error = %e, "query cycle failed");
            Json(QueryResponse {
                result: format!("Error: {}", e),
                sql_query: None,
            })
        }
    }
}

/// GET /v1/databases - list the configured databases for the selector.
async fn list_databases(State(state): State<Arc<AppState>>) -> Json<DatabaseListResponse> {
    let databases = state
        .catalog
        .databases
        .iter()
        .map(|(key, info)| DatabaseSummary::from_catalog_entry(key, info))
        .collect();
    Json(DatabaseListResponse { databases })
}

/// GET /health - service liveness.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;

    use crate::llm::{AssistantReply, ChatMessage, LlmClient, LlmError, ToolSchema};
    use crate::mcp::{ProviderError, ToolDescriptor, ToolProvider};

    /// Model stub whose transport always fails.
    struct UnreachableModel;

    #[async_trait]
    impl LlmClient for UnreachableModel {
        async fn chat_completion(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
            _tools: Option<&[ToolSchema]>,
        ) -> Result<AssistantReply, LlmError> {
            Err(LlmError::Api {
                status: 503,
                body: "upstream unavailable".to_string(),
            })
        }
    }

    struct EmptyProvider;

    #[async_trait]
    impl ToolProvider for EmptyProvider {
        async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ProviderError> {
            Ok(Vec::new())
        }

        async fn call_tool(&self, _name: &str, _args: &Value) -> Result<Value, ProviderError> {
            Ok(Value::Null)
        }
    }

    fn failing_state() -> Arc<AppState> {
        let config = Config::new(
            "test-key".to_string(),
            "test-model".to_string(),
            "http://localhost:8001".to_string(),
        );
        Arc::new(AppState {
            agent: SqlAgent::with_clients(
                config,
                Arc::new(UnreachableModel),
                Arc::new(EmptyProvider),
            ),
            catalog: DatabaseCatalog::default(),
        })
    }

    #[tokio::test]
    async fn fatal_errors_render_inline() {
        let state = failing_state();
        let Json(response) = run_query(
            State(state),
            Json(QueryRequest {
                question: "how many orders".to_string(),
                db_key: None,
            }),
        )
        .await;

        assert!(response.result.starts_with("Error:"), "got: {}", response.result);
        assert!(response.sql_query.is_none());
    }

    #[tokio::test]
    async fn empty_catalog_lists_nothing() {
        let state = failing_state();
        let Json(response) = list_databases(State(state)).await;
        assert!(response.databases.is_empty());
    }

    #[tokio::test]
    async fn health_reports_version() {
        let Json(response) = health().await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
