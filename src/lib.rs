//! # Kueri
//!
//! Ask a natural-language question about a relational database, get back
//! an answer plus the SQL that produced it.
//!
//! This library provides:
//! - An HTTP API for submitting questions and listing databases
//! - A tool-calling agent loop driving database introspection and query
//!   execution through an MCP tool server
//! - Integration with OpenRouter for LLM access
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a question via the API
//! 2. Seed the transcript with instructions, the question, and an
//!    optional database-key note
//! 3. Call the LLM with the discovered tools, execute any tool calls in
//!    order, feed results back
//! 4. Repeat until the LLM answers in text, then extract the answer and
//!    the last executed SQL statement
//!
//! ## Example
//!
//! ```rust,ignore
//! use kueri::{agent::SqlAgent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = SqlAgent::new(config);
//! let response = agent.query("how many orders", Some("project_db")).await?;
//! println!("{}", response.result);
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod mcp;
pub mod tools;

pub use config::Config;
