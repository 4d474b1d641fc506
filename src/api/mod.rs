//! HTTP API - the thin shell around the agent.
//!
//! Three endpoints: `POST /v1/query` runs one agent cycle,
//! `GET /v1/databases` feeds the front-end's database selector, and
//! `GET /health` reports liveness.

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
