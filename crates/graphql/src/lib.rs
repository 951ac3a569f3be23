//! GraphQL API for Agora.
//!
//! Serves paginated forum threads through a single `threads` connection
//! field, backed by the keyset [`Paginator`](agora_core::services::Paginator).
//!
//! ```ignore
//! use agora_graphql::{ServerConfig, serve_with_shutdown};
//!
//! serve_with_shutdown(paginator, ServerConfig::default(), shutdown_signal()).await?;
//! ```

mod schema;
mod server;
mod types;

pub use schema::{
    MAX_QUERY_COMPLEXITY, MAX_QUERY_DEPTH, PageInfo, Thread, ThreadConnection, ThreadEdge,
    ThreadQuery, ThreadSort, build_schema,
};
pub use server::{ServerConfig, serve_with_shutdown};
pub use types::AgoraSchema;
