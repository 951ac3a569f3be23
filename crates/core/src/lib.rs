//! Core domain layer for Agora.
//!
//! This crate contains the domain models, port traits (interfaces), the
//! keyset pagination engine and the paginator service. It follows
//! hexagonal architecture principles - this is the innermost layer with
//! no dependencies on infrastructure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      agora (binary)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │        agora-graphql          │        agora-storage        │
//! │            (API)              │   (PostgreSQL, in-memory)   │
//! ├───────────────────────────────┴─────────────────────────────┤
//! │                     agora-core  ← YOU ARE HERE              │
//! │           (models, ports, pagination, services)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Domain models (Thread and identifiers)
//! - [`ports`] - Interface traits and Relay connection types
//! - [`pagination`] - Cursor codec, window resolution, query assembly, connection building
//! - [`services`] - The [`services::Paginator`]
//! - [`error`] - Domain error types
//! - [`metrics`] - Prometheus metrics definitions
//!
//! # Key Concepts
//!
//! ## Ports
//!
//! [`ports::ThreadSource`] is the only collaborator the engine needs: given a
//! [`pagination::FetchQuery`] it returns sorted, filtered, limited rows.
//!
//! ## Request Lifecycle
//!
//! 1. Resolve `after`/`before`/`first`/`last` into a page window
//! 2. Assemble a fetch query that over-fetches by one row
//! 3. Await the thread source once
//! 4. Build edges, cursors and page info in display order

pub mod error;
pub mod metrics;
pub mod models;
pub mod pagination;
pub mod ports;
pub mod services;
