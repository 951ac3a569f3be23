//! Storage layer for Agora.
//!
//! This crate provides implementations of the [`ThreadSource`] port defined
//! in `agora-core`:
//!
//! - [`postgres::PgThreadSource`] - PostgreSQL, with connection pooling and migrations
//! - [`memory::MemoryThreadSource`] - In-process store for tests and demo mode
//!
//! # Usage
//!
//! ```ignore
//! use agora_storage::{Database, DatabaseConfig, PgThreadSource};
//!
//! // Connect to the database
//! let config = DatabaseConfig::new(&database_url);
//! let db = Database::connect(&config).await?;
//!
//! // Run migrations
//! db.migrate().await?;
//!
//! // Create the source handed to the paginator
//! let source = Arc::new(PgThreadSource::new(&db));
//! ```
//!
//! [`ThreadSource`]: agora_core::ports::ThreadSource

pub mod memory;
pub mod postgres;

pub use memory::MemoryThreadSource;
pub use postgres::{Database, DatabaseConfig, PgThreadSource};
