//! PostgreSQL storage adapter.
//!
//! This module implements the [`ThreadSource`](agora_core::ports::ThreadSource)
//! port using PostgreSQL as the backing store.
//!
//! # Architecture
//!
//! - [`Database`] - Connection pool, migrations and health ping
//! - [`PgThreadSource`] - Keyset queries over the `threads` table
//!
//! # Usage
//!
//! ```ignore
//! let config = DatabaseConfig::new(&database_url);
//! let db = Database::connect(&config).await?;
//! db.migrate().await?;
//!
//! let source = Arc::new(PgThreadSource::new(&db));
//! ```

mod database;
mod helpers;
mod thread_source;

pub use database::{Database, DatabaseConfig};
pub use thread_source::PgThreadSource;
