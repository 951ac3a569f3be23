//! In-process thread source.
//!
//! Evaluates a [`FetchQuery`] the way the PostgreSQL adapter does (filter,
//! seek on `(sort key, id)`, order, limit) over threads held in memory.
//! Used by tests and by the binary's demo mode. Writes go through an
//! async lock so concurrent readers see a point-in-time snapshot per fetch.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use agora_core::error::StorageResult;
use agora_core::models::{Thread, ThreadId};
use agora_core::pagination::{FetchQuery, KeysetRecord};
use agora_core::ports::{OrderDirection, ThreadSource};

/// Thread source backed by an in-memory map.
#[derive(Debug, Default)]
pub struct MemoryThreadSource {
    threads: RwLock<BTreeMap<ThreadId, Thread>>,
}

impl MemoryThreadSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source pre-populated with `threads`.
    ///
    /// A later thread with the same id replaces an earlier one.
    pub fn from_threads(threads: impl IntoIterator<Item = Thread>) -> Self {
        Self {
            threads: RwLock::new(threads.into_iter().map(|t| (t.id, t)).collect()),
        }
    }

    /// Insert or replace a thread. Returns the previous version, if any.
    pub async fn upsert(&self, thread: Thread) -> Option<Thread> {
        self.threads.write().await.insert(thread.id, thread)
    }

    /// Remove a thread. Returns it if it existed.
    pub async fn remove(&self, id: ThreadId) -> Option<Thread> {
        self.threads.write().await.remove(&id)
    }

    /// Number of stored threads.
    pub async fn len(&self) -> usize {
        self.threads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.threads.read().await.is_empty()
    }
}

#[async_trait]
impl ThreadSource for MemoryThreadSource {
    async fn fetch_threads(&self, query: &FetchQuery) -> StorageResult<Vec<Thread>> {
        let threads = self.threads.read().await;

        let mut rows: Vec<&Thread> = threads
            .values()
            .filter(|t| query.filter.matches(t))
            .filter(|t| match &query.seek {
                Some(seek) => seek.admits(&t.sort_key(query.sort), t.keyset_id()),
                None => true,
            })
            .collect();

        rows.sort_by(|a, b| {
            let ordering = a
                .sort_key(query.sort)
                .compare(&b.sort_key(query.sort))
                .then_with(|| a.keyset_id().cmp(&b.keyset_id()));
            match query.order {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            }
        });
        rows.truncate(query.limit as usize);

        trace!(matched = rows.len(), total = threads.len(), "In-memory fetch");
        Ok(rows.into_iter().cloned().collect())
    }

    async fn get_thread(&self, id: ThreadId) -> StorageResult<Option<Thread>> {
        Ok(self.threads.read().await.get(&id).cloned())
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}
