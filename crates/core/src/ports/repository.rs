//! Port traits for thread data sources.
//!
//! These traits define the storage interface used by the pagination engine.
//! Implementations live in the infrastructure layer (e.g., `agora-storage`).

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::models::{CategoryId, Thread, ThreadId, UserId};
use crate::pagination::FetchQuery;

// =============================================================================
// Filter Types
// =============================================================================

/// Filter options for thread queries.
///
/// Every populated field narrows the result; all predicates are combined
/// with the cursor comparison using AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadFilter {
    pub category_id: Option<CategoryId>,
    pub author_id: Option<UserId>,
    pub is_pinned: Option<bool>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
}

impl ThreadFilter {
    /// Whether a thread satisfies every populated predicate.
    pub fn matches(&self, thread: &Thread) -> bool {
        if self.category_id.is_some_and(|c| c != thread.category_id) {
            return false;
        }
        if self.author_id.is_some_and(|a| a != thread.author_id) {
            return false;
        }
        if self.is_pinned.is_some_and(|p| p != thread.is_pinned) {
            return false;
        }
        match &self.search {
            Some(needle) => thread
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

// =============================================================================
// Source Trait
// =============================================================================

/// Read access to stored threads.
///
/// `fetch_threads` must return the rows matching `query`, ordered exactly
/// as `query` requests and truncated to `query.limit`, without side effects.
#[async_trait]
pub trait ThreadSource: Send + Sync {
    /// Fetch one ordered, filtered, limited slice of threads.
    async fn fetch_threads(&self, query: &FetchQuery) -> StorageResult<Vec<Thread>>;

    /// Get a thread by ID.
    async fn get_thread(&self, id: ThreadId) -> StorageResult<Option<Thread>>;

    /// Check the source can currently serve threads.
    async fn ping(&self) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn thread(title: &str, pinned: bool) -> Thread {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Thread {
            id: ThreadId(1),
            title: title.into(),
            category_id: CategoryId(3),
            author_id: UserId(8),
            is_pinned: pinned,
            view_count: 0,
            reply_count: 0,
            created_at: at,
            last_activity_at: at,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ThreadFilter::default().matches(&thread("anything", false)));
    }

    #[test]
    fn filter_predicates_are_combined_with_and() {
        let filter = ThreadFilter {
            category_id: Some(CategoryId(3)),
            is_pinned: Some(true),
            ..Default::default()
        };
        assert!(filter.matches(&thread("a", true)));
        assert!(!filter.matches(&thread("a", false)));

        let other_category = ThreadFilter {
            category_id: Some(CategoryId(4)),
            ..Default::default()
        };
        assert!(!other_category.matches(&thread("a", true)));
    }

    #[test]
    fn search_is_case_insensitive() {
        let filter = ThreadFilter {
            search: Some("RUST".into()),
            ..Default::default()
        };
        assert!(filter.matches(&thread("Learning rust in anger", false)));
        assert!(!filter.matches(&thread("Learning go", false)));
    }
}
