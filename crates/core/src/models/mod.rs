//! Domain models for paginated forum data.
//!
//! These models are storage-agnostic and represent the canonical
//! form of a thread within the domain layer.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// =============================================================================
// Identifier Types
// =============================================================================

/// Macro to generate integer identifier newtypes with common functionality.
///
/// Generates:
/// - `Display` and `FromStr` implementations (base-10)
/// - `From<i64>` implementation
/// - `get()` accessor
macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            /// Get the raw identifier.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

id_newtype!(
    /// Stable identity of a forum thread.
    ThreadId
);

id_newtype!(
    /// Identity of a forum category.
    CategoryId
);

id_newtype!(
    /// Identity of a forum member.
    UserId
);

// =============================================================================
// Threads
// =============================================================================

/// A forum thread, the record type paginated by the engine.
///
/// Deserializes from the JSON seed files accepted by the binary's
/// in-memory mode (ids as plain integers, timestamps as RFC 3339).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thread {
    /// Stable thread identifier.
    pub id: ThreadId,
    /// Thread title.
    pub title: String,
    /// Category the thread was posted in.
    pub category_id: CategoryId,
    /// Member who opened the thread.
    pub author_id: UserId,
    /// Whether moderators pinned the thread.
    pub is_pinned: bool,
    /// Number of times the thread was viewed.
    pub view_count: i64,
    /// Number of replies posted.
    pub reply_count: i64,
    /// When the thread was created.
    pub created_at: DateTime<Utc>,
    /// When the last reply (or the thread itself) was posted.
    pub last_activity_at: DateTime<Utc>,
}

// =============================================================================
// Tests
// =============================================================================
