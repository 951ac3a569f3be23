//! Sort strategies and sort-key values.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::models::Thread;
use crate::ports::OrderDirection;

/// Canonical timestamp layout in cursors.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";
/// Parse side of [`TIMESTAMP_FORMAT`]; the fraction may be shorter or absent.
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Named sort strategy requested by the caller.
///
/// Each strategy maps to exactly one indexed column, so adding a strategy
/// forces every `match` below to be revisited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortBy {
    /// Most recently created first.
    #[default]
    Newest,
    /// Most viewed first.
    Popular,
    /// Most recent activity first.
    MostActive,
}

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::Newest, SortBy::Popular, SortBy::MostActive];

    /// Column descriptor backing this strategy.
    pub const fn column(self) -> SortColumn {
        match self {
            SortBy::Newest => SortColumn {
                name: "created_at",
                kind: SortKeyKind::Timestamp,
                direction: OrderDirection::Desc,
            },
            SortBy::Popular => SortColumn {
                name: "view_count",
                kind: SortKeyKind::Count,
                direction: OrderDirection::Desc,
            },
            SortBy::MostActive => SortColumn {
                name: "last_activity_at",
                kind: SortKeyKind::Timestamp,
                direction: OrderDirection::Desc,
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Popular => "popular",
            SortBy::MostActive => "most_active",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indexed column a sort strategy orders by.
///
/// `name` is a hard-coded identifier and is safe to interpolate into SQL.
/// The record id is always the secondary key, in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortColumn {
    pub name: &'static str,
    pub kind: SortKeyKind,
    /// Display order of the column (the order of forward pagination).
    pub direction: OrderDirection,
}

/// Value type stored in a sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKeyKind {
    Timestamp,
    Count,
}

impl SortKeyKind {
    /// Parse the canonical form produced by [`SortKeyValue::to_canonical`].
    pub fn parse(self, s: &str) -> Option<SortKeyValue> {
        match self {
            SortKeyKind::Timestamp => NaiveDateTime::parse_from_str(s, TIMESTAMP_PARSE_FORMAT)
                .ok()
                .map(|dt| SortKeyValue::Timestamp(dt.and_utc())),
            SortKeyKind::Count => s.parse().ok().map(SortKeyValue::Count),
        }
    }
}

/// Value of a record's sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKeyValue {
    Timestamp(DateTime<Utc>),
    Count(i64),
}

impl SortKeyValue {
    /// Canonical string form embedded in cursors.
    ///
    /// Timestamps are UTC with nanoseconds, so the form is lossless. Years
    /// outside `0000..=9999` carry a sign (`+10000-01-01T...`), which keeps
    /// every representable instant parseable.
    pub fn to_canonical(&self) -> String {
        match self {
            SortKeyValue::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
            SortKeyValue::Count(n) => n.to_string(),
        }
    }

    /// Compare two values of the same kind. Values of different kinds are
    /// never compared by the engine and order by kind.
    pub fn compare(&self, other: &SortKeyValue) -> Ordering {
        match (self, other) {
            (SortKeyValue::Timestamp(a), SortKeyValue::Timestamp(b)) => a.cmp(b),
            (SortKeyValue::Count(a), SortKeyValue::Count(b)) => a.cmp(b),
            (SortKeyValue::Timestamp(_), SortKeyValue::Count(_)) => Ordering::Less,
            (SortKeyValue::Count(_), SortKeyValue::Timestamp(_)) => Ordering::Greater,
        }
    }
}

/// A record the engine can paginate: stable identity plus sort-key values.
pub trait KeysetRecord {
    /// Stable identity, used as the tie-break key.
    fn keyset_id(&self) -> i64;

    /// Value of the column backing `sort`.
    fn sort_key(&self, sort: SortBy) -> SortKeyValue;
}

impl KeysetRecord for Thread {
    fn keyset_id(&self) -> i64 {
        self.id.get()
    }

    fn sort_key(&self, sort: SortBy) -> SortKeyValue {
        match sort {
            SortBy::Newest => SortKeyValue::Timestamp(self.created_at),
            SortBy::Popular => SortKeyValue::Count(self.view_count),
            SortBy::MostActive => SortKeyValue::Timestamp(self.last_activity_at),
        }
    }
}
