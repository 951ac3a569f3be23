//! Translation of a page window into a fetch description for a data source.

use std::cmp::Ordering;

use crate::ports::{OrderDirection, ThreadFilter};

use super::cursor::SeekKey;
use super::sort::{SortBy, SortColumn, SortKeyValue};
use super::window::{PageDirection, PageWindow};

/// Strict comparison applied to the `(sort key, id)` row value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessThan,
    GreaterThan,
}

impl Comparison {
    /// Comparison that selects rows strictly after the cursor when walking
    /// in `order`.
    pub fn following(order: OrderDirection) -> Self {
        match order {
            OrderDirection::Asc => Comparison::GreaterThan,
            OrderDirection::Desc => Comparison::LessThan,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::LessThan => "<",
            Comparison::GreaterThan => ">",
        }
    }

    /// Whether `ordering` (row compared to cursor) satisfies the comparison.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::LessThan => ordering == Ordering::Less,
            Comparison::GreaterThan => ordering == Ordering::Greater,
        }
    }
}

/// Keyset predicate: `(column, id) <op> (key.value, key.id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seek {
    pub comparison: Comparison,
    pub key: SeekKey,
}

impl Seek {
    /// Evaluate the predicate against a row position.
    pub fn admits(&self, value: &SortKeyValue, id: i64) -> bool {
        let ordering = value
            .compare(&self.key.value)
            .then_with(|| id.cmp(&self.key.id));
        self.comparison.holds(ordering)
    }
}

/// Everything a data source needs to produce one page of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchQuery {
    pub sort: SortBy,
    pub column: SortColumn,
    /// Fetch order for both the sort column and the id tie-break.
    pub order: OrderDirection,
    pub seek: Option<Seek>,
    pub filter: ThreadFilter,
    /// Maximum rows to return; one more than the page size.
    pub limit: u32,
}

/// Build the fetch description for a resolved window.
///
/// Forward pages walk the column in display order and seek past the
/// cursor; backward pages invert both the order and the comparison.
pub fn assemble_query(window: &PageWindow, sort: SortBy, filter: ThreadFilter) -> FetchQuery {
    let column = sort.column();
    let order = match window.direction {
        PageDirection::Forward => column.direction,
        PageDirection::Backward => column.direction.reversed(),
    };

    FetchQuery {
        sort,
        column,
        order,
        seek: window.cursor.map(|key| Seek {
            comparison: Comparison::following(order),
            key,
        }),
        filter,
        limit: window.limit.saturating_add(1),
    }
}
