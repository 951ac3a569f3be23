//! Interpretation of raw `after`/`before`/`first`/`last` parameters.

use crate::error::{PaginationError, PaginationResult, ValidationError};
use crate::ports::Pagination;

use super::cursor::{SeekKey, decode_cursor};
use super::sort::SortBy;

/// Default page size for pagination.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Maximum page size for pagination.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size limits applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Page size used when neither `first` nor `last` is given.
    pub default_limit: u32,
    /// Requested page sizes above this are clamped down to it.
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_SIZE,
            max_limit: MAX_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    /// Check the limits are usable.
    pub fn validate(&self) -> PaginationResult<()> {
        if self.max_limit == 0 || self.max_limit > i32::MAX as u32 {
            return Err(PaginationError::ConfigError(format!(
                "max_limit must be between 1 and {}, got {}",
                i32::MAX,
                self.max_limit
            )));
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(PaginationError::ConfigError(format!(
                "default_limit must be between 1 and max_limit ({}), got {}",
                self.max_limit, self.default_limit
            )));
        }
        Ok(())
    }
}

/// Traversal direction of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    /// `first`/`after`: walk the sort in display order.
    Forward,
    /// `last`/`before`: walk the sort against display order.
    Backward,
}

impl PageDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            PageDirection::Forward => "forward",
            PageDirection::Backward => "backward",
        }
    }
}

/// Validated pagination window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub direction: PageDirection,
    /// Number of edges to return, in `1..=max_limit`.
    pub limit: u32,
    /// Decoded position to resume from, if a usable cursor was supplied.
    pub cursor: Option<SeekKey>,
    /// A cursor was supplied but could not be decoded for this sort.
    pub cursor_rejected: bool,
}

/// Resolve raw parameters into a [`PageWindow`].
///
/// Conflicting or out-of-range parameters are rejected. An undecodable
/// cursor is not an error: the window simply starts at the beginning
/// (or end, for backward pagination) of the collection.
pub fn resolve_window(
    pagination: &Pagination,
    sort: SortBy,
    config: &PaginationConfig,
) -> Result<PageWindow, ValidationError> {
    if pagination.after.is_some() && pagination.before.is_some() {
        return Err(ValidationError::ConflictingCursors);
    }
    if pagination.first.is_some() && pagination.last.is_some() {
        return Err(ValidationError::ConflictingLimits);
    }

    let requested = match (pagination.first, pagination.last) {
        (Some(first), _) => Some(("first", first)),
        (_, Some(last)) => Some(("last", last)),
        _ => None,
    };

    let limit = match requested {
        Some((field, value)) if value < 1 => {
            return Err(ValidationError::LimitOutOfRange { field, value });
        }
        Some((_, value)) => (value as u32).min(config.max_limit),
        None => config.default_limit.min(config.max_limit),
    }
    .max(1);

    let direction = if pagination.before.is_some() || pagination.last.is_some() {
        PageDirection::Backward
    } else {
        PageDirection::Forward
    };

    let raw = match direction {
        PageDirection::Forward => pagination.after.as_ref(),
        PageDirection::Backward => pagination.before.as_ref(),
    };

    let cursor = raw.and_then(|c| decode_cursor(c.as_str())?.typed(sort.column()));

    Ok(PageWindow {
        direction,
        limit,
        cursor_rejected: raw.is_some() && cursor.is_none(),
        cursor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{SortKeyValue, encode_cursor};
    use crate::ports::Cursor;

    fn resolve(pagination: Pagination) -> Result<PageWindow, ValidationError> {
        resolve_window(&pagination, SortBy::Popular, &PaginationConfig::default())
    }

    fn popular_cursor(id: i64, views: i64) -> Cursor {
        encode_cursor(id, &SortKeyValue::Count(views))
    }

    #[test]
    fn defaults_to_forward_first_page() {
        let window = resolve(Pagination::default()).unwrap();
        assert_eq!(window.direction, PageDirection::Forward);
        assert_eq!(window.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(window.cursor, None);
        assert!(!window.cursor_rejected);
    }

    #[test]
    fn conflicting_parameters_are_rejected() {
        let both_cursors = Pagination {
            after: Some(popular_cursor(1, 1)),
            before: Some(popular_cursor(2, 2)),
            ..Default::default()
        };
        assert_eq!(resolve(both_cursors), Err(ValidationError::ConflictingCursors));

        let both_limits = Pagination {
            first: Some(1),
            last: Some(1),
            ..Default::default()
        };
        assert_eq!(resolve(both_limits), Err(ValidationError::ConflictingLimits));
    }

    // Test critique: zéro/négatif rejetés, trop grand clampé silencieusement
    #[test]
    fn limit_boundaries() {
        assert_eq!(
            resolve(Pagination::forward(0, None)),
            Err(ValidationError::LimitOutOfRange {
                field: "first",
                value: 0
            })
        );
        assert!(resolve(Pagination::backward(-4, None)).is_err());
        assert_eq!(resolve(Pagination::forward(10_000, None)).unwrap().limit, MAX_PAGE_SIZE);
        assert_eq!(resolve(Pagination::forward(1, None)).unwrap().limit, 1);
    }

    #[test]
    fn before_or_last_selects_backward() {
        let window = resolve(Pagination::backward(5, None)).unwrap();
        assert_eq!(window.direction, PageDirection::Backward);
        assert_eq!(window.limit, 5);

        let window = resolve(Pagination {
            before: Some(popular_cursor(9, 40)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(window.direction, PageDirection::Backward);
        assert_eq!(window.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(window.cursor.map(|c| c.id), Some(9));
    }

    #[test]
    fn after_is_ignored_when_paging_backward() {
        // `last` with `after` resolves backward; only `before` applies then.
        let window = resolve(Pagination {
            last: Some(3),
            after: Some(popular_cursor(1, 1)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(window.direction, PageDirection::Backward);
        assert_eq!(window.cursor, None);
        assert!(!window.cursor_rejected);
    }

    #[test]
    fn malformed_cursor_degrades_to_no_cursor() {
        let window = resolve(Pagination::forward(2, Some(Cursor::new("not-base64!!")))).unwrap();
        assert_eq!(window.cursor, None);
        assert!(window.cursor_rejected);
    }

    #[test]
    fn cursor_for_another_sort_is_rejected() {
        let newest = encode_cursor(
            4,
            &SortKeyValue::Timestamp(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
        );
        let window = resolve(Pagination::forward(2, Some(newest))).unwrap();
        assert!(window.cursor_rejected);
    }

    #[test]
    fn config_validation() {
        assert!(PaginationConfig::default().validate().is_ok());
        let bad = PaginationConfig {
            default_limit: 50,
            max_limit: 10,
        };
        assert!(bad.validate().is_err());
        let zero = PaginationConfig {
            default_limit: 0,
            max_limit: 10,
        };
        assert!(zero.validate().is_err());
    }
}
