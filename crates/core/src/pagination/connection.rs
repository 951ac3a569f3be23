//! Assembly of fetched rows into a Relay connection.

use crate::ports::{Connection, Edge, PageInfo};

use super::cursor::encode_cursor;
use super::sort::{KeysetRecord, SortBy};
use super::window::{PageDirection, PageWindow};

/// Turn rows fetched for `window` (in fetch order, up to `limit + 1` of
/// them) into a connection in display order.
///
/// The extra row, if present, only signals that more rows exist in the
/// fetch direction and is dropped before anything else happens. The
/// flag for the opposite direction is inferred from the presence of a
/// cursor: arriving through one implies the page it came from exists.
pub fn build_connection<T: KeysetRecord>(
    mut rows: Vec<T>,
    window: &PageWindow,
    sort: SortBy,
) -> Connection<T> {
    let limit = window.limit as usize;
    let has_more = rows.len() > limit;
    rows.truncate(limit);

    if window.direction == PageDirection::Backward {
        rows.reverse();
    }

    let edges: Vec<Edge<T>> = rows
        .into_iter()
        .map(|node| Edge {
            cursor: encode_cursor(node.keyset_id(), &node.sort_key(sort)),
            node,
        })
        .collect();

    let came_through_cursor = window.cursor.is_some();
    let (has_next_page, has_previous_page) = match window.direction {
        PageDirection::Forward => (has_more, came_through_cursor),
        PageDirection::Backward => (came_through_cursor, has_more),
    };

    let page_info = PageInfo {
        has_next_page,
        has_previous_page,
        start_cursor: edges.first().map(|e| e.cursor.clone()),
        end_cursor: edges.last().map(|e| e.cursor.clone()),
    };

    Connection { edges, page_info }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{SeekKey, SortKeyValue, decode_cursor};

    #[derive(Debug, Clone, PartialEq)]
    struct Row(i64);

    impl KeysetRecord for Row {
        fn keyset_id(&self) -> i64 {
            self.0
        }

        fn sort_key(&self, _: SortBy) -> SortKeyValue {
            SortKeyValue::Count(self.0 * 10)
        }
    }

    fn window(direction: PageDirection, limit: u32, with_cursor: bool) -> PageWindow {
        PageWindow {
            direction,
            limit,
            cursor: with_cursor.then_some(SeekKey {
                id: 0,
                value: SortKeyValue::Count(0),
            }),
            cursor_rejected: false,
        }
    }

    fn ids(conn: &Connection<Row>) -> Vec<i64> {
        conn.nodes().map(|r| r.0).collect()
    }

    #[test]
    fn forward_drops_the_extra_row() {
        let rows = vec![Row(5), Row(4), Row(3)];
        let page = window(PageDirection::Forward, 2, false);
        let conn = build_connection(rows, &page, SortBy::Popular);
        assert_eq!(ids(&conn), [5, 4]);
        assert!(conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
    }

    // Test critique: en arrière, la ligne en trop est retirée AVANT l'inversion
    #[test]
    fn backward_drops_extra_row_before_reversing() {
        // Fetched ascending (against display order): 1, 2, 3.
        let rows = vec![Row(1), Row(2), Row(3)];
        let page = window(PageDirection::Backward, 2, true);
        let conn = build_connection(rows, &page, SortBy::Popular);
        assert_eq!(ids(&conn), [2, 1]);
        assert!(conn.page_info.has_previous_page);
        assert!(conn.page_info.has_next_page);
    }

    #[test]
    fn backward_without_cursor_has_no_next_page() {
        let rows = vec![Row(1), Row(2)];
        let page = window(PageDirection::Backward, 2, false);
        let conn = build_connection(rows, &page, SortBy::Popular);
        assert_eq!(ids(&conn), [2, 1]);
        assert!(!conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
    }

    #[test]
    fn cursors_come_from_first_and_last_edges() {
        let rows = vec![Row(9), Row(8)];
        let page = window(PageDirection::Forward, 5, true);
        let conn = build_connection(rows, &page, SortBy::Popular);
        let start_cursor = conn.page_info.start_cursor.as_ref().unwrap();
        let end_cursor = conn.page_info.end_cursor.as_ref().unwrap();
        let start = decode_cursor(start_cursor.as_str()).unwrap();
        let end = decode_cursor(end_cursor.as_str()).unwrap();
        assert_eq!((start.id.as_str(), start.sort_key.as_str()), ("9", "90"));
        assert_eq!((end.id.as_str(), end.sort_key.as_str()), ("8", "80"));
        assert_eq!(conn.edges[0].cursor, *start_cursor);
    }

    #[test]
    fn empty_result_is_a_valid_terminal_page() {
        let page = window(PageDirection::Forward, 3, false);
        let conn = build_connection(Vec::<Row>::new(), &page, SortBy::Newest);
        assert!(conn.edges.is_empty());
        assert_eq!(conn.page_info, PageInfo::default());
    }
}
