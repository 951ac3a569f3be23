//! Opaque cursor encoding.
//!
//! A cursor is the URL-safe base64 (no padding) of `"<id>:<sort key>"`.
//! Cursors are resumption tokens, not capability tokens: they carry no
//! integrity protection and decoding never fails loudly.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::ports::Cursor;

use super::sort::{SortColumn, SortKeyValue};

/// Separator between the id and the sort key. Ids never contain it; the
/// sort key may (timestamps), so decoding splits on the first occurrence.
const DELIMITER: char = ':';

/// Upper bound on accepted cursor length, well above any cursor we mint.
const MAX_CURSOR_LENGTH: usize = 256;

/// Raw components recovered from a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorKey {
    pub id: String,
    pub sort_key: String,
}

impl CursorKey {
    /// Interpret the components for a given sort column.
    ///
    /// Returns `None` if the id is not an integer or the sort key does not
    /// parse as the column's value type.
    pub fn typed(&self, column: SortColumn) -> Option<SeekKey> {
        let id = self.id.parse().ok()?;
        let value = column.kind.parse(&self.sort_key)?;
        Some(SeekKey { id, value })
    }
}

/// Typed position in a strict `(sort key, id)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekKey {
    pub id: i64,
    pub value: SortKeyValue,
}

/// Encode raw components into an opaque cursor.
pub fn encode_raw(id: &str, sort_key: &str) -> Cursor {
    let plain = format!("{id}{DELIMITER}{sort_key}");
    Cursor::new(URL_SAFE_NO_PAD.encode(plain.as_bytes()))
}

/// Encode a record position into an opaque cursor.
pub fn encode_cursor(id: i64, sort_key: &SortKeyValue) -> Cursor {
    encode_raw(&id.to_string(), &sort_key.to_canonical())
}

/// Decode an opaque cursor.
///
/// Returns `None` when the input is not base64, not UTF-8, has no
/// delimiter, or either component is empty.
pub fn decode_cursor(value: &str) -> Option<CursorKey> {
    if value.is_empty() || value.len() > MAX_CURSOR_LENGTH {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(value.as_bytes()).ok()?;
    let plain = String::from_utf8(bytes).ok()?;
    let (id, sort_key) = plain.split_once(DELIMITER)?;

    if id.is_empty() || sort_key.is_empty() {
        return None;
    }

    Some(CursorKey {
        id: id.to_string(),
        sort_key: sort_key.to_string(),
    })
}
