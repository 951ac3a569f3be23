//! Keyset pagination engine.
//!
//! The engine is a stateless pipeline of four steps:
//!
//! 1. [`resolve_window`] validates `after`/`before`/`first`/`last` and decodes the cursor
//! 2. [`assemble_query`] turns the window and filters into a [`FetchQuery`]
//! 3. a [`crate::ports::ThreadSource`] runs the query
//! 4. [`build_connection`] turns the over-fetched rows into edges and page info
//!
//! [`crate::services::Paginator`] wires the steps together.
//!
//! # Ordering
//!
//! Every sort is a strict total order on `(sort key, id)`. The id is already
//! part of each cursor, so equal sort keys never cause skipped or repeated
//! rows while the store is unchanged.
//!
//! # Consistency
//!
//! Pages are read independently. A row inserted with a sort key past the
//! current position appears on a later page; a row whose sort key moves
//! across the position between two requests can be skipped or returned
//! twice. This is inherent to keyset pagination.

mod connection;
mod cursor;
mod query;
mod sort;
mod window;

pub use connection::build_connection;
pub use cursor::{CursorKey, SeekKey, decode_cursor, encode_cursor, encode_raw};
pub use query::{Comparison, FetchQuery, Seek, assemble_query};
pub use sort::{KeysetRecord, SortBy, SortColumn, SortKeyKind, SortKeyValue};
pub use window::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageDirection, PageWindow, PaginationConfig, resolve_window,
};
