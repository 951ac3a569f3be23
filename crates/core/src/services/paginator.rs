//! Paginator service - runs the keyset pagination pipeline.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::error::PaginationResult;
use crate::metrics::{
    FetchTimer, record_malformed_cursor, record_page_served, record_pagination_rejected,
};
use crate::models::Thread;
use crate::pagination::{
    PaginationConfig, SortBy, assemble_query, build_connection, resolve_window,
};
use crate::ports::{Connection, Pagination, ThreadFilter, ThreadSource};

// =============================================================================
// Request
// =============================================================================

/// One page request, built per call from external input.
#[derive(Debug, Clone, Default)]
pub struct PaginationRequest {
    pub pagination: Pagination,
    pub sort_by: SortBy,
    pub filter: ThreadFilter,
}

impl PaginationRequest {
    pub fn new(pagination: Pagination, sort_by: SortBy) -> Self {
        Self {
            pagination,
            sort_by,
            filter: ThreadFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: ThreadFilter) -> Self {
        self.filter = filter;
        self
    }
}

// =============================================================================
// Paginator
// =============================================================================

/// Keyset paginator over a [`ThreadSource`].
///
/// # Design
///
/// The paginator holds no mutable state. Each call resolves the window,
/// awaits exactly one fetch of `limit + 1` rows and builds the connection,
/// so it can be shared freely between concurrent requests.
///
/// # Flow
///
/// 1. Validate and decode the pagination parameters
/// 2. Assemble the fetch query (ordering, seek predicate, filters, limit)
/// 3. Fetch rows from the source
/// 4. Build edges and page info
pub struct Paginator<S: ThreadSource + ?Sized = dyn ThreadSource> {
    config: PaginationConfig,
    source: Arc<S>,
}

impl<S: ThreadSource + ?Sized> Paginator<S> {
    pub fn new(source: Arc<S>, config: PaginationConfig) -> Self {
        Self { config, source }
    }

    /// The underlying thread source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch one page of threads.
    ///
    /// Invalid parameters are rejected before the source is called. A
    /// cursor that cannot be decoded is ignored and the first page (or last
    /// page, when paging backward) is returned instead. Source errors are
    /// returned unchanged.
    #[instrument(skip_all, fields(sort = %request.sort_by))]
    pub async fn paginate(
        &self,
        request: PaginationRequest,
    ) -> PaginationResult<Connection<Thread>> {
        let PaginationRequest {
            pagination,
            sort_by,
            filter,
        } = request;

        let window = resolve_window(&pagination, sort_by, &self.config).inspect_err(|e| {
            debug!(error = %e, "Rejected pagination parameters");
            record_pagination_rejected(e.reason());
        })?;

        if window.cursor_rejected {
            debug!(
                direction = window.direction.as_str(),
                "Ignoring undecodable cursor, serving edge of collection"
            );
            record_malformed_cursor(sort_by.as_str());
        }

        let query = assemble_query(&window, sort_by, filter);
        trace!(?query, "Fetching page");

        let rows = {
            let _timer = FetchTimer::new();
            self.source.fetch_threads(&query).await?
        };

        let connection = build_connection(rows, &window, sort_by);
        record_page_served(sort_by.as_str(), window.direction.as_str());
        trace!(
            edges = connection.edges.len(),
            has_next = connection.page_info.has_next_page,
            has_previous = connection.page_info.has_previous_page,
            "Page built"
        );

        Ok(connection)
    }
}
