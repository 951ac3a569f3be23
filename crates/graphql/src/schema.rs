//! GraphQL schema definition.
//!
//! Exposes the thread listing as a Relay-style connection. Pagination
//! arguments are handed to the core paginator untouched so that limit
//! validation, clamping and cursor decoding live in one place.

use std::sync::Arc;

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Result, Schema,
};
use chrono::{DateTime, Utc};
use tracing::error;

use agora_core::error::PaginationError;
use agora_core::models::{CategoryId, ThreadId, UserId};
use agora_core::pagination::SortBy;
use agora_core::ports::{Cursor, Pagination, ThreadFilter};
use agora_core::services::{PaginationRequest, Paginator};

use crate::types::AgoraSchema;

// -----------------------------------------------------------------------------
// Schema Configuration
// -----------------------------------------------------------------------------

/// Maximum query depth to prevent deeply nested queries (DoS protection).
/// Note: GraphQL introspection requires depth ~13, so we use 15 to allow it.
pub const MAX_QUERY_DEPTH: usize = 15;

/// Maximum query complexity score (DoS protection).
/// Each field has a default complexity of 1, nested objects multiply.
pub const MAX_QUERY_COMPLEXITY: usize = 500;

/// Build the thread schema around a shared paginator.
///
/// Includes query depth and complexity limits for DoS protection.
pub fn build_schema(paginator: Arc<Paginator>) -> AgoraSchema {
    Schema::build(ThreadQuery, EmptyMutation, EmptySubscription)
        .data(paginator)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}

// -----------------------------------------------------------------------------
// Query Root
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct ThreadQuery;

#[Object]
impl ThreadQuery {
    /// List threads one page at a time.
    ///
    /// Use `first`/`after` to page forward and `last`/`before` to page
    /// backward. Cursors are opaque; an unreadable cursor returns the
    /// first page (or last page when paging backward).
    #[allow(clippy::too_many_arguments)]
    async fn threads<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
        #[graphql(default)] sort_by: ThreadSort,
        category_id: Option<i64>,
        author_id: Option<i64>,
        is_pinned: Option<bool>,
        search: Option<String>,
    ) -> Result<ThreadConnection> {
        validate_filter_string(&search, "search")?;

        let paginator = ctx.data::<Arc<Paginator>>()?;

        let pagination = Pagination {
            first,
            after: after.map(Cursor::from),
            last,
            before: before.map(Cursor::from),
        };
        let filter = ThreadFilter {
            category_id: category_id.map(CategoryId),
            author_id: author_id.map(UserId),
            is_pinned,
            search,
        };
        let request = PaginationRequest::new(pagination, sort_by.into()).with_filter(filter);

        let connection = paginator
            .paginate(request)
            .await
            .map_err(to_graphql_error)?;

        Ok(ThreadConnection::from(connection))
    }

    /// Get a thread by id.
    async fn thread<'ctx>(&self, ctx: &Context<'ctx>, id: i64) -> Result<Option<Thread>> {
        let paginator = ctx.data::<Arc<Paginator>>()?;

        let thread = paginator
            .source()
            .get_thread(ThreadId(id))
            .await
            .map_err(|e| to_graphql_error(e.into()))?;
        Ok(thread.map(Thread::from))
    }
}

// -----------------------------------------------------------------------------
// GraphQL Types
// -----------------------------------------------------------------------------

/// Ordering applied to a thread listing.
#[derive(async_graphql::Enum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThreadSort {
    /// Most recently created first.
    #[default]
    Newest,
    /// Most viewed first.
    Popular,
    /// Most recent activity first.
    MostActive,
}

impl From<ThreadSort> for SortBy {
    fn from(sort: ThreadSort) -> Self {
        match sort {
            ThreadSort::Newest => SortBy::Newest,
            ThreadSort::Popular => SortBy::Popular,
            ThreadSort::MostActive => SortBy::MostActive,
        }
    }
}

/// Forum thread.
#[derive(async_graphql::SimpleObject)]
pub struct Thread {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    pub author_id: i64,
    pub is_pinned: bool,
    pub view_count: i64,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl From<agora_core::models::Thread> for Thread {
    fn from(t: agora_core::models::Thread) -> Self {
        Self {
            id: t.id.get(),
            title: t.title,
            category_id: t.category_id.get(),
            author_id: t.author_id.get(),
            is_pinned: t.is_pinned,
            view_count: t.view_count,
            reply_count: t.reply_count,
            created_at: t.created_at,
            last_activity_at: t.last_activity_at,
        }
    }
}

// -----------------------------------------------------------------------------
// Connection Types (Relay-style pagination)
// -----------------------------------------------------------------------------

#[derive(async_graphql::SimpleObject)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl From<agora_core::ports::PageInfo> for PageInfo {
    fn from(info: agora_core::ports::PageInfo) -> Self {
        Self {
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
            start_cursor: info.start_cursor.map(|c| c.value),
            end_cursor: info.end_cursor.map(|c| c.value),
        }
    }
}

#[derive(async_graphql::SimpleObject)]
pub struct ThreadEdge {
    pub node: Thread,
    pub cursor: String,
}

#[derive(async_graphql::SimpleObject)]
pub struct ThreadConnection {
    pub edges: Vec<ThreadEdge>,
    pub page_info: PageInfo,
}

impl From<agora_core::ports::Connection<agora_core::models::Thread>> for ThreadConnection {
    fn from(conn: agora_core::ports::Connection<agora_core::models::Thread>) -> Self {
        Self {
            edges: conn
                .edges
                .into_iter()
                .map(|e| ThreadEdge {
                    node: Thread::from(e.node),
                    cursor: e.cursor.value,
                })
                .collect(),
            page_info: PageInfo::from(conn.page_info),
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers & Validation
// -----------------------------------------------------------------------------

/// Maximum length for string filter parameters.
const MAX_FILTER_STRING_LENGTH: usize = 128;

/// Map an engine error to a GraphQL error with a machine-readable code.
fn to_graphql_error(err: PaginationError) -> async_graphql::Error {
    if err.is_client_error() {
        return async_graphql::Error::new(err.to_string())
            .extend_with(|_, e| e.set("code", "BAD_USER_INPUT"));
    }

    error!(error = %err, "Thread listing failed");
    async_graphql::Error::new(err.to_string())
        .extend_with(|_, e| e.set("code", "INTERNAL_SERVER_ERROR"))
}

/// Validate a filter string parameter.
fn validate_filter_string(s: &Option<String>, field_name: &str) -> Result<()> {
    if let Some(value) = s {
        if value.len() > MAX_FILTER_STRING_LENGTH {
            return Err(async_graphql::Error::new(format!(
                "{} too long: maximum {} characters allowed",
                field_name, MAX_FILTER_STRING_LENGTH
            ))
            .extend_with(|_, e| e.set("code", "BAD_USER_INPUT")));
        }
        if value.is_empty() {
            return Err(async_graphql::Error::new(format!(
                "{} cannot be empty",
                field_name
            ))
            .extend_with(|_, e| e.set("code", "BAD_USER_INPUT")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_graphql::{Request, Variables};
    use chrono::TimeZone;
    use serde_json::json;

    use agora_core::pagination::PaginationConfig;
    use agora_core::ports::ThreadSource;
    use agora_storage::MemoryThreadSource;

    use super::*;

    fn core_thread(id: i64) -> agora_core::models::Thread {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + chrono::Duration::hours(id);
        agora_core::models::Thread {
            id: ThreadId(id),
            title: format!("Rust question #{id}"),
            category_id: CategoryId(1 + id % 2),
            author_id: UserId(7),
            is_pinned: id == 1,
            view_count: 10 * id,
            reply_count: id,
            created_at: at,
            last_activity_at: at,
        }
    }

    fn schema(count: i64) -> AgoraSchema {
        let source: Arc<dyn ThreadSource> =
            Arc::new(MemoryThreadSource::from_threads((1..=count).map(core_thread)));
        build_schema(Arc::new(Paginator::new(source, PaginationConfig::default())))
    }

    async fn run(schema: &AgoraSchema, query: &str, vars: serde_json::Value) -> serde_json::Value {
        let response = schema
            .execute(Request::new(query).variables(Variables::from_json(vars)))
            .await;
        serde_json::to_value(&response).unwrap()
    }

    const THREADS: &str = r#"
        query(
            $first: Int, $after: String, $last: Int, $before: String,
            $sort: ThreadSort, $search: String
        ) {
            threads(
                first: $first, after: $after, last: $last, before: $before,
                sortBy: $sort, search: $search
            ) {
                edges { cursor node { id title } }
                pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
            }
        }
    "#;

    fn ids(body: &serde_json::Value) -> Vec<i64> {
        body["data"]["threads"]["edges"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["node"]["id"].as_i64().unwrap())
            .collect()
    }

    // Tests de validation critiques - protègent contre les injections/DoS

    #[test]
    fn test_validate_filter_string_boundaries() {
        // Vide = erreur (évite les requêtes inutiles)
        assert!(validate_filter_string(&Some("".into()), "x").is_err());
        // Trop long = erreur (DoS prevention)
        assert!(validate_filter_string(&Some("x".repeat(200)), "x").is_err());
        // None = OK (optionnel)
        assert!(validate_filter_string(&None, "x").is_ok());
    }

    #[test]
    fn test_sort_mapping_is_exhaustive() {
        assert_eq!(SortBy::from(ThreadSort::Newest), SortBy::Newest);
        assert_eq!(SortBy::from(ThreadSort::Popular), SortBy::Popular);
        assert_eq!(SortBy::from(ThreadSort::MostActive), SortBy::MostActive);
        assert_eq!(SortBy::from(ThreadSort::default()), SortBy::default());
    }

    #[tokio::test]
    async fn test_threads_pages_forward_with_cursor() {
        let schema = schema(5);

        let page1 = run(&schema, THREADS, json!({ "first": 2 })).await;
        assert_eq!(ids(&page1), [5, 4]);
        let info = &page1["data"]["threads"]["pageInfo"];
        assert_eq!(info["hasNextPage"], json!(true));
        assert_eq!(info["hasPreviousPage"], json!(false));
        assert_eq!(
            info["endCursor"],
            page1["data"]["threads"]["edges"][1]["cursor"]
        );

        let page2 = run(
            &schema,
            THREADS,
            json!({ "first": 2, "after": info["endCursor"] }),
        )
        .await;
        assert_eq!(ids(&page2), [3, 2]);
        assert_eq!(page2["data"]["threads"]["pageInfo"]["hasPreviousPage"], json!(true));
    }

    #[tokio::test]
    async fn test_threads_sort_and_backward() {
        let schema = schema(4);

        let body = run(&schema, THREADS, json!({ "last": 2, "sort": "POPULAR" })).await;
        assert_eq!(ids(&body), [2, 1]);
        let info = &body["data"]["threads"]["pageInfo"];
        assert_eq!(info["hasPreviousPage"], json!(true));
        assert_eq!(info["hasNextPage"], json!(false));
    }

    // Test critique: les erreurs de validation portent le code BAD_USER_INPUT
    #[tokio::test]
    async fn test_invalid_pagination_is_a_client_error() {
        let schema = schema(3);

        let body = run(&schema, THREADS, json!({ "first": 1, "last": 1 })).await;
        assert_eq!(body["errors"][0]["extensions"]["code"], json!("BAD_USER_INPUT"));

        let body = run(&schema, THREADS, json!({ "first": 0 })).await;
        assert!(body["errors"][0]["message"].as_str().unwrap().contains("first"));
        assert_eq!(body["errors"][0]["extensions"]["code"], json!("BAD_USER_INPUT"));

        let body = run(&schema, THREADS, json!({ "search": "" })).await;
        assert_eq!(body["errors"][0]["extensions"]["code"], json!("BAD_USER_INPUT"));
    }

    #[tokio::test]
    async fn test_malformed_cursor_returns_first_page() {
        let schema = schema(3);
        let body = run(&schema, THREADS, json!({ "first": 2, "after": "not-base64!!" })).await;
        assert!(body.get("errors").is_none());
        assert_eq!(ids(&body), [3, 2]);
    }

    #[tokio::test]
    async fn test_thread_lookup() {
        let schema = schema(3);
        let query = "query($id: Int!) { thread(id: $id) { id isPinned createdAt } }";

        let found = run(&schema, query, json!({ "id": 1 })).await;
        assert_eq!(found["data"]["thread"]["isPinned"], json!(true));
        let created_at = found["data"]["thread"]["createdAt"].as_str().unwrap();
        assert!(created_at.starts_with("2024-05-01T09:00:00"));

        let missing = run(&schema, query, json!({ "id": 99 })).await;
        assert_eq!(missing["data"]["thread"], json!(null));
    }
}
