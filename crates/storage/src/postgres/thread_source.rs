//! Thread source implementation for PostgreSQL.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use agora_core::error::{StorageError, StorageResult};
use agora_core::models::{CategoryId, Thread, ThreadId, UserId};
use agora_core::pagination::{FetchQuery, SortKeyValue};
use agora_core::ports::ThreadSource;

use super::database::Database;
use super::helpers::{contains_pattern, non_negative};

const THREAD_COLUMNS: &str = "id, title, category_id, author_id, is_pinned, view_count, \
                              reply_count, created_at, last_activity_at";

/// PostgreSQL implementation of ThreadSource.
pub struct PgThreadSource {
    db: Database,
}

impl PgThreadSource {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    fn pool(&self) -> &PgPool {
        self.db.pool()
    }
}

#[async_trait]
impl ThreadSource for PgThreadSource {
    #[instrument(skip_all, fields(sort = %query.sort, limit = query.limit))]
    async fn fetch_threads(&self, query: &FetchQuery) -> StorageResult<Vec<Thread>> {
        let mut builder = build_fetch_query(query);

        let rows: Vec<ThreadRow> = builder
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(|e| StorageError::QueryError(e.to_string()))?;

        rows.into_iter().map(ThreadRow::into_thread).collect()
    }

    async fn get_thread(&self, id: ThreadId) -> StorageResult<Option<Thread>> {
        let row = sqlx::query_as::<_, ThreadRow>(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::QueryError(e.to_string()))?;

        row.map(ThreadRow::into_thread).transpose()
    }

    async fn ping(&self) -> StorageResult<()> {
        self.db.ping().await
    }
}

/// Translate a fetch description into SQL.
///
/// SAFETY: This dynamic SQL is safe from injection because:
/// 1. Column names come from `SortColumn`, a hard-coded descriptor, never user input
/// 2. Operators (<, >, =, ILIKE, AND) and ASC/DESC come from enums
/// 3. All VALUES, including the limit, are bound parameters
fn build_fetch_query(query: &FetchQuery) -> QueryBuilder<'static, Postgres> {
    let column = query.column.name;
    let mut builder = QueryBuilder::new(format!("SELECT {THREAD_COLUMNS} FROM threads"));

    let mut has_condition = false;
    let mut next_condition = |builder: &mut QueryBuilder<'static, Postgres>| {
        builder.push(if has_condition { " AND " } else { " WHERE " });
        has_condition = true;
    };

    // Row-value comparison keeps (sort key, id) a strict total order.
    if let Some(seek) = &query.seek {
        next_condition(&mut builder);
        builder.push(format!("({column}, id) {} (", seek.comparison.as_sql()));
        match seek.key.value {
            SortKeyValue::Timestamp(ts) => builder.push_bind(ts),
            SortKeyValue::Count(n) => builder.push_bind(n),
        };
        builder.push(", ").push_bind(seek.key.id).push(")");
    }

    let filter = &query.filter;
    if let Some(category) = filter.category_id {
        next_condition(&mut builder);
        builder.push("category_id = ").push_bind(category.get());
    }
    if let Some(author) = filter.author_id {
        next_condition(&mut builder);
        builder.push("author_id = ").push_bind(author.get());
    }
    if let Some(pinned) = filter.is_pinned {
        next_condition(&mut builder);
        builder.push("is_pinned = ").push_bind(pinned);
    }
    if let Some(search) = &filter.search {
        next_condition(&mut builder);
        builder.push("title ILIKE ").push_bind(contains_pattern(search));
    }

    let direction = query.order.as_sql();
    builder
        .push(format!(" ORDER BY {column} {direction}, id {direction} LIMIT "))
        .push_bind(i64::from(query.limit));

    builder
}

/// Database row representation for Thread.
#[derive(sqlx::FromRow)]
struct ThreadRow {
    id: i64,
    title: String,
    category_id: i64,
    author_id: i64,
    is_pinned: bool,
    view_count: i64,
    reply_count: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    last_activity_at: chrono::DateTime<chrono::Utc>,
}

impl ThreadRow {
    fn into_thread(self) -> StorageResult<Thread> {
        Ok(Thread {
            id: ThreadId(self.id),
            title: self.title,
            category_id: CategoryId(self.category_id),
            author_id: UserId(self.author_id),
            is_pinned: self.is_pinned,
            view_count: non_negative(self.view_count, "thread.view_count")?,
            reply_count: non_negative(self.reply_count, "thread.reply_count")?,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        })
    }
}
