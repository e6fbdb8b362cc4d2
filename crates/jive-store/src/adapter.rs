//! The [`StoreAdapter`] trait: the uniform async API every repository talks to.

use async_trait::async_trait;
use jive_core::Namespace;

use crate::error::StoreResult;
use crate::types::{Filter, OrderBy, Page, Row, Table};

/// Uniform async interface over the embedded vector store.
///
/// Implementations are namespace-scoped at the row level: every row carries a `namespace`
/// column and every method filters on it. Concurrent writers to the same primary key resolve
/// last-writer-wins by `updated_at`, falling back to [`Row::stable_hash`] on exact ties.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Ensure the namespace's tables exist. Idempotent; safe to call on every request.
    async fn open(&self, namespace: &Namespace) -> StoreResult<()>;

    /// Insert or merge rows by primary key.
    async fn upsert(&self, namespace: &Namespace, table: Table, rows: Vec<Row>) -> StoreResult<()>;

    /// Delete rows matching `filter`. Returns the number of rows removed.
    async fn delete(&self, namespace: &Namespace, table: Table, filter: Filter) -> StoreResult<u64>;

    /// Scan rows matching `filter`, sorted and paginated.
    async fn scan(
        &self,
        namespace: &Namespace,
        table: Table,
        filter: Filter,
        page: Page,
        order_by: Option<OrderBy>,
    ) -> StoreResult<Vec<Row>>;

    /// Return the `k` nearest rows to `query` by embedding distance (smaller is closer),
    /// among rows also matching `filter`.
    async fn vector_search(
        &self,
        namespace: &Namespace,
        table: Table,
        query: &[f32],
        filter: Filter,
        k: usize,
    ) -> StoreResult<Vec<(Row, f32)>>;

    /// Count rows matching `filter`.
    async fn count(&self, namespace: &Namespace, table: Table, filter: Filter) -> StoreResult<u64>;

    /// Fetch a single row by primary key, if present.
    async fn get(&self, namespace: &Namespace, table: Table, id: &str) -> StoreResult<Option<Row>>;
}
