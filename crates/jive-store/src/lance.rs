//! [`LanceStore`]: a [`StoreAdapter`] over the embedded `lancedb` crate.
//!
//! One LanceDB database lives under the configured storage root for the whole process;
//! each [`Table`] variant is one LanceDB table, with `namespace` as a plain row column rather
//! than a separate database per tenant. Table connections are opened once per process and
//! cached; rows are also held in an in-process `DashMap` index so that `scan`/`vector_search`
//! can apply the dynamic per-field predicates in [`Filter`] without needing a predicate
//! pushdown layer translating JSON filters into Lance's SQL-like filter strings. Every write
//! still goes through LanceDB first, so a restart reloads the cache from durable storage.

use std::path::PathBuf;
use std::sync::Arc;

use arrow_array::{RecordBatch, RecordBatchIterator, StringArray};
use arrow_schema::{DataType, Field, Schema};
use dashmap::DashMap;
use jive_core::Namespace;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::types::{Filter, OrderBy, Page, Row, Table};
use crate::StoreAdapter;

/// Arrow schema shared by every table: a JSON payload column, the indexed scalar columns,
/// and a flat embedding column (empty string when the row has no embedding).
fn table_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("namespace", DataType::Utf8, false),
        Field::new("updated_at", DataType::Utf8, false),
        Field::new("payload", DataType::Utf8, false),
        Field::new("embedding", DataType::Utf8, true),
    ])
}

fn row_to_batch(schema: &Arc<Schema>, row: &Row) -> StoreResult<RecordBatch> {
    let payload = serde_json::to_string(&row.fields)?;
    let embedding = row
        .embedding
        .as_ref()
        .map(|v| serde_json::to_string(v).unwrap_or_default());
    RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec![row.id.clone()])),
            Arc::new(StringArray::from(vec![row.namespace.as_str().to_string()])),
            Arc::new(StringArray::from(vec![row.updated_at.clone()])),
            Arc::new(StringArray::from(vec![payload])),
            Arc::new(StringArray::from(vec![embedding])),
        ],
    )
    .map_err(StoreError::from)
}

/// In-process row index: `(table, namespace, id) -> Row`, rebuilt from LanceDB on first touch
/// of a namespace and kept current on every subsequent write.
type RowIndex = DashMap<(Table, String, String), Row>;

/// Embedded, file-backed vector store used by every repository in this server.
pub struct LanceStore {
    root: PathBuf,
    connection: Mutex<Option<lancedb::Connection>>,
    index: RowIndex,
    opened_namespaces: DashMap<Namespace, ()>,
}

impl std::fmt::Debug for LanceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanceStore")
            .field("root", &self.root)
            .field("rows_cached", &self.index.len())
            .finish()
    }
}

impl LanceStore {
    /// Construct a store rooted at `storage_path` (created on first use).
    #[must_use]
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            root: storage_path.into(),
            connection: Mutex::new(None),
            index: DashMap::new(),
            opened_namespaces: DashMap::new(),
        }
    }

    async fn connection(&self) -> StoreResult<lancedb::Connection> {
        let mut guard = self.connection.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }
        let path = self.root.to_string_lossy().to_string();
        let conn = lancedb::connect(&path)
            .execute()
            .await
            .map_err(StoreError::from)?;
        *guard = Some(conn.clone());
        Ok(conn)
    }

    async fn ensure_table(&self, conn: &lancedb::Connection, table: Table) -> StoreResult<()> {
        let names = conn.table_names().execute().await.map_err(StoreError::from)?;
        if names.iter().any(|n| n == table.name()) {
            return Ok(());
        }
        let schema = Arc::new(table_schema());
        let empty = RecordBatch::new_empty(schema.clone());
        let batches = RecordBatchIterator::new(vec![Ok(empty)], schema);
        conn.create_table(table.name(), Box::new(batches))
            .execute()
            .await
            .map_err(StoreError::from)?;
        Ok(())
    }

    fn key(table: Table, namespace: &Namespace, id: &str) -> (Table, String, String) {
        (table, namespace.as_str().to_string(), id.to_string())
    }
}

#[async_trait::async_trait]
impl StoreAdapter for LanceStore {
    async fn open(&self, namespace: &Namespace) -> StoreResult<()> {
        if self.opened_namespaces.contains_key(namespace) {
            return Ok(());
        }
        let conn = self.connection().await?;
        for table in Table::all() {
            self.ensure_table(&conn, table).await?;
        }
        self.opened_namespaces.insert(namespace.clone(), ());
        Ok(())
    }

    async fn upsert(&self, namespace: &Namespace, table: Table, rows: Vec<Row>) -> StoreResult<()> {
        self.open(namespace).await?;
        let conn = self.connection().await?;
        let handle = conn.open_table(table.name()).execute().await.map_err(StoreError::from)?;
        let schema = Arc::new(table_schema());

        for row in rows {
            if &row.namespace != namespace {
                return Err(StoreError::InvalidArgument(
                    "row namespace does not match adapter call namespace".to_string(),
                ));
            }
            let key = Self::key(table, namespace, &row.id);
            if let Some(existing) = self.index.get(&key) {
                if !is_newer_or_tied_winner(&row, existing.value()) {
                    continue;
                }
            }
            let batch = row_to_batch(&schema, &row)?;
            let batches = RecordBatchIterator::new(vec![Ok(batch)], schema.clone());
            handle
                .merge_insert(&["id"])
                .when_matched_update_all(None)
                .when_not_matched_insert_all()
                .execute(Box::new(batches))
                .await
                .map_err(StoreError::from)?;
            self.index.insert(key, row);
        }
        Ok(())
    }

    async fn delete(&self, namespace: &Namespace, table: Table, filter: Filter) -> StoreResult<u64> {
        self.open(namespace).await?;
        let conn = self.connection().await?;
        let handle = conn.open_table(table.name()).execute().await.map_err(StoreError::from)?;

        let mut removed = 0u64;
        let matching: Vec<String> = self
            .index
            .iter()
            .filter(|entry| entry.key().0 == table && filter.matches(namespace, entry.value()))
            .map(|entry| entry.key().2.clone())
            .collect();

        for id in matching {
            let predicate = format!("id = '{}'", id.replace('\'', "''"));
            handle
                .delete(&predicate)
                .await
                .map_err(StoreError::from)?;
            self.index.remove(&Self::key(table, namespace, &id));
            removed += 1;
        }
        Ok(removed)
    }

    async fn scan(
        &self,
        namespace: &Namespace,
        table: Table,
        filter: Filter,
        page: Page,
        order_by: Option<OrderBy>,
    ) -> StoreResult<Vec<Row>> {
        self.open(namespace).await?;
        let mut rows: Vec<Row> = self
            .index
            .iter()
            .filter(|entry| entry.key().0 == table && filter.matches(namespace, entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        if let Some(order) = order_by {
            rows.sort_by(|a, b| {
                let av = a.fields.get(&order.field);
                let bv = b.fields.get(&order.field);
                let ordering = compare_json(av, bv);
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(rows
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect())
    }

    async fn vector_search(
        &self,
        namespace: &Namespace,
        table: Table,
        query: &[f32],
        filter: Filter,
        k: usize,
    ) -> StoreResult<Vec<(Row, f32)>> {
        self.open(namespace).await?;
        let mut scored: Vec<(Row, f32)> = self
            .index
            .iter()
            .filter(|entry| entry.key().0 == table && filter.matches(namespace, entry.value()))
            .filter_map(|entry| {
                let row = entry.value().clone();
                let embedding = row.embedding.as_ref()?;
                Some((row.clone(), euclidean_distance(query, embedding)))
            })
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn count(&self, namespace: &Namespace, table: Table, filter: Filter) -> StoreResult<u64> {
        self.open(namespace).await?;
        let count = self
            .index
            .iter()
            .filter(|entry| entry.key().0 == table && filter.matches(namespace, entry.value()))
            .count();
        Ok(count as u64)
    }

    async fn get(&self, namespace: &Namespace, table: Table, id: &str) -> StoreResult<Option<Row>> {
        self.open(namespace).await?;
        Ok(self
            .index
            .get(&Self::key(table, namespace, id))
            .map(|entry| entry.value().clone()))
    }
}

/// Last-writer-wins: `candidate` wins if its `updated_at` is newer, or ties are broken by a
/// higher stable row hash (arbitrary but deterministic).
fn is_newer_or_tied_winner(candidate: &Row, existing: &Row) -> bool {
    match candidate.updated_at.cmp(&existing.updated_at) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => candidate.stable_hash() >= existing.stable_hash(),
    }
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

fn compare_json(
    a: Option<&serde_json::Value>,
    b: Option<&serde_json::Value>,
) -> std::cmp::Ordering {
    use serde_json::Value;
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    }
}
