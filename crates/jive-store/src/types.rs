//! Table identifiers, rows, and filter predicates shared by every [`crate::StoreAdapter`] call.

use jive_core::Namespace;
use serde_json::{Map, Value};
use std::fmt;

/// The seven entity tables plus the optional auxiliary search index, one LanceDB table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `WorkItem` rows.
    WorkItem,
    /// `WorkItemDependency` edges.
    WorkItemDependency,
    /// `ExecutionLog` rows.
    ExecutionLog,
    /// `ProgressEvent` rows.
    ProgressEvent,
    /// `Milestone` rows.
    Milestone,
    /// `ArchitectureItem` memory rows.
    ArchitectureItem,
    /// `TroubleshootItem` memory rows.
    TroubleshootItem,
}

impl Table {
    /// The LanceDB table name this variant is stored under.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WorkItem => "work_items",
            Self::WorkItemDependency => "work_item_dependencies",
            Self::ExecutionLog => "execution_logs",
            Self::ProgressEvent => "progress_events",
            Self::Milestone => "milestones",
            Self::ArchitectureItem => "architecture_items",
            Self::TroubleshootItem => "troubleshoot_items",
        }
    }

    /// All table variants, used to create/open every table up front.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::WorkItem,
            Self::WorkItemDependency,
            Self::ExecutionLog,
            Self::ProgressEvent,
            Self::Milestone,
            Self::ArchitectureItem,
            Self::TroubleshootItem,
        ]
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single table row: a JSON object plus the invariant scalar columns every row carries.
///
/// `id` is the primary key (a UUID string for work-item tables, a slug for memory tables).
/// `fields` holds the rest of the entity, serialized as-is; callers `serde_json::from_value`
/// it back into the typed struct they expect.
#[derive(Debug, Clone)]
pub struct Row {
    /// Primary key, unique within `(table, namespace)`.
    pub id: String,
    /// Owning namespace.
    pub namespace: Namespace,
    /// RFC3339 last-write timestamp, used for last-writer-wins resolution.
    pub updated_at: String,
    /// Optional embedding vector; absent for rows with no semantic component.
    pub embedding: Option<Vec<f32>>,
    /// The full entity payload, including `id`/`namespace`/`updated_at` for round-tripping.
    pub fields: Map<String, Value>,
}

impl Row {
    /// Build a row from a JSON value, extracting the scalar columns the store indexes on.
    ///
    /// # Errors
    ///
    /// Returns an error string if `value` is not an object or is missing `id`/`namespace`/`updated_at`.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(fields) = value else {
            return Err("row must be a JSON object".to_string());
        };
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .ok_or("row missing string field `id`")?
            .to_string();
        let namespace = fields
            .get("namespace")
            .and_then(Value::as_str)
            .ok_or("row missing string field `namespace`")?;
        let namespace = Namespace::parse(namespace).map_err(|e| e.to_string())?;
        let updated_at = fields
            .get("updated_at")
            .and_then(Value::as_str)
            .ok_or("row missing string field `updated_at`")?
            .to_string();
        let embedding = fields.get("embedding").and_then(|v| v.as_array()).map(|arr| {
            arr.iter()
                .map(|n| n.as_f64().unwrap_or(0.0) as f32)
                .collect()
        });
        Ok(Self {
            id,
            namespace,
            updated_at,
            embedding,
            fields,
        })
    }

    /// Render the row back into its JSON representation.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// A stable hash of the row's canonical JSON, used to break `updated_at` ties deterministically.
    #[must_use]
    pub fn stable_hash(&self) -> u64 {
        use sha2::{Digest, Sha256};
        let canonical = serde_json::to_string(&self.fields).unwrap_or_default();
        let digest = Sha256::digest(canonical.as_bytes());
        u64::from_be_bytes(digest[0..8].try_into().unwrap_or_default())
    }
}

/// A scalar predicate applied to a non-embedding column.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Column equals the given JSON scalar.
    Eq(String, Value),
    /// Column is one of the given JSON scalars.
    In(String, Vec<Value>),
    /// Column is a string array/list containing the given value.
    Contains(String, Value),
}

/// A conjunctive filter: namespace plus zero or more scalar predicates, all required (AND).
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Predicates applied in addition to the implicit namespace filter.
    pub predicates: Vec<Predicate>,
}

impl Filter {
    /// An empty filter matching every row in the namespace.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality predicate.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Eq(field.into(), value.into()));
        self
    }

    /// Add an inclusion predicate.
    #[must_use]
    pub fn one_of(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.predicates.push(Predicate::In(field.into(), values));
        self
    }

    /// Add a list-contains predicate.
    #[must_use]
    pub fn contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates
            .push(Predicate::Contains(field.into(), value.into()));
        self
    }

    /// Evaluate this filter (plus the implicit namespace match) against a row.
    #[must_use]
    pub fn matches(&self, namespace: &Namespace, row: &Row) -> bool {
        if &row.namespace != namespace {
            return false;
        }
        self.predicates.iter().all(|p| match p {
            Predicate::Eq(field, value) => row.fields.get(field) == Some(value),
            Predicate::In(field, values) => row
                .fields
                .get(field)
                .is_some_and(|v| values.contains(v)),
            Predicate::Contains(field, value) => row
                .fields
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|arr| arr.contains(value)),
        })
    }
}

/// Pagination window for `scan`.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// Maximum rows to return.
    pub limit: usize,
    /// Rows to skip before collecting `limit`.
    pub offset: usize,
}

impl Page {
    /// Construct a page, used by callers that have already validated `limit`/`offset`.
    #[must_use]
    pub const fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { limit: 10, offset: 0 }
    }
}

/// Sort specification for `scan`; ties are broken by the caller per the repository's own rules.
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// Field to sort on.
    pub field: String,
    /// Sort descending when true.
    pub descending: bool,
}

impl OrderBy {
    /// Sort ascending on `field`.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    /// Sort descending on `field`.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}
