//! The repository's typed error enum, mapped onto the server's closed taxonomy at the
//! dispatcher boundary.

use thiserror::Error;

/// Result alias used throughout this crate.
pub type WorkItemResult<T> = Result<T, WorkItemError>;

/// Errors raised by the work-item repository and progress engine.
#[derive(Debug, Error)]
pub enum WorkItemError {
    /// No work item with the given id/title/keywords exists in the namespace.
    #[error("work item not found: {0}")]
    NotFound(String),

    /// `add_dependency` would create a cycle in the `blocks` subgraph. Carries the discovered
    /// cycle path, e.g. `[A, B, A]`.
    #[error("adding this dependency would create a cycle: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    /// A referenced parent/source/target id does not exist in the namespace.
    #[error("referenced work item does not exist: {0}")]
    DanglingReference(String),

    /// Input failed a repository-level invariant (not schema validation, which happens earlier).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The underlying store is unavailable or failed.
    #[error(transparent)]
    Store(#[from] jive_store::StoreError),

    /// The search engine failed while resolving `get` by keyword similarity.
    #[error(transparent)]
    Search(#[from] jive_search::SearchError),
}
