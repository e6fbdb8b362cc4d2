//! Typed errors for the memory repository.

use thiserror::Error;

/// Result alias used throughout this crate.
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Everything that can go wrong in the memory repository.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// No item with the given slug exists in the namespace.
    #[error("memory item not found: {0}")]
    NotFound(String),
    /// `create` was called with a slug that already exists.
    #[error("slug already exists: {0}")]
    DuplicateSlug(String),
    /// A slug failed `^[a-z0-9-]+$` validation.
    #[error("invalid slug (must match ^[a-z0-9-]+$): {0}")]
    InvalidSlug(String),
    /// A field failed validation independent of the slug.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Malformed markdown/front-matter passed to `import`/`import_batch`.
    #[error("malformed markdown: {0}")]
    Markdown(String),
    /// Propagated from the store adapter.
    #[error(transparent)]
    Store(#[from] jive_store::StoreError),
    /// Propagated from the search engine.
    #[error(transparent)]
    Search(#[from] jive_search::SearchError),
}
