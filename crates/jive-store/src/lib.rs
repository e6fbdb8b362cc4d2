//! # jive-store
//!
//! The embedded vector store adapter and the embedding capability trait it composes with.
//! Every repository crate (`jive-workitem`, `jive-memory`) and the search engine
//! (`jive-search`) talk to storage exclusively through [`StoreAdapter`]; nothing downstream
//! of it knows it is LanceDB.

#![warn(missing_docs, missing_debug_implementations, clippy::all)]
#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod adapter;
mod embed;
mod error;
mod lance;
mod types;

pub use adapter::StoreAdapter;
pub use embed::{EmbedError, EmbedResult, Embedder, HashEmbedder, RemoteEmbedder};
pub use error::{StoreError, StoreResult};
pub use lance::LanceStore;
pub use types::{Filter, OrderBy, Page, Predicate, Row, Table};
