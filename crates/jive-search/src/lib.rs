//! # jive-search
//!
//! Semantic, keyword, and hybrid search over any [`jive_store::Table`], used by both the
//! work-item repository's `search_content` tool and the memory repository's `search`/
//! `match_problem` operations.

#![warn(missing_docs, missing_debug_implementations, clippy::all)]
#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod keyword;
mod scoring;

use std::sync::Arc;

use jive_core::Namespace;
use jive_store::{Embedder, Filter, Row, StoreAdapter, Table};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use keyword::tokenize;

/// Result alias for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors raised while executing a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query string was empty or whitespace-only.
    #[error("search query must not be empty")]
    EmptyQuery,

    /// `limit` was outside `[1, 100]`.
    #[error("limit must be between 1 and 100, got {0}")]
    LimitOutOfRange(usize),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] jive_store::StoreError),

    /// The embedder failed.
    #[error(transparent)]
    Embed(#[from] jive_store::EmbedError),
}

/// Which ranking strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    /// Pure vector similarity over the query embedding.
    Semantic,
    /// Pure token-overlap scoring, no embeddings involved.
    Keyword,
    /// Blend of both, the default mode.
    Hybrid,
}

/// Tunable parameters for a single search call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Drop results scoring below this threshold (applied after blending).
    pub similarity_threshold: f32,
    /// Maximum results to return; validated to `[1, 100]` by the caller.
    pub limit: usize,
    /// Whether to include raw scores in the returned entries (always computed internally;
    /// this only controls whether callers downstream choose to surface it).
    pub include_score: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.0,
            limit: 10,
            include_score: true,
        }
    }
}

/// One ranked hit.
#[derive(Debug, Clone)]
pub struct RankedRow {
    /// The matched row.
    pub row: Row,
    /// Final blended score (higher is better, regardless of mode).
    pub score: f32,
}

/// Text fields to search, in priority order for the title-boost (first entry is "title").
#[derive(Debug, Clone)]
pub struct TextFields {
    /// Field names to tokenize/match against, first is treated as the title field.
    pub fields: Vec<&'static str>,
}

impl TextFields {
    /// Work-item text fields: title, then description.
    #[must_use]
    pub fn work_item() -> Self {
        Self {
            fields: vec!["title", "description"],
        }
    }

    /// Architecture memory text fields.
    #[must_use]
    pub fn architecture() -> Self {
        Self {
            fields: vec!["title", "ai_requirements", "keywords"],
        }
    }

    /// Troubleshoot memory text fields.
    #[must_use]
    pub fn troubleshoot() -> Self {
        Self {
            fields: vec!["title", "ai_use_case", "ai_solutions", "keywords"],
        }
    }
}

/// Run a search of the given `mode` against `table`, scoped to `namespace`.
///
/// # Errors
///
/// Returns [`SearchError::EmptyQuery`] for blank queries, [`SearchError::LimitOutOfRange`] for
/// `options.limit` outside `[1, 100]`, or a store/embedder error.
pub async fn search(
    adapter: &Arc<dyn StoreAdapter>,
    embedder: &Arc<dyn Embedder>,
    namespace: &Namespace,
    table: Table,
    text_fields: &TextFields,
    query: &str,
    filter: Filter,
    mode: SearchType,
    options: &SearchOptions,
) -> SearchResult<Vec<RankedRow>> {
    if query.trim().is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    if !(1..=100).contains(&options.limit) {
        return Err(SearchError::LimitOutOfRange(options.limit));
    }

    let candidate_k = (options.limit * 2).max(20);

    let semantic = match mode {
        SearchType::Semantic | SearchType::Hybrid => {
            Some(semantic_candidates(adapter, embedder, namespace, table, filter.clone(), query, candidate_k).await?)
        }
        SearchType::Keyword => None,
    };

    let keyword = match mode {
        SearchType::Keyword | SearchType::Hybrid => {
            Some(keyword_candidates(adapter, namespace, table, filter, text_fields, query, candidate_k).await?)
        }
        SearchType::Semantic => None,
    };

    let blended = match mode {
        SearchType::Semantic => semantic.unwrap_or_default(),
        SearchType::Keyword => keyword.unwrap_or_default(),
        SearchType::Hybrid => scoring::blend(semantic.unwrap_or_default(), keyword.unwrap_or_default()),
    };

    let mut results: Vec<RankedRow> = blended
        .into_iter()
        .filter(|r| r.score >= options.similarity_threshold)
        .collect();
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(options.limit);
    Ok(results)
}

async fn semantic_candidates(
    adapter: &Arc<dyn StoreAdapter>,
    embedder: &Arc<dyn Embedder>,
    namespace: &Namespace,
    table: Table,
    filter: Filter,
    query: &str,
    k: usize,
) -> SearchResult<Vec<RankedRow>> {
    let query_vector = embedder.embed(query).await?;
    if query_vector.iter().all(|v| *v == 0.0) {
        return Ok(Vec::new());
    }
    let hits = adapter.vector_search(namespace, table, &query_vector, filter, k).await?;
    Ok(hits
        .into_iter()
        .map(|(row, distance)| RankedRow {
            row,
            score: 1.0 / (1.0 + distance),
        })
        .collect())
}

async fn keyword_candidates(
    adapter: &Arc<dyn StoreAdapter>,
    namespace: &Namespace,
    table: Table,
    filter: Filter,
    text_fields: &TextFields,
    query: &str,
    k: usize,
) -> SearchResult<Vec<RankedRow>> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return Ok(Vec::new());
    }

    let rows = adapter
        .scan(namespace, table, filter, jive_store::Page::new(usize::from(u16::MAX), 0), None)
        .await?;

    let mut scored: Vec<RankedRow> = rows
        .into_iter()
        .filter_map(|row| {
            let score = keyword::score_row(&row, text_fields, &query_tokens);
            (score > 0.0).then_some(RankedRow { row, score })
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    Ok(scored)
}

/// Re-exported so the memory repository's `match_problem` can reuse the raw Jaccard/boost math
/// without going through the generic `search` pipeline.
pub use scoring::min_max_normalize;
