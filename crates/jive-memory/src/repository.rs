//! The Memory Repository (C5): CRUD, semantic/keyword/hybrid search, context assembly, and
//! success-rate-aware problem matching over `ArchitectureItem`/`TroubleshootItem`, plus
//! markdown export/import.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use jive_core::Namespace;
use jive_search::{RankedRow, SearchOptions, SearchType, TextFields};
use jive_store::{Embedder, Filter, Page, Row, StoreAdapter, Table};
use tokio::sync::Mutex;

use crate::config::MemoryConfig;
use crate::error::{MemoryError, MemoryResult};
use crate::markdown;
use crate::model::{
    is_valid_slug, ArchitectureItem, ArchitectureItemPatch, ImportMode, MatchedProblem, MemoryType,
    NewArchitectureItem, NewTroubleshootItem, TroubleshootItem, TroubleshootItemPatch,
};

/// Everything the repository needs to turn a request into reads/writes against the store.
pub struct MemoryRepository {
    adapter: Arc<dyn StoreAdapter>,
    embedder: Arc<dyn Embedder>,
    config: MemoryConfig,
    write_locks: DashMap<Namespace, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for MemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MemoryRepository {
    /// Build a repository over the given store and embedder.
    #[must_use]
    pub fn new(adapter: Arc<dyn StoreAdapter>, embedder: Arc<dyn Embedder>, config: MemoryConfig) -> Self {
        Self {
            adapter,
            embedder,
            config,
            write_locks: DashMap::new(),
        }
    }

    fn write_lock(&self, namespace: &Namespace) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(namespace.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn table(memory_type: MemoryType) -> Table {
        match memory_type {
            MemoryType::Architecture => Table::ArchitectureItem,
            MemoryType::Troubleshoot => Table::TroubleshootItem,
        }
    }

    // ---- Architecture CRUD ----------------------------------------------------------------

    /// Create an architecture item; fails with [`MemoryError::DuplicateSlug`] if it exists.
    pub async fn create_architecture(
        &self,
        namespace: &Namespace,
        new_item: NewArchitectureItem,
    ) -> MemoryResult<ArchitectureItem> {
        let _guard = self.write_lock(namespace).lock().await;
        if !is_valid_slug(&new_item.unique_slug) {
            return Err(MemoryError::InvalidSlug(new_item.unique_slug));
        }
        if new_item.title.trim().is_empty() {
            return Err(MemoryError::InvalidInput("title must not be empty".to_string()));
        }
        if self.adapter.get(namespace, Table::ArchitectureItem, &new_item.unique_slug).await?.is_some() {
            return Err(MemoryError::DuplicateSlug(new_item.unique_slug));
        }

        let embedding = self
            .embedder
            .embed(&format!("{} {} {}", new_item.title, new_item.ai_requirements, new_item.keywords.join(" ")))
            .await?;
        let now = Utc::now().to_rfc3339();
        let item = ArchitectureItem {
            unique_slug: new_item.unique_slug,
            namespace: namespace.clone(),
            title: new_item.title,
            ai_when_to_use: new_item.ai_when_to_use,
            ai_requirements: new_item.ai_requirements,
            children_slugs: new_item.children_slugs,
            related_slugs: new_item.related_slugs,
            linked_epic_ids: new_item.linked_epic_ids,
            keywords: new_item.keywords,
            tags: new_item.tags,
            embedding: Some(embedding),
            created_at: now.clone(),
            updated_at: now,
        };
        self.adapter
            .upsert(namespace, Table::ArchitectureItem, vec![architecture_to_row(&item)?])
            .await?;
        Ok(item)
    }

    /// Apply `patch` to the architecture item identified by `slug`.
    pub async fn update_architecture(
        &self,
        namespace: &Namespace,
        slug: &str,
        patch: ArchitectureItemPatch,
    ) -> MemoryResult<ArchitectureItem> {
        let mut item = self.get_architecture(namespace, slug).await?;
        let mut text_changed = false;

        if let Some(title) = patch.title {
            text_changed |= title != item.title;
            item.title = title;
        }
        if let Some(ai_requirements) = patch.ai_requirements {
            text_changed |= ai_requirements != item.ai_requirements;
            item.ai_requirements = ai_requirements;
        }
        if let Some(keywords) = patch.keywords {
            text_changed |= keywords != item.keywords;
            item.keywords = keywords;
        }
        if let Some(ai_when_to_use) = patch.ai_when_to_use {
            item.ai_when_to_use = ai_when_to_use;
        }
        if let Some(children_slugs) = patch.children_slugs {
            item.children_slugs = children_slugs;
        }
        if let Some(related_slugs) = patch.related_slugs {
            item.related_slugs = related_slugs;
        }
        if let Some(linked_epic_ids) = patch.linked_epic_ids {
            item.linked_epic_ids = linked_epic_ids;
        }
        if let Some(tags) = patch.tags {
            item.tags = tags;
        }

        if text_changed {
            item.embedding = Some(
                self.embedder
                    .embed(&format!("{} {} {}", item.title, item.ai_requirements, item.keywords.join(" ")))
                    .await?,
            );
        }
        item.updated_at = Utc::now().to_rfc3339();
        self.adapter
            .upsert(namespace, Table::ArchitectureItem, vec![architecture_to_row(&item)?])
            .await?;
        Ok(item)
    }

    /// Fetch an architecture item by slug.
    pub async fn get_architecture(&self, namespace: &Namespace, slug: &str) -> MemoryResult<ArchitectureItem> {
        self.adapter
            .get(namespace, Table::ArchitectureItem, slug)
            .await?
            .map(row_to_architecture)
            .transpose()?
            .ok_or_else(|| MemoryError::NotFound(slug.to_string()))
    }

    /// List architecture items, paginated, in `created_at` order.
    pub async fn list_architecture(&self, namespace: &Namespace, limit: usize, offset: usize) -> MemoryResult<Vec<ArchitectureItem>> {
        if !(1..=100).contains(&limit) {
            return Err(MemoryError::InvalidInput(format!("limit must be between 1 and 100, got {limit}")));
        }
        let rows = self
            .adapter
            .scan(namespace, Table::ArchitectureItem, Filter::all(), Page::new(100_000, 0), None)
            .await?;
        let mut items: Vec<ArchitectureItem> = rows.into_iter().map(row_to_architecture).collect::<MemoryResult<_>>()?;
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items.into_iter().skip(offset).take(limit).collect())
    }

    // ---- Troubleshoot CRUD ------------------------------------------------------------------

    /// Create a troubleshoot item; fails with [`MemoryError::DuplicateSlug`] if it exists.
    pub async fn create_troubleshoot(
        &self,
        namespace: &Namespace,
        new_item: NewTroubleshootItem,
    ) -> MemoryResult<TroubleshootItem> {
        let _guard = self.write_lock(namespace).lock().await;
        if !is_valid_slug(&new_item.unique_slug) {
            return Err(MemoryError::InvalidSlug(new_item.unique_slug));
        }
        if new_item.title.trim().is_empty() {
            return Err(MemoryError::InvalidInput("title must not be empty".to_string()));
        }
        if self.adapter.get(namespace, Table::TroubleshootItem, &new_item.unique_slug).await?.is_some() {
            return Err(MemoryError::DuplicateSlug(new_item.unique_slug));
        }

        let embedding = self.embed_troubleshoot_text(&new_item.title, &new_item.ai_use_case, &new_item.ai_solutions, &new_item.keywords).await?;
        let now = Utc::now().to_rfc3339();
        let item = TroubleshootItem {
            unique_slug: new_item.unique_slug,
            namespace: namespace.clone(),
            title: new_item.title,
            ai_use_case: new_item.ai_use_case,
            ai_solutions: new_item.ai_solutions,
            keywords: new_item.keywords,
            tags: new_item.tags,
            usage_count: 0,
            success_count: 0,
            embedding: Some(embedding),
            created_at: now.clone(),
            updated_at: now,
        };
        self.adapter
            .upsert(namespace, Table::TroubleshootItem, vec![troubleshoot_to_row(&item)?])
            .await?;
        Ok(item)
    }

    async fn embed_troubleshoot_text(&self, title: &str, use_case: &str, solutions: &str, keywords: &[String]) -> MemoryResult<Vec<f32>> {
        Ok(self.embedder.embed(&format!("{title} {use_case} {solutions} {}", keywords.join(" "))).await?)
    }

    /// Apply `patch` to the troubleshoot item identified by `slug`.
    pub async fn update_troubleshoot(
        &self,
        namespace: &Namespace,
        slug: &str,
        patch: TroubleshootItemPatch,
    ) -> MemoryResult<TroubleshootItem> {
        let mut item = self.get_troubleshoot(namespace, slug).await?;
        let mut text_changed = false;

        if let Some(title) = patch.title {
            text_changed |= title != item.title;
            item.title = title;
        }
        if let Some(ai_use_case) = patch.ai_use_case {
            text_changed |= ai_use_case != item.ai_use_case;
            item.ai_use_case = ai_use_case;
        }
        if let Some(ai_solutions) = patch.ai_solutions {
            text_changed |= ai_solutions != item.ai_solutions;
            item.ai_solutions = ai_solutions;
        }
        if let Some(keywords) = patch.keywords {
            text_changed |= keywords != item.keywords;
            item.keywords = keywords;
        }
        if let Some(tags) = patch.tags {
            item.tags = tags;
        }
        if patch.record_success {
            item.success_count += 1;
        }

        if text_changed {
            item.embedding = Some(self.embed_troubleshoot_text(&item.title, &item.ai_use_case, &item.ai_solutions, &item.keywords).await?);
        }
        item.updated_at = Utc::now().to_rfc3339();
        self.adapter
            .upsert(namespace, Table::TroubleshootItem, vec![troubleshoot_to_row(&item)?])
            .await?;
        Ok(item)
    }

    /// Fetch a troubleshoot item by slug.
    pub async fn get_troubleshoot(&self, namespace: &Namespace, slug: &str) -> MemoryResult<TroubleshootItem> {
        self.adapter
            .get(namespace, Table::TroubleshootItem, slug)
            .await?
            .map(row_to_troubleshoot)
            .transpose()?
            .ok_or_else(|| MemoryError::NotFound(slug.to_string()))
    }

    /// List troubleshoot items, paginated, in `created_at` order.
    pub async fn list_troubleshoot(&self, namespace: &Namespace, limit: usize, offset: usize) -> MemoryResult<Vec<TroubleshootItem>> {
        if !(1..=100).contains(&limit) {
            return Err(MemoryError::InvalidInput(format!("limit must be between 1 and 100, got {limit}")));
        }
        let rows = self
            .adapter
            .scan(namespace, Table::TroubleshootItem, Filter::all(), Page::new(100_000, 0), None)
            .await?;
        let mut items: Vec<TroubleshootItem> = rows.into_iter().map(row_to_troubleshoot).collect::<MemoryResult<_>>()?;
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items.into_iter().skip(offset).take(limit).collect())
    }

    /// Delete the item with `slug` from `memory_type`'s table; succeeds even if absent.
    pub async fn delete(&self, namespace: &Namespace, memory_type: MemoryType, slug: &str) -> MemoryResult<()> {
        self.adapter
            .delete(namespace, Self::table(memory_type), Filter::all().eq("id", slug))
            .await?;
        Ok(())
    }

    // ---- Search ------------------------------------------------------------------------------

    /// Search `memory_type`'s table via the shared search engine.
    pub async fn search(
        &self,
        namespace: &Namespace,
        memory_type: MemoryType,
        query: &str,
        mode: SearchType,
        options: &SearchOptions,
    ) -> MemoryResult<Vec<RankedRow>> {
        let text_fields = match memory_type {
            MemoryType::Architecture => TextFields::architecture(),
            MemoryType::Troubleshoot => TextFields::troubleshoot(),
        };
        let hits = jive_search::search(
            &self.adapter,
            &self.embedder,
            namespace,
            Self::table(memory_type),
            &text_fields,
            query,
            Filter::all(),
            mode,
            options,
        )
        .await?;
        Ok(hits)
    }

    // ---- get_context ---------------------------------------------------------------------

    /// Assemble a token-budgeted context document rooted at `slug`: its full `ai_requirements`,
    /// plus truncated summaries of its transitive children and directly related items, dropping
    /// the farthest (ties broken related-before-child) entries first when over budget.
    pub async fn get_context(&self, namespace: &Namespace, slug: &str, token_budget: Option<usize>) -> MemoryResult<String> {
        let budget = token_budget.unwrap_or(self.config.default_token_budget);
        let root = self.get_architecture(namespace, slug).await?;

        let mut entries = Vec::new();
        let mut frontier: Vec<(String, usize)> = root.children_slugs.iter().cloned().map(|s| (s, 1)).collect();
        let mut visited = std::collections::HashSet::from([root.unique_slug.clone()]);
        while let Some((child_slug, depth)) = frontier.pop() {
            if depth > self.config.max_context_depth || !visited.insert(child_slug.clone()) {
                continue;
            }
            if let Ok(child) = self.get_architecture(namespace, &child_slug).await {
                for grandchild in &child.children_slugs {
                    frontier.push((grandchild.clone(), depth + 1));
                }
                entries.push(ContextEntry { title: child.title, summary: child.ai_requirements, is_related: false, depth });
            }
        }
        let related_depth = entries.iter().map(|e| e.depth).max().unwrap_or(0) + 1;
        for related_slug in &root.related_slugs {
            if let Ok(related) = self.get_architecture(namespace, related_slug).await {
                entries.push(ContextEntry { title: related.title, summary: related.ai_requirements, is_related: true, depth: related_depth });
            }
        }

        // Drop order: farthest first, related before child at the same depth.
        entries.sort_by(|a, b| a.depth.cmp(&b.depth).then(a.is_related.cmp(&b.is_related)));

        let char_budget = budget * self.config.char_per_token;
        let mut rendered = render_context(&root, &entries);
        while estimate_tokens(&rendered, self.config.char_per_token) > budget && !entries.is_empty() {
            entries.pop();
            rendered = render_context(&root, &entries);
        }
        if estimate_tokens(&rendered, self.config.char_per_token) > budget {
            let keep_chars = char_budget.saturating_sub(render_header(&root).len());
            let truncated_requirements = sentence_truncate(&root.ai_requirements, keep_chars);
            let mut truncated_root = root.clone();
            truncated_root.ai_requirements = truncated_requirements;
            rendered = render_context(&truncated_root, &entries);
        }
        Ok(rendered)
    }

    // ---- match_problem -----------------------------------------------------------------------

    /// Semantic-search `ai_use_case`, rank by `base * (1 + 0.2 * success_count/max(usage_count,1))`,
    /// and increment `usage_count` on every returned row.
    pub async fn match_problem(&self, namespace: &Namespace, description: String, limit: usize) -> MemoryResult<Vec<MatchedProblem>> {
        let candidate_limit = (limit * 2).max(1).min(100);
        let hits = self
            .search(
                namespace,
                MemoryType::Troubleshoot,
                &description,
                SearchType::Semantic,
                &SearchOptions { similarity_threshold: 0.0, limit: candidate_limit, include_score: true },
            )
            .await?;

        let mut scored: Vec<MatchedProblem> = Vec::with_capacity(hits.len());
        for hit in hits {
            let item = row_to_troubleshoot(hit.row)?;
            let ratio = item.success_count as f32 / (item.usage_count.max(1) as f32);
            let boost = 1.0 + 0.2 * ratio;
            scored.push(MatchedProblem { item, score: hit.score * boost });
        }
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        for matched in &mut scored {
            matched.item.usage_count += 1;
            self.adapter
                .upsert(namespace, Table::TroubleshootItem, vec![troubleshoot_to_row(&matched.item)?])
                .await?;
        }
        Ok(scored)
    }

    // ---- export/import ------------------------------------------------------------------------

    /// Render an architecture item as markdown with YAML front matter.
    pub async fn export_architecture(&self, namespace: &Namespace, slug: &str) -> MemoryResult<String> {
        Ok(markdown::export_architecture(&self.get_architecture(namespace, slug).await?))
    }

    /// Render a troubleshoot item as markdown with YAML front matter.
    pub async fn export_troubleshoot(&self, namespace: &Namespace, slug: &str) -> MemoryResult<String> {
        Ok(markdown::export_troubleshoot(&self.get_troubleshoot(namespace, slug).await?))
    }

    /// Parse and upsert an architecture document per `mode`.
    pub async fn import_architecture(&self, namespace: &Namespace, document: &str, mode: ImportMode) -> MemoryResult<ArchitectureItem> {
        let parsed = markdown::import_architecture(document)?;
        if mode == ImportMode::SkipExisting {
            if let Ok(existing) = self.get_architecture(namespace, &parsed.unique_slug).await {
                return Ok(existing);
            }
        }
        let embedding = self
            .embedder
            .embed(&format!("{} {} {}", parsed.title, parsed.ai_requirements, parsed.keywords.join(" ")))
            .await?;
        let item = ArchitectureItem {
            unique_slug: parsed.unique_slug,
            namespace: namespace.clone(),
            title: parsed.title,
            ai_when_to_use: parsed.ai_when_to_use,
            ai_requirements: parsed.ai_requirements,
            children_slugs: parsed.children_slugs,
            related_slugs: parsed.related_slugs,
            linked_epic_ids: parsed.linked_epic_ids,
            keywords: parsed.keywords,
            tags: parsed.tags,
            embedding: Some(embedding),
            created_at: parsed.created_at,
            updated_at: parsed.updated_at,
        };
        self.adapter
            .upsert(namespace, Table::ArchitectureItem, vec![architecture_to_row(&item)?])
            .await?;
        Ok(item)
    }

    /// Parse and upsert a troubleshoot document per `mode`.
    pub async fn import_troubleshoot(&self, namespace: &Namespace, document: &str, mode: ImportMode) -> MemoryResult<TroubleshootItem> {
        let parsed = markdown::import_troubleshoot(document)?;
        if mode == ImportMode::SkipExisting {
            if let Ok(existing) = self.get_troubleshoot(namespace, &parsed.unique_slug).await {
                return Ok(existing);
            }
        }
        let embedding = self.embed_troubleshoot_text(&parsed.title, &parsed.ai_use_case, &parsed.ai_solutions, &parsed.keywords).await?;
        let item = TroubleshootItem {
            unique_slug: parsed.unique_slug,
            namespace: namespace.clone(),
            title: parsed.title,
            ai_use_case: parsed.ai_use_case,
            ai_solutions: parsed.ai_solutions,
            keywords: parsed.keywords,
            tags: parsed.tags,
            usage_count: parsed.usage_count,
            success_count: parsed.success_count,
            embedding: Some(embedding),
            created_at: parsed.created_at,
            updated_at: parsed.updated_at,
        };
        self.adapter
            .upsert(namespace, Table::TroubleshootItem, vec![troubleshoot_to_row(&item)?])
            .await?;
        Ok(item)
    }

    /// Export every slug in `slugs`, isolating per-item failures rather than aborting the batch.
    pub async fn export_batch(&self, namespace: &Namespace, memory_type: MemoryType, slugs: &[String]) -> Vec<MemoryResult<String>> {
        let mut results = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let outcome = match memory_type {
                MemoryType::Architecture => self.export_architecture(namespace, slug).await,
                MemoryType::Troubleshoot => self.export_troubleshoot(namespace, slug).await,
            };
            results.push(outcome);
        }
        results
    }

    /// Import every document in `docs`, isolating per-item failures rather than aborting the
    /// batch. Returns each successfully imported item's slug.
    pub async fn import_batch(&self, namespace: &Namespace, memory_type: MemoryType, docs: &[String], mode: ImportMode) -> Vec<MemoryResult<String>> {
        let mut results = Vec::with_capacity(docs.len());
        for document in docs {
            let outcome = match memory_type {
                MemoryType::Architecture => self.import_architecture(namespace, document, mode).await.map(|item| item.unique_slug),
                MemoryType::Troubleshoot => self.import_troubleshoot(namespace, document, mode).await.map(|item| item.unique_slug),
            };
            results.push(outcome);
        }
        results
    }
}

struct ContextEntry {
    title: String,
    summary: String,
    is_related: bool,
    depth: usize,
}

fn estimate_tokens(text: &str, char_per_token: usize) -> usize {
    text.len().div_ceil(char_per_token.max(1))
}

fn render_header(root: &ArchitectureItem) -> String {
    let when_to_use = if root.ai_when_to_use.is_empty() {
        String::new()
    } else {
        format!("\nWhen to use:\n{}\n", root.ai_when_to_use.iter().map(|s| format!("- {s}")).collect::<Vec<_>>().join("\n"))
    };
    format!("# {}\n{when_to_use}\n", root.title)
}

fn render_context(root: &ArchitectureItem, entries: &[ContextEntry]) -> String {
    let mut out = render_header(root);
    out.push_str(&root.ai_requirements);
    out.push('\n');
    for entry in entries {
        let kind = if entry.is_related { "Related" } else { "See also" };
        out.push_str(&format!("\n## {kind}: {}\n\n{}\n", entry.title, summarize(&entry.summary)));
    }
    out
}

fn summarize(text: &str) -> String {
    sentence_truncate(text, 280)
}

fn sentence_truncate(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }
    let window = &text[..max_chars];
    if let Some(cut) = window.rfind(['.', '!', '?']) {
        return text[..=cut].to_string();
    }
    format!("{window}...")
}

fn architecture_to_row(item: &ArchitectureItem) -> MemoryResult<Row> {
    let mut value = serde_json::to_value(item).map_err(|e| MemoryError::InvalidInput(e.to_string()))?;
    if let Some(object) = value.as_object_mut() {
        object.insert("id".to_string(), serde_json::Value::String(item.unique_slug.clone()));
    }
    Row::from_value(value).map_err(MemoryError::InvalidInput)
}

fn row_to_architecture(row: Row) -> MemoryResult<ArchitectureItem> {
    serde_json::from_value(row.into_value()).map_err(|e| MemoryError::InvalidInput(e.to_string()))
}

fn troubleshoot_to_row(item: &TroubleshootItem) -> MemoryResult<Row> {
    let mut value = serde_json::to_value(item).map_err(|e| MemoryError::InvalidInput(e.to_string()))?;
    if let Some(object) = value.as_object_mut() {
        object.insert("id".to_string(), serde_json::Value::String(item.unique_slug.clone()));
    }
    Row::from_value(value).map_err(MemoryError::InvalidInput)
}

fn row_to_troubleshoot(row: Row) -> MemoryResult<TroubleshootItem> {
    serde_json::from_value(row.into_value()).map_err(|e| MemoryError::InvalidInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jive_store::{HashEmbedder, LanceStore};

    fn repository() -> (MemoryRepository, tempfile::TempDir, Namespace) {
        let dir = tempfile::tempdir().unwrap();
        let adapter: Arc<dyn StoreAdapter> = Arc::new(LanceStore::new(dir.path()));
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(32));
        let repo = MemoryRepository::new(adapter, embedder, MemoryConfig::default());
        (repo, dir, Namespace::parse("default").unwrap())
    }

    #[tokio::test]
    async fn create_rejects_duplicate_slug() {
        let (repo, _dir, ns) = repository();
        let new_item = NewArchitectureItem {
            unique_slug: "jwt-auth".to_string(),
            title: "JWT".to_string(),
            ai_requirements: "Use RS256".to_string(),
            ..Default::default()
        };
        repo.create_architecture(&ns, new_item.clone()).await.unwrap();
        let err = repo.create_architecture(&ns, new_item).await.unwrap_err();
        assert!(matches!(err, MemoryError::DuplicateSlug(slug) if slug == "jwt-auth"));
    }

    #[tokio::test]
    async fn create_rejects_invalid_slug() {
        let (repo, _dir, ns) = repository();
        let new_item = NewArchitectureItem {
            unique_slug: "Not Valid".to_string(),
            title: "JWT".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            repo.create_architecture(&ns, new_item).await,
            Err(MemoryError::InvalidSlug(_))
        ));
    }

    #[tokio::test]
    async fn markdown_round_trip_recreates_identical_scalar_fields() {
        let (repo, _dir, ns) = repository();
        let created = repo
            .create_architecture(
                &ns,
                NewArchitectureItem {
                    unique_slug: "jwt-auth".to_string(),
                    title: "JWT".to_string(),
                    ai_requirements: "Use RS256".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let exported = repo.export_architecture(&ns, "jwt-auth").await.unwrap();
        repo.delete(&ns, MemoryType::Architecture, "jwt-auth").await.unwrap();
        assert!(repo.get_architecture(&ns, "jwt-auth").await.is_err());

        let restored = repo.import_architecture(&ns, &exported, ImportMode::Merge).await.unwrap();
        assert_eq!(restored.unique_slug, created.unique_slug);
        assert_eq!(restored.title, created.title);
        assert_eq!(restored.ai_requirements, created.ai_requirements);
        assert_eq!(restored.created_at, created.created_at);
    }

    #[tokio::test]
    async fn match_problem_boosts_by_success_rate_and_increments_usage() {
        let (repo, _dir, ns) = repository();
        let low = repo
            .create_troubleshoot(
                &ns,
                NewTroubleshootItem {
                    unique_slug: "low-success".to_string(),
                    title: "connection refused".to_string(),
                    ai_use_case: "database connection refused on startup".to_string(),
                    ai_solutions: "check the port".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        repo.update_troubleshoot(
            &ns,
            &low.unique_slug,
            TroubleshootItemPatch { record_success: false, ..Default::default() },
        )
        .await
        .unwrap();

        let high = repo
            .create_troubleshoot(
                &ns,
                NewTroubleshootItem {
                    unique_slug: "high-success".to_string(),
                    title: "connection refused".to_string(),
                    ai_use_case: "database connection refused on startup".to_string(),
                    ai_solutions: "restart the database service".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        for _ in 0..3 {
            repo.update_troubleshoot(
                &ns,
                &high.unique_slug,
                TroubleshootItemPatch { record_success: true, ..Default::default() },
            )
            .await
            .unwrap();
        }

        let matches = repo.match_problem(&ns, "database connection refused".to_string(), 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        let high_match = matches.iter().find(|m| m.item.unique_slug == "high-success").unwrap();
        assert_eq!(high_match.item.usage_count, 1);
    }

    #[tokio::test]
    async fn get_context_includes_children_within_budget() {
        let (repo, _dir, ns) = repository();
        repo.create_architecture(
            &ns,
            NewArchitectureItem {
                unique_slug: "root".to_string(),
                title: "Root".to_string(),
                ai_requirements: "Root requirements.".to_string(),
                children_slugs: vec!["child".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        repo.create_architecture(
            &ns,
            NewArchitectureItem {
                unique_slug: "child".to_string(),
                title: "Child".to_string(),
                ai_requirements: "Child requirements.".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let context = repo.get_context(&ns, "root", Some(1000)).await.unwrap();
        assert!(context.contains("Root requirements"));
        assert!(context.contains("Child"));
    }

    #[tokio::test]
    async fn get_context_drops_entries_under_tight_budget() {
        let (repo, _dir, ns) = repository();
        repo.create_architecture(
            &ns,
            NewArchitectureItem {
                unique_slug: "root".to_string(),
                title: "Root".to_string(),
                ai_requirements: "Root requirements that are reasonably descriptive.".to_string(),
                children_slugs: vec!["child".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        repo.create_architecture(
            &ns,
            NewArchitectureItem {
                unique_slug: "child".to_string(),
                title: "Child".to_string(),
                ai_requirements: "Child requirements that are also fairly descriptive.".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let context = repo.get_context(&ns, "root", Some(5)).await.unwrap();
        assert!(!context.contains("Child"));
    }
}
