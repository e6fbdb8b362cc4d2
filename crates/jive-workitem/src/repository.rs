//! The Work-Item Repository (C4): CRUD, hierarchy traversal, dependency-graph mutation with
//! cycle detection, and progress rollup, all namespace-scoped over a [`StoreAdapter`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use jive_core::Namespace;
use jive_search::{RankedRow, SearchOptions, SearchType, TextFields};
use jive_store::{Embedder, Filter, Page, Row, StoreAdapter, Table};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::WorkItemConfig;
use crate::error::{WorkItemError, WorkItemResult};
use crate::graph;
use crate::model::{DependencyType, NewWorkItem, WorkItem, WorkItemDependency, WorkItemPatch};
use crate::query::{DeleteMode, Direction, GraphViolation, ValidationScope, WorkItemListFilter, WorkItemOutcome};

/// Everything the repository needs to turn a request into reads/writes against the store.
pub struct WorkItemRepository {
    adapter: Arc<dyn StoreAdapter>,
    embedder: Arc<dyn Embedder>,
    config: WorkItemConfig,
    write_locks: DashMap<Namespace, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for WorkItemRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkItemRepository")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WorkItemRepository {
    /// Build a repository over the given store and embedder.
    #[must_use]
    pub fn new(adapter: Arc<dyn StoreAdapter>, embedder: Arc<dyn Embedder>, config: WorkItemConfig) -> Self {
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

    async fn all_items(&self, namespace: &Namespace) -> WorkItemResult<Vec<WorkItem>> {
        let rows = self
            .adapter
            .scan(namespace, Table::WorkItem, Filter::all(), Page::new(100_000, 0), None)
            .await?;
        rows.into_iter().map(row_to_item).collect()
    }

    async fn all_blocks_edges(&self, namespace: &Namespace) -> WorkItemResult<Vec<WorkItemDependency>> {
        let rows = self
            .adapter
            .scan(
                namespace,
                Table::WorkItemDependency,
                Filter::all(),
                Page::new(100_000, 0),
                None,
            )
            .await?;
        rows.into_iter().map(row_to_dependency).collect()
    }

    async fn fetch_item(&self, namespace: &Namespace, id: &str) -> WorkItemResult<WorkItem> {
        self.adapter
            .get(namespace, Table::WorkItem, id)
            .await?
            .map(row_to_item)
            .transpose()?
            .ok_or_else(|| WorkItemError::NotFound(id.to_string()))
    }

    async fn embed_item_text(&self, title: &str, description: &str) -> WorkItemResult<Vec<f32>> {
        let text = format!("{title} {description}");
        Ok(self.embedder.embed(&text).await?)
    }

    /// Create a new work item under `parent_id` (or as a root).
    pub async fn create(&self, namespace: &Namespace, new_item: NewWorkItem) -> WorkItemResult<WorkItemOutcome> {
        if new_item.title.trim().is_empty() {
            return Err(WorkItemError::InvalidInput("title must not be empty".to_string()));
        }
        if new_item.title.len() > 200 {
            return Err(WorkItemError::InvalidInput("title must be at most 200 characters".to_string()));
        }
        if new_item.description.len() > 10_000 {
            return Err(WorkItemError::InvalidInput(
                "description must be at most 10000 characters".to_string(),
            ));
        }

        let siblings = self.all_items(namespace).await?;
        let mut warnings = Vec::new();

        if let Some(parent_id) = &new_item.parent_id {
            let parent = siblings
                .iter()
                .find(|i| &i.id == parent_id)
                .ok_or_else(|| WorkItemError::DanglingReference(parent_id.clone()))?;
            if new_item.item_type.rank() < parent.item_type.rank() {
                let message = format!(
                    "child type {:?} outranks parent type {:?}",
                    new_item.item_type, parent.item_type
                );
                if self.config.strict_type_order {
                    return Err(WorkItemError::InvalidInput(message));
                }
                warnings.push(message);
            }
        }

        let same_parent: Vec<&WorkItem> = siblings.iter().filter(|i| i.parent_id == new_item.parent_id).collect();
        let next_sequence = same_parent.iter().map(|i| i.sequence_number).max().unwrap_or(0) + 1;
        let next_order = same_parent.iter().map(|i| i.order_index).max().unwrap_or(-1) + 1;

        let embedding = self.embed_item_text(&new_item.title, &new_item.description).await?;
        let now = Utc::now().to_rfc3339();

        let item = WorkItem {
            id: Uuid::new_v4().to_string(),
            namespace: namespace.clone(),
            item_type: new_item.item_type,
            title: new_item.title,
            description: new_item.description,
            status: crate::model::WorkItemStatus::NotStarted,
            priority: new_item.priority,
            parent_id: new_item.parent_id,
            sequence_number: next_sequence,
            order_index: next_order,
            progress_percentage: 0,
            complexity: new_item.complexity,
            context_tags: new_item.context_tags,
            acceptance_criteria: new_item.acceptance_criteria,
            effort_estimate: new_item.effort_estimate,
            tags: new_item.tags,
            assignee: new_item.assignee,
            created_at: now.clone(),
            updated_at: now,
            embedding: Some(embedding),
        };

        self.adapter
            .upsert(namespace, Table::WorkItem, vec![item_to_row(&item)?])
            .await?;

        Ok(WorkItemOutcome { item, warnings })
    }

    /// Apply `patch` to the item identified by `id`.
    pub async fn update(&self, namespace: &Namespace, id: &str, patch: WorkItemPatch) -> WorkItemResult<WorkItemOutcome> {
        let mut item = self.fetch_item(namespace, id).await?;
        let mut warnings = Vec::new();
        let mut text_changed = false;

        if let Some(title) = patch.title {
            if title.trim().is_empty() || title.len() > 200 {
                return Err(WorkItemError::InvalidInput(
                    "title must be non-empty and at most 200 characters".to_string(),
                ));
            }
            text_changed |= title != item.title;
            item.title = title;
        }
        if let Some(description) = patch.description {
            if description.len() > 10_000 {
                return Err(WorkItemError::InvalidInput(
                    "description must be at most 10000 characters".to_string(),
                ));
            }
            text_changed |= description != item.description;
            item.description = description;
        }
        if let Some(status) = patch.status {
            item.status = status;
        }
        if let Some(priority) = patch.priority {
            item.priority = priority;
        }
        if let Some(complexity) = patch.complexity {
            item.complexity = complexity;
        }
        if let Some(context_tags) = patch.context_tags {
            item.context_tags = context_tags;
        }
        if let Some(acceptance_criteria) = patch.acceptance_criteria {
            item.acceptance_criteria = acceptance_criteria;
        }
        if let Some(effort_estimate) = patch.effort_estimate {
            item.effort_estimate = Some(effort_estimate);
        }
        if let Some(tags) = patch.tags {
            item.tags = tags;
        }
        if let Some(assignee) = patch.assignee {
            item.assignee = Some(assignee);
        }

        if let Some(parent_id) = &item.parent_id {
            if let Ok(parent) = self.fetch_item(namespace, parent_id).await {
                if item.item_type.rank() < parent.item_type.rank() {
                    warnings.push(format!(
                        "child type {:?} outranks parent type {:?}",
                        item.item_type, parent.item_type
                    ));
                }
            }
        }

        if text_changed {
            item.embedding = Some(self.embed_item_text(&item.title, &item.description).await?);
        }
        item.updated_at = Utc::now().to_rfc3339();

        self.adapter
            .upsert(namespace, Table::WorkItem, vec![item_to_row(&item)?])
            .await?;

        Ok(WorkItemOutcome { item, warnings })
    }

    /// Delete `id`, handling its children per `mode` and removing its dependency edges.
    pub async fn delete(&self, namespace: &Namespace, id: &str, mode: DeleteMode) -> WorkItemResult<()> {
        let _guard = self.write_lock(namespace).lock().await;
        let item = self.fetch_item(namespace, id).await?;
        let all = self.all_items(namespace).await?;
        let children_index = graph::children_index(&all);
        let direct_children = children_index.get(&Some(id.to_string())).cloned().unwrap_or_default();

        match mode {
            DeleteMode::ReparentChildren => {
                for child_id in &direct_children {
                    if let Ok(mut child) = self.fetch_item(namespace, child_id).await {
                        child.parent_id = item.parent_id.clone();
                        child.updated_at = Utc::now().to_rfc3339();
                        self.adapter
                            .upsert(namespace, Table::WorkItem, vec![item_to_row(&child)?])
                            .await?;
                    }
                }
            }
            DeleteMode::DeleteDescendants => {
                let mut to_delete = vec![id.to_string()];
                let mut frontier = direct_children;
                while let Some(next_id) = frontier.pop() {
                    to_delete.push(next_id.clone());
                    if let Some(grandchildren) = children_index.get(&Some(next_id)) {
                        frontier.extend(grandchildren.iter().cloned());
                    }
                }
                for doomed in &to_delete[1..] {
                    self.adapter
                        .delete(namespace, Table::WorkItem, Filter::all().eq("id", doomed.as_str()))
                        .await?;
                    self.remove_edges_touching(namespace, doomed).await?;
                }
            }
        }

        self.adapter
            .delete(namespace, Table::WorkItem, Filter::all().eq("id", id))
            .await?;
        self.remove_edges_touching(namespace, id).await?;
        Ok(())
    }

    async fn remove_edges_touching(&self, namespace: &Namespace, item_id: &str) -> WorkItemResult<()> {
        let edges = self.all_blocks_edges(namespace).await?;
        for edge in edges.into_iter().filter(|e| e.source_id == item_id || e.target_id == item_id) {
            self.adapter
                .delete(namespace, Table::WorkItemDependency, Filter::all().eq("id", edge.id.as_str()))
                .await?;
        }
        Ok(())
    }

    /// Resolve a flexible identifier: exact id, then case-insensitive exact title, then
    /// top-1 semantic similarity above the configured minimum score.
    pub async fn get(&self, namespace: &Namespace, identifier: &str) -> WorkItemResult<WorkItem> {
        if let Some(row) = self.adapter.get(namespace, Table::WorkItem, identifier).await? {
            return row_to_item(row);
        }

        let needle = identifier.to_lowercase();
        let all = self.all_items(namespace).await?;
        if let Some(item) = all.into_iter().find(|i| i.title.to_lowercase() == needle) {
            return Ok(item);
        }

        let hits = jive_search::search(
            &self.adapter,
            &self.embedder,
            namespace,
            Table::WorkItem,
            &TextFields::work_item(),
            identifier,
            Filter::all(),
            SearchType::Semantic,
            &SearchOptions {
                similarity_threshold: self.config.get_min_score,
                limit: 1,
                include_score: true,
            },
        )
        .await?;

        hits.into_iter()
            .next()
            .map(|hit| row_to_item(hit.row))
            .transpose()?
            .ok_or_else(|| WorkItemError::NotFound(identifier.to_string()))
    }

    /// Search work items via the shared search engine.
    pub async fn search(
        &self,
        namespace: &Namespace,
        query: &str,
        mode: SearchType,
        options: &SearchOptions,
    ) -> WorkItemResult<Vec<RankedRow>> {
        let hits = jive_search::search(
            &self.adapter,
            &self.embedder,
            namespace,
            Table::WorkItem,
            &TextFields::work_item(),
            query,
            Filter::all(),
            mode,
            options,
        )
        .await?;
        Ok(hits)
    }

    /// List items matching `filter`, sorted by `sort_field` with `order_index`/`created_at`
    /// tie-breaks, then paginated.
    pub async fn list(
        &self,
        namespace: &Namespace,
        filter: &WorkItemListFilter,
        sort_field: crate::query::SortField,
        descending: bool,
        limit: usize,
        offset: usize,
    ) -> WorkItemResult<Vec<WorkItem>> {
        let mut items = self.all_items(namespace).await?;
        items.retain(|item| {
            filter.item_type.is_none_or(|t| t == item.item_type)
                && filter.status.is_none_or(|s| s == item.status)
                && filter.priority.is_none_or(|p| p == item.priority)
                && filter
                    .parent_id
                    .as_ref()
                    .is_none_or(|p| p == &item.parent_id)
                && filter.tag.as_ref().is_none_or(|t| item.tags.contains(t) || item.context_tags.contains(t))
        });

        items.sort_by(|a, b| {
            use crate::query::SortField::{CreatedAt, Priority, SequenceNumber, UpdatedAt};
            let primary = match sort_field {
                CreatedAt => a.created_at.cmp(&b.created_at),
                UpdatedAt => a.updated_at.cmp(&b.updated_at),
                Priority => (a.priority as u8).cmp(&(b.priority as u8)),
                SequenceNumber => a.sequence_number.cmp(&b.sequence_number),
            };
            primary
                .then_with(|| a.order_index.cmp(&b.order_index))
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        if descending {
            items.reverse();
        }

        Ok(items.into_iter().skip(offset).take(limit).collect())
    }

    /// Direct or recursive children of `id`, depth-first, preserving sibling `order_index`.
    pub async fn get_children(
        &self,
        namespace: &Namespace,
        id: &str,
        recursive: bool,
        max_depth: Option<usize>,
    ) -> WorkItemResult<Vec<WorkItem>> {
        let all = self.all_items(namespace).await?;
        let by_id: HashMap<String, WorkItem> = all.iter().map(|i| (i.id.clone(), i.clone())).collect();
        let index = graph::children_index(&all);

        let mut result = Vec::new();
        let mut stack: Vec<(String, usize)> = index
            .get(&Some(id.to_string()))
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .rev()
            .map(|child| (child, 1))
            .collect();

        while let Some((child_id, depth)) = stack.pop() {
            if let Some(child) = by_id.get(&child_id) {
                result.push(child.clone());
            }
            if recursive && max_depth.is_none_or(|max| depth < max) {
                if let Some(grandchildren) = index.get(&Some(child_id)) {
                    stack.extend(grandchildren.iter().rev().map(|gc| (gc.clone(), depth + 1)));
                }
            }
        }
        Ok(result)
    }

    /// Chain from root to `id`'s immediate parent.
    pub async fn get_ancestors(&self, namespace: &Namespace, id: &str) -> WorkItemResult<Vec<WorkItem>> {
        let all = self.all_items(namespace).await?;
        let by_id: HashMap<String, WorkItem> = all.into_iter().map(|i| (i.id.clone(), i)).collect();
        let chain = graph::ancestor_chain(&by_id, id);
        Ok(chain.into_iter().filter_map(|ancestor_id| by_id.get(&ancestor_id).cloned()).collect())
    }

    /// Add a dependency edge, normalizing `blocked_by` to `blocks` and rejecting cycles.
    pub async fn add_dependency(
        &self,
        namespace: &Namespace,
        source_id: &str,
        target_id: &str,
        dependency_type: DependencyType,
    ) -> WorkItemResult<WorkItemDependency> {
        let _guard = self.write_lock(namespace).lock().await;

        let (effective_source, effective_target, effective_type) = normalize(source_id, target_id, dependency_type);

        let existing = self.all_blocks_edges(namespace).await?;
        if let Some(found) = existing.iter().find(|e| {
            e.source_id == effective_source && e.target_id == effective_target && e.dependency_type == effective_type
        }) {
            return Ok(found.clone());
        }

        if effective_type == DependencyType::Blocks {
            if let Some(cycle) = graph::find_cycle(&existing, &effective_source, &effective_target) {
                return Err(WorkItemError::CycleDetected(cycle));
            }
        }

        let edge = WorkItemDependency {
            id: Uuid::new_v4().to_string(),
            namespace: namespace.clone(),
            source_id: effective_source,
            target_id: effective_target,
            dependency_type: effective_type,
            created_at: Utc::now().to_rfc3339(),
        };
        self.adapter
            .upsert(namespace, Table::WorkItemDependency, vec![dependency_to_row(&edge)?])
            .await?;
        Ok(edge)
    }

    /// Remove a dependency edge; succeeds even if no matching edge exists.
    pub async fn remove_dependency(
        &self,
        namespace: &Namespace,
        source_id: &str,
        target_id: &str,
        dependency_type: DependencyType,
    ) -> WorkItemResult<()> {
        let (effective_source, effective_target, effective_type) = normalize(source_id, target_id, dependency_type);
        let existing = self.all_blocks_edges(namespace).await?;
        for edge in existing.into_iter().filter(|e| {
            e.source_id == effective_source && e.target_id == effective_target && e.dependency_type == effective_type
        }) {
            self.adapter
                .delete(namespace, Table::WorkItemDependency, Filter::all().eq("id", edge.id.as_str()))
                .await?;
        }
        Ok(())
    }

    /// Edges touching `id` in the requested `direction`; `transitive` performs a bounded BFS.
    pub async fn get_dependencies(
        &self,
        namespace: &Namespace,
        id: &str,
        direction: Direction,
        transitive: bool,
    ) -> WorkItemResult<Vec<WorkItemDependency>> {
        let edges = self.all_blocks_edges(namespace).await?;
        if !transitive {
            return Ok(edges
                .into_iter()
                .filter(|e| direction_matches(e, id, direction))
                .collect());
        }

        let mut visited = std::collections::HashSet::new();
        let mut frontier = vec![id.to_string()];
        let mut reachable = Vec::new();
        let mut hops = 0;

        while !frontier.is_empty() && hops < self.config.max_dependency_hops {
            let mut next_frontier = Vec::new();
            for node in &frontier {
                for edge in &edges {
                    let matches = match direction {
                        Direction::Out => &edge.source_id == node,
                        Direction::In => &edge.target_id == node,
                        Direction::Both => &edge.source_id == node || &edge.target_id == node,
                    };
                    if matches && visited.insert(edge.id.clone()) {
                        reachable.push(edge.clone());
                        let other = if &edge.source_id == node { &edge.target_id } else { &edge.source_id };
                        next_frontier.push(other.clone());
                    }
                }
            }
            frontier = next_frontier;
            hops += 1;
        }
        Ok(reachable)
    }

    /// Find cycles, orphaned items, and dangling edges; self-heals by deleting dangling edges.
    pub async fn validate_graph(&self, namespace: &Namespace, scope: ValidationScope) -> WorkItemResult<Vec<GraphViolation>> {
        let all = self.all_items(namespace).await?;
        let by_id: HashMap<String, WorkItem> = all.iter().map(|i| (i.id.clone(), i.clone())).collect();
        let in_scope: std::collections::HashSet<String> = match &scope {
            ValidationScope::Namespace => all.iter().map(|i| i.id.clone()).collect(),
            ValidationScope::Subtree(root) => {
                let mut set = std::collections::HashSet::new();
                set.insert(root.clone());
                for child in self.get_children(namespace, root, true, None).await? {
                    set.insert(child.id);
                }
                set
            }
        };

        let mut violations = Vec::new();

        for item in &all {
            if !in_scope.contains(&item.id) {
                continue;
            }
            if let Some(parent_id) = &item.parent_id {
                if !by_id.contains_key(parent_id) {
                    violations.push(GraphViolation::OrphanedItem {
                        item_id: item.id.clone(),
                        missing_parent_id: parent_id.clone(),
                    });
                }
            }
        }

        let edges = self.all_blocks_edges(namespace).await?;
        for edge in &edges {
            if !in_scope.contains(&edge.source_id) && !in_scope.contains(&edge.target_id) {
                continue;
            }
            let source_missing = !by_id.contains_key(&edge.source_id);
            let target_missing = !by_id.contains_key(&edge.target_id);
            if source_missing || target_missing {
                let missing_endpoint_id = if source_missing { edge.source_id.clone() } else { edge.target_id.clone() };
                self.adapter
                    .delete(namespace, Table::WorkItemDependency, Filter::all().eq("id", edge.id.as_str()))
                    .await?;
                violations.push(GraphViolation::DanglingEdge {
                    edge_id: edge.id.clone(),
                    missing_endpoint_id,
                });
            }
        }

        let blocks_only: Vec<WorkItemDependency> = edges
            .into_iter()
            .filter(|e| e.dependency_type == DependencyType::Blocks && by_id.contains_key(&e.source_id) && by_id.contains_key(&e.target_id))
            .collect();
        let mut seen_cycle_nodes = std::collections::HashSet::new();
        for edge in &blocks_only {
            if seen_cycle_nodes.contains(&edge.source_id) {
                continue;
            }
            if let Some(cycle) = graph::find_cycle(&blocks_only, &edge.source_id, &edge.target_id) {
                seen_cycle_nodes.extend(cycle.iter().cloned());
                violations.push(GraphViolation::Cycle(cycle));
            }
        }

        Ok(violations)
    }

    /// Move `item_id` under `new_parent` at sibling position `new_index`, renumbering only
    /// the affected siblings.
    pub async fn reorder(
        &self,
        namespace: &Namespace,
        item_id: &str,
        new_parent: Option<String>,
        new_index: i64,
    ) -> WorkItemResult<()> {
        let _guard = self.write_lock(namespace).lock().await;

        let mut item = self.fetch_item(namespace, item_id).await?;
        if let Some(parent_id) = &new_parent {
            self.fetch_item(namespace, parent_id).await?;
        }

        let all = self.all_items(namespace).await?;
        let mut siblings: Vec<WorkItem> = all
            .into_iter()
            .filter(|i| i.parent_id == new_parent && i.id != item_id)
            .collect();
        siblings.sort_by_key(|i| i.order_index);

        let insert_at = usize::try_from(new_index.max(0)).unwrap_or(usize::MAX).min(siblings.len());
        item.parent_id = new_parent;
        item.order_index = i64::try_from(insert_at).unwrap_or(0);
        item.sequence_number = item.sequence_number.max(0);
        item.updated_at = Utc::now().to_rfc3339();

        let mut to_persist = vec![item];
        for (offset, mut sibling) in siblings.into_iter().enumerate() {
            let shifted_index = if offset >= insert_at { offset + 1 } else { offset };
            let shifted_index = i64::try_from(shifted_index).unwrap_or(sibling.order_index);
            if shifted_index != sibling.order_index {
                sibling.order_index = shifted_index;
                sibling.updated_at = Utc::now().to_rfc3339();
                to_persist.push(sibling);
            }
        }

        let rows: Vec<Row> = to_persist.iter().map(item_to_row).collect::<WorkItemResult<_>>()?;
        self.adapter.upsert(namespace, Table::WorkItem, rows).await?;
        Ok(())
    }

    /// Directly set `id`'s live `progress_percentage` (and optionally `status`), bypassing the
    /// generic `update` patch. Used by the progress engine's `track` operation.
    pub async fn set_progress(
        &self,
        namespace: &Namespace,
        id: &str,
        progress_percentage: u8,
        status: Option<crate::model::WorkItemStatus>,
    ) -> WorkItemResult<WorkItem> {
        let mut item = self.fetch_item(namespace, id).await?;
        item.progress_percentage = progress_percentage;
        if let Some(status) = status {
            item.status = status;
        }
        item.updated_at = Utc::now().to_rfc3339();
        self.adapter
            .upsert(namespace, Table::WorkItem, vec![item_to_row(&item)?])
            .await?;
        Ok(item)
    }

    /// Fetch a single item by exact id; a thin public wrapper used by the progress engine.
    pub async fn get_by_id(&self, namespace: &Namespace, id: &str) -> WorkItemResult<WorkItem> {
        self.fetch_item(namespace, id).await
    }

    /// Recompute `id`'s `progress_percentage` as the effort-weighted average of its direct
    /// children (leaving it unchanged if it has none), persist, and return the new value.
    pub async fn rollup_progress(&self, namespace: &Namespace, id: &str) -> WorkItemResult<u8> {
        let mut item = self.fetch_item(namespace, id).await?;
        let children = self.get_children(namespace, id, false, None).await?;
        if children.is_empty() {
            return Ok(item.progress_percentage);
        }

        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for child in &children {
            let weight = child.effort_estimate.unwrap_or(1.0);
            weighted_sum += weight * f64::from(child.progress_percentage);
            total_weight += weight;
        }
        #[allow(clippy::cast_possible_truncation)]
        let rolled_up = if total_weight > 0.0 { (weighted_sum / total_weight).round() as u8 } else { 0 };

        item.progress_percentage = rolled_up;
        item.updated_at = Utc::now().to_rfc3339();
        self.adapter
            .upsert(namespace, Table::WorkItem, vec![item_to_row(&item)?])
            .await?;
        Ok(rolled_up)
    }

    /// Append a new `Running` execution log row for `work_item_id`. Advisory only: the server
    /// does not itself run anything, it just records that an execution was requested.
    pub async fn start_execution(&self, namespace: &Namespace, work_item_id: &str) -> WorkItemResult<crate::model::ExecutionLog> {
        let log = crate::model::ExecutionLog {
            id: Uuid::new_v4().to_string(),
            namespace: namespace.clone(),
            work_item_id: work_item_id.to_string(),
            state: crate::model::ExecutionState::Running,
            started_at: Utc::now().to_rfc3339(),
            ended_at: None,
            cancelled_at: None,
            error: None,
            artifacts: Vec::new(),
            notes: String::new(),
        };
        self.adapter
            .upsert(namespace, Table::ExecutionLog, vec![execution_log_to_row(&log)?])
            .await?;
        Ok(log)
    }

    /// Exact execution log lookup by its own `id`, as returned by `start_execution`.
    pub async fn get_execution(&self, namespace: &Namespace, execution_id: &str) -> WorkItemResult<crate::model::ExecutionLog> {
        self.adapter
            .get(namespace, Table::ExecutionLog, execution_id)
            .await?
            .map(row_to_execution_log)
            .transpose()?
            .ok_or_else(|| WorkItemError::NotFound(execution_id.to_string()))
    }

    /// Most recently started execution log row for `work_item_id`.
    pub async fn latest_execution(&self, namespace: &Namespace, work_item_id: &str) -> WorkItemResult<crate::model::ExecutionLog> {
        let rows = self
            .adapter
            .scan(namespace, Table::ExecutionLog, Filter::all(), Page::new(100_000, 0), None)
            .await?;
        rows.into_iter()
            .map(row_to_execution_log)
            .collect::<WorkItemResult<Vec<_>>>()?
            .into_iter()
            .filter(|log| log.work_item_id == work_item_id)
            .max_by(|a, b| a.started_at.cmp(&b.started_at))
            .ok_or_else(|| WorkItemError::NotFound(work_item_id.to_string()))
    }

    /// Mark the execution with the given `execution_id` as `cancelled`, setting both
    /// `cancelled_at` and `ended_at` to the same timestamp.
    pub async fn cancel_execution(&self, namespace: &Namespace, execution_id: &str) -> WorkItemResult<crate::model::ExecutionLog> {
        let mut log = self.get_execution(namespace, execution_id).await?;
        let now = Utc::now().to_rfc3339();
        log.state = crate::model::ExecutionState::Cancelled;
        log.ended_at = Some(now.clone());
        log.cancelled_at = Some(now);
        self.adapter
            .upsert(namespace, Table::ExecutionLog, vec![execution_log_to_row(&log)?])
            .await?;
        Ok(log)
    }
}

/// `ExecutionLog` has no `updated_at` of its own; mirror `started_at`/`ended_at` into it so it
/// satisfies the store's row model, the same way `ProgressEvent` mirrors `recorded_at`.
fn execution_log_to_row(log: &crate::model::ExecutionLog) -> WorkItemResult<Row> {
    let mut value = serde_json::to_value(log).map_err(|e| WorkItemError::InvalidInput(e.to_string()))?;
    if let Some(object) = value.as_object_mut() {
        let updated_at = log.ended_at.clone().unwrap_or_else(|| log.started_at.clone());
        object.insert("updated_at".to_string(), serde_json::Value::String(updated_at));
    }
    Row::from_value(value).map_err(WorkItemError::InvalidInput)
}

fn row_to_execution_log(row: Row) -> WorkItemResult<crate::model::ExecutionLog> {
    serde_json::from_value(row.into_value()).map_err(|e| WorkItemError::InvalidInput(e.to_string()))
}

fn normalize(source_id: &str, target_id: &str, dependency_type: DependencyType) -> (String, String, DependencyType) {
    match dependency_type {
        DependencyType::BlockedBy => (target_id.to_string(), source_id.to_string(), DependencyType::Blocks),
        other => (source_id.to_string(), target_id.to_string(), other),
    }
}

fn direction_matches(edge: &WorkItemDependency, id: &str, direction: Direction) -> bool {
    match direction {
        Direction::Out => edge.source_id == id,
        Direction::In => edge.target_id == id,
        Direction::Both => edge.source_id == id || edge.target_id == id,
    }
}

fn item_to_row(item: &WorkItem) -> WorkItemResult<Row> {
    let value = serde_json::to_value(item).map_err(|e| WorkItemError::InvalidInput(e.to_string()))?;
    Row::from_value(value).map_err(WorkItemError::InvalidInput)
}

fn row_to_item(row: Row) -> WorkItemResult<WorkItem> {
    serde_json::from_value(row.into_value()).map_err(|e| WorkItemError::InvalidInput(e.to_string()))
}

/// Dependency edges have no `updated_at` of their own (they're immutable once created); the
/// store's row model requires one for last-writer-wins, so we mirror `created_at` into it.
fn dependency_to_row(edge: &WorkItemDependency) -> WorkItemResult<Row> {
    let mut value = serde_json::to_value(edge).map_err(|e| WorkItemError::InvalidInput(e.to_string()))?;
    if let Some(object) = value.as_object_mut() {
        object.insert("updated_at".to_string(), serde_json::Value::String(edge.created_at.clone()));
    }
    Row::from_value(value).map_err(WorkItemError::InvalidInput)
}

fn row_to_dependency(row: Row) -> WorkItemResult<WorkItemDependency> {
    serde_json::from_value(row.into_value()).map_err(|e| WorkItemError::InvalidInput(e.to_string()))
}
