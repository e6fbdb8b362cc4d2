//! Tool Dispatcher (C7): the eight closed MCP tools, each a map of `action -> handler`, wired
//! to the work-item and memory repositories.

use std::sync::Arc;
use std::time::Instant;

use jive_core::Namespace;
use jive_search::{SearchOptions, SearchType};
use jive_memory::{
    ArchitectureItemPatch, ImportMode, MemoryRepository, MemoryType, NewArchitectureItem,
    NewTroubleshootItem, TroubleshootItemPatch,
};
use jive_workitem::{
    DeleteMode, Direction, NewWorkItem, ProgressEngine, SortField, ValidationScope,
    WorkItemListFilter, WorkItemPatch, WorkItemRepository,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ServerError;
use crate::namespace::{resolve as resolve_namespace, NamespaceSources};

/// The closed tool catalog; names are a stable contract (spec.md §6.2 equivalent).
pub const TOOL_NAMES: [&str; 8] = [
    "jive_manage_work_item",
    "jive_get_work_item",
    "jive_search_content",
    "jive_get_hierarchy",
    "jive_execute_work_item",
    "jive_track_progress",
    "jive_sync_data",
    "jive_memory",
];

/// The response envelope every tool call returns, success or failure (§7).
#[derive(Debug)]
pub enum ToolEnvelope {
    /// The handler returned a payload.
    Success {
        /// The handler's return value.
        data: Value,
        /// Wall-clock time spent in the handler.
        execution_time_ms: u128,
    },
    /// The handler raised an error, mapped onto the closed taxonomy.
    Failure {
        /// One of the taxonomy codes in [`ServerError::taxonomy_code`].
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
}

impl ToolEnvelope {
    fn ok(data: Value, started: Instant) -> Self {
        Self::Success { data, execution_time_ms: started.elapsed().as_millis() }
    }

    fn err(error: &ServerError) -> Self {
        Self::Failure { code: error.taxonomy_code(), message: error.to_string() }
    }

    /// Render as the canonical JSON envelope (`{"success": true, "data": ..., "metadata": ...}`
    /// or `{"success": false, "error": {...}}`).
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success { data, execution_time_ms } => json!({
                "success": true,
                "data": data,
                "metadata": { "execution_time_ms": execution_time_ms },
            }),
            Self::Failure { code, message } => json!({
                "success": false,
                "error": { "code": code, "message": message },
            }),
        }
    }
}

/// Reads a required string field out of a `Value` object, mapping absence to `VALIDATION_ERROR`.
fn require_str<'a>(arguments: &'a Value, field: &str) -> Result<&'a str, ServerError> {
    arguments
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ServerError::Validation { field: field.to_string(), message: "required string field missing".to_string() })
}

fn action_of(arguments: &Value) -> Result<&str, ServerError> {
    arguments
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| ServerError::InvalidAction("missing `action` field".to_string()))
}

fn parse_field<T: for<'de> Deserialize<'de>>(arguments: &Value, field: &str) -> Result<T, ServerError> {
    let value = arguments.get(field).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| ServerError::Validation { field: field.to_string(), message: e.to_string() })
}

fn optional_usize(arguments: &Value, field: &str, default: usize) -> usize {
    arguments.get(field).and_then(Value::as_u64).map_or(default, |v| v as usize)
}

/// Owns the repositories and dispatches `tools/call` requests to them.
pub struct ToolDispatcher {
    work_items: Arc<WorkItemRepository>,
    progress: Arc<ProgressEngine>,
    memory: Arc<MemoryRepository>,
    default_namespace: Namespace,
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher").field("default_namespace", &self.default_namespace).finish_non_exhaustive()
    }
}

impl ToolDispatcher {
    /// Build a dispatcher over the given repositories.
    #[must_use]
    pub fn new(
        work_items: Arc<WorkItemRepository>,
        progress: Arc<ProgressEngine>,
        memory: Arc<MemoryRepository>,
        default_namespace: Namespace,
    ) -> Self {
        Self { work_items, progress, memory, default_namespace }
    }

    /// Resolve the namespace, locate the tool, validate the action, and invoke the handler,
    /// wrapping the outcome in the standard envelope. Never panics or propagates a raw error;
    /// every failure becomes a [`ToolEnvelope::Failure`].
    pub async fn dispatch(&self, tool_name: &str, sources: &NamespaceSources, arguments: Value) -> ToolEnvelope {
        let started = Instant::now();
        let outcome = self.dispatch_inner(tool_name, sources, arguments).await;
        match outcome {
            Ok(data) => ToolEnvelope::ok(data, started),
            Err(error) => ToolEnvelope::err(&error),
        }
    }

    async fn dispatch_inner(&self, tool_name: &str, sources: &NamespaceSources, arguments: Value) -> Result<Value, ServerError> {
        if !arguments.is_object() {
            return Err(ServerError::Validation { field: "arguments".to_string(), message: "arguments must be a JSON object".to_string() });
        }
        crate::schema::validate_arguments(tool_name, &arguments)?;
        let mut sources = sources.clone();
        if sources.argument_namespace.is_none() {
            sources.argument_namespace = arguments.get("namespace").and_then(Value::as_str).map(str::to_string);
        }
        let namespace = resolve_namespace(&sources, &self.default_namespace)?;

        match tool_name {
            "jive_manage_work_item" => self.manage_work_item(&namespace, arguments).await,
            "jive_get_work_item" => self.get_work_item(&namespace, arguments).await,
            "jive_search_content" => self.search_content(&namespace, arguments).await,
            "jive_get_hierarchy" => self.get_hierarchy(&namespace, arguments).await,
            "jive_execute_work_item" => self.execute_work_item(&namespace, arguments).await,
            "jive_track_progress" => self.track_progress(&namespace, arguments).await,
            "jive_sync_data" => self.sync_data(&namespace, arguments).await,
            "jive_memory" => self.memory_tool(&namespace, arguments).await,
            other => Err(ServerError::ToolNotFound(other.to_string())),
        }
    }

    // ---- jive_manage_work_item: create, update, delete ---------------------------------------

    async fn manage_work_item(&self, namespace: &Namespace, arguments: Value) -> Result<Value, ServerError> {
        match action_of(&arguments)? {
            "create" => {
                let new_item: NewWorkItem = parse_field(&arguments, "item")?;
                let outcome = self.work_items.create(namespace, new_item).await?;
                Ok(json!({ "item": outcome.item, "warnings": outcome.warnings }))
            }
            "update" => {
                let id = require_str(&arguments, "id")?.to_string();
                let patch: WorkItemPatch = parse_field(&arguments, "patch")?;
                let outcome = self.work_items.update(namespace, &id, patch).await?;
                Ok(json!({ "item": outcome.item, "warnings": outcome.warnings }))
            }
            "delete" => {
                let id = require_str(&arguments, "id")?.to_string();
                let mode: DeleteMode = parse_field(&arguments, "mode")?;
                self.work_items.delete(namespace, &id, mode).await?;
                Ok(json!({ "deleted": id }))
            }
            other => Err(ServerError::InvalidAction(other.to_string())),
        }
    }

    // ---- jive_get_work_item: single action, `format` controls verbosity ----------------------

    async fn get_work_item(&self, namespace: &Namespace, arguments: Value) -> Result<Value, ServerError> {
        let identifier = require_str(&arguments, "identifier")?;
        let item = self.work_items.get(namespace, identifier).await?;
        let format = arguments.get("format").and_then(Value::as_str).unwrap_or("detailed");
        let rendered = match format {
            "minimal" => json!({ "id": item.id, "title": item.title, "status": item.status }),
            "summary" => json!({
                "id": item.id,
                "title": item.title,
                "status": item.status,
                "priority": item.priority,
                "progress_percentage": item.progress_percentage,
            }),
            _ => serde_json::to_value(&item).map_err(|e| ServerError::Internal(e.to_string()))?,
        };
        Ok(rendered)
    }

    // ---- jive_search_content: single action, `search_type` controls mode ---------------------

    async fn search_content(&self, namespace: &Namespace, arguments: Value) -> Result<Value, ServerError> {
        let query = require_str(&arguments, "query")?;
        let mode = match arguments.get("search_type").and_then(Value::as_str).unwrap_or("hybrid") {
            "semantic" => SearchType::Semantic,
            "keyword" => SearchType::Keyword,
            _ => SearchType::Hybrid,
        };
        let options = SearchOptions {
            similarity_threshold: arguments.get("similarity_threshold").and_then(Value::as_f64).unwrap_or(0.0) as f32,
            limit: optional_usize(&arguments, "limit", 10),
            include_score: arguments.get("include_score").and_then(Value::as_bool).unwrap_or(true),
        };

        let hits = match arguments.get("table").and_then(Value::as_str).unwrap_or("work_item") {
            "architecture" => self.memory.search(namespace, MemoryType::Architecture, query, mode, &options).await?,
            "troubleshoot" => self.memory.search(namespace, MemoryType::Troubleshoot, query, mode, &options).await?,
            _ => self.work_items.search(namespace, query, mode, &options).await?,
        };

        let results: Vec<Value> = hits
            .into_iter()
            .map(|hit| {
                let mut row = hit.row.into_value();
                if options.include_score {
                    if let Some(object) = row.as_object_mut() {
                        object.insert("score".to_string(), json!(hit.score));
                    }
                }
                row
            })
            .collect();
        Ok(json!({ "results": results }))
    }

    // ---- jive_get_hierarchy: get, add_dependency, remove_dependency, validate ----------------

    async fn get_hierarchy(&self, namespace: &Namespace, arguments: Value) -> Result<Value, ServerError> {
        match action_of(&arguments)? {
            "get" => {
                let id = require_str(&arguments, "id")?;
                let relationship = arguments.get("relationship_type").and_then(Value::as_str).unwrap_or("children");
                match relationship {
                    "children" => {
                        let recursive = arguments.get("recursive").and_then(Value::as_bool).unwrap_or(false);
                        let max_depth = arguments.get("max_depth").and_then(Value::as_u64).map(|v| v as usize);
                        let children = self.work_items.get_children(namespace, id, recursive, max_depth).await?;
                        Ok(json!({ "children": children }))
                    }
                    "descendants" => {
                        let children = self.work_items.get_children(namespace, id, true, None).await?;
                        Ok(json!({ "descendants": children }))
                    }
                    "parents" | "ancestors" => {
                        let ancestors = self.work_items.get_ancestors(namespace, id).await?;
                        Ok(json!({ "ancestors": ancestors }))
                    }
                    "dependencies" | "dependents" | "full_hierarchy" => {
                        let direction = match relationship {
                            "dependents" => Direction::In,
                            "dependencies" => Direction::Out,
                            _ => Direction::Both,
                        };
                        let transitive = arguments.get("transitive").and_then(Value::as_bool).unwrap_or(false);
                        let edges = self.work_items.get_dependencies(namespace, id, direction, transitive).await?;
                        Ok(json!({ "dependencies": edges }))
                    }
                    other => Err(ServerError::Validation {
                        field: "relationship_type".to_string(),
                        message: format!("unknown relationship_type: {other}"),
                    }),
                }
            }
            "add_dependency" => {
                let source = require_str(&arguments, "source_id")?.to_string();
                let target = require_str(&arguments, "target_id")?.to_string();
                let dep_type = parse_field(&arguments, "dependency_type")?;
                let edge = self.work_items.add_dependency(namespace, &source, &target, dep_type).await?;
                Ok(json!({ "dependency": edge }))
            }
            "remove_dependency" => {
                let source = require_str(&arguments, "source_id")?.to_string();
                let target = require_str(&arguments, "target_id")?.to_string();
                let dep_type = parse_field(&arguments, "dependency_type")?;
                self.work_items.remove_dependency(namespace, &source, &target, dep_type).await?;
                Ok(json!({ "removed": true }))
            }
            "validate" => {
                let scope = match arguments.get("scope").and_then(Value::as_str) {
                    Some("subtree") => ValidationScope::Subtree(require_str(&arguments, "id")?.to_string()),
                    _ => ValidationScope::Namespace,
                };
                let violations = self.work_items.validate_graph(namespace, scope).await?;
                Ok(json!({ "violations": violations.iter().map(|v| format!("{v:?}")).collect::<Vec<_>>() }))
            }
            other => Err(ServerError::InvalidAction(other.to_string())),
        }
    }

    // ---- jive_execute_work_item: execute, status, cancel, validate ---------------------------
    //
    // Execution is advisory: the server records an `ExecutionLog` row but does not itself run
    // anything (spec §5 notes the server does not own the executing agent).

    async fn execute_work_item(&self, namespace: &Namespace, arguments: Value) -> Result<Value, ServerError> {
        let id = require_str(&arguments, "id")?.to_string();
        match action_of(&arguments)? {
            "execute" => {
                self.work_items.get(namespace, &id).await?;
                let log = self.work_items.start_execution(namespace, &id).await?;
                Ok(json!({ "execution": log }))
            }
            "status" => {
                let log = match arguments.get("execution_id").and_then(Value::as_str) {
                    Some(execution_id) => self.work_items.get_execution(namespace, execution_id).await?,
                    None => self.work_items.latest_execution(namespace, &id).await?,
                };
                Ok(json!({ "execution": log }))
            }
            "cancel" => {
                let execution_id = match arguments.get("execution_id").and_then(Value::as_str) {
                    Some(execution_id) => execution_id.to_string(),
                    None => self.work_items.latest_execution(namespace, &id).await?.id,
                };
                let log = self.work_items.cancel_execution(namespace, &execution_id).await?;
                Ok(json!({ "execution": log, "cancelled_at": log.cancelled_at }))
            }
            "validate" => {
                self.work_items.get(namespace, &id).await?;
                Ok(json!({ "valid": true }))
            }
            other => Err(ServerError::InvalidAction(other.to_string())),
        }
    }

    // ---- jive_track_progress: track, get_report, set_milestone, get_analytics, get_status ----

    async fn track_progress(&self, namespace: &Namespace, arguments: Value) -> Result<Value, ServerError> {
        match action_of(&arguments)? {
            "track" => {
                let entity_id = require_str(&arguments, "entity_id")?.to_string();
                let entity_type = arguments.get("entity_type").and_then(Value::as_str).unwrap_or("work_item").to_string();
                let progress_percentage = arguments.get("progress_percentage").and_then(Value::as_u64).unwrap_or(0) as u8;
                let status = arguments.get("status").and_then(|v| serde_json::from_value(v.clone()).ok());
                let notes = arguments.get("notes").and_then(Value::as_str).unwrap_or_default().to_string();
                let blockers: Vec<String> = parse_field(&arguments, "blockers").unwrap_or_default();
                let event = self
                    .progress
                    .track(namespace, &entity_id, &entity_type, progress_percentage, status, notes, blockers)
                    .await?;
                Ok(json!({ "event": event }))
            }
            "get_report" | "get_status" => {
                let group_by = match arguments.get("group_by").and_then(Value::as_str) {
                    Some("priority") => jive_workitem::GroupBy::Priority,
                    Some("item_type") => jive_workitem::GroupBy::ItemType,
                    _ => jive_workitem::GroupBy::Status,
                };
                let include_history = arguments.get("include_history").and_then(Value::as_bool).unwrap_or(false);
                let report = self.progress.get_report(namespace, group_by, include_history).await?;
                Ok(json!({ "groups": report.groups.iter().map(|g| json!({
                    "key": g.key, "count": g.count, "average_progress": g.average_progress,
                })).collect::<Vec<_>>(), "history": report.history }))
            }
            "set_milestone" => {
                let milestone = parse_field(&arguments, "milestone")?;
                let outcome = self.progress.set_milestone(namespace, milestone).await?;
                Ok(json!({ "milestone": outcome.milestone, "days_to_target": outcome.days_to_target }))
            }
            "get_analytics" => {
                let period = jive_workitem::TimePeriod {
                    since: arguments.get("since").and_then(Value::as_str).and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok()).map(|d| d.with_timezone(&chrono::Utc)),
                    until: arguments.get("until").and_then(Value::as_str).and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok()).map(|d| d.with_timezone(&chrono::Utc)),
                };
                let analytics = self.progress.get_analytics(namespace, period).await?;
                Ok(serde_json::to_value(&analytics).map_err(|e| ServerError::Internal(e.to_string()))?)
            }
            other => Err(ServerError::InvalidAction(other.to_string())),
        }
    }

    // ---- jive_sync_data: sync, status, backup, restore, validate -----------------------------
    //
    // The file side of sync is a flat JSON array of work items at a caller-supplied path, the
    // simplest file representation consistent with §6.4's "one logical database per process".

    async fn sync_data(&self, namespace: &Namespace, arguments: Value) -> Result<Value, ServerError> {
        match action_of(&arguments)? {
            "sync" => {
                let path = require_str(&arguments, "file_path")?.to_string();
                let direction = arguments.get("sync_direction").and_then(Value::as_str).unwrap_or("db_to_file");
                match direction {
                    "file_to_db" => self.sync_file_to_db(namespace, &path).await,
                    "bidirectional" => {
                        self.sync_file_to_db(namespace, &path).await?;
                        self.sync_db_to_file(namespace, &path).await
                    }
                    _ => self.sync_db_to_file(namespace, &path).await,
                }
            }
            "backup" => {
                let path = require_str(&arguments, "file_path")?.to_string();
                self.sync_db_to_file(namespace, &path).await
            }
            "restore" => {
                let path = require_str(&arguments, "file_path")?.to_string();
                self.sync_file_to_db(namespace, &path).await
            }
            "status" => Ok(json!({ "namespace": namespace.as_str() })),
            "validate" => {
                let path = require_str(&arguments, "file_path")?;
                let valid = std::fs::read_to_string(path).ok().and_then(|s| serde_json::from_str::<Value>(&s).ok()).is_some();
                Ok(json!({ "valid": valid }))
            }
            other => Err(ServerError::InvalidAction(other.to_string())),
        }
    }

    async fn sync_db_to_file(&self, namespace: &Namespace, path: &str) -> Result<Value, ServerError> {
        let items = self.work_items.list(namespace, &WorkItemListFilter::default(), SortField::CreatedAt, false, 100_000, 0).await?;
        let count = items.len();
        let json = serde_json::to_string_pretty(&items).map_err(|e| ServerError::Internal(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| ServerError::Internal(e.to_string()))?;
        Ok(json!({ "written": count, "file_path": path }))
    }

    async fn sync_file_to_db(&self, namespace: &Namespace, path: &str) -> Result<Value, ServerError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ServerError::Internal(e.to_string()))?;
        let items: Vec<jive_workitem::WorkItem> = serde_json::from_str(&contents).map_err(|e| ServerError::Internal(e.to_string()))?;
        let mut imported = 0;
        for item in items {
            let new_item = NewWorkItem {
                item_type: item.item_type,
                title: item.title,
                description: item.description,
                parent_id: item.parent_id,
                priority: item.priority,
                complexity: item.complexity,
                context_tags: item.context_tags,
                acceptance_criteria: item.acceptance_criteria,
                effort_estimate: item.effort_estimate,
                tags: item.tags,
                assignee: item.assignee,
            };
            if self.work_items.create(namespace, new_item).await.is_ok() {
                imported += 1;
            }
        }
        Ok(json!({ "imported": imported, "file_path": path }))
    }

    // ---- jive_memory: the Memory Repository's full action set --------------------------------

    async fn memory_tool(&self, namespace: &Namespace, arguments: Value) -> Result<Value, ServerError> {
        let memory_type = match arguments.get("memory_type").and_then(Value::as_str).unwrap_or("architecture") {
            "troubleshoot" => MemoryType::Troubleshoot,
            _ => MemoryType::Architecture,
        };

        match action_of(&arguments)? {
            "create" => match memory_type {
                MemoryType::Architecture => {
                    let new_item: NewArchitectureItem = parse_field(&arguments, "item")?;
                    Ok(json!({ "item": self.memory.create_architecture(namespace, new_item).await? }))
                }
                MemoryType::Troubleshoot => {
                    let new_item: NewTroubleshootItem = parse_field(&arguments, "item")?;
                    Ok(json!({ "item": self.memory.create_troubleshoot(namespace, new_item).await? }))
                }
            },
            "update" => {
                let slug = require_str(&arguments, "slug")?.to_string();
                match memory_type {
                    MemoryType::Architecture => {
                        let patch: ArchitectureItemPatch = parse_field(&arguments, "patch")?;
                        Ok(json!({ "item": self.memory.update_architecture(namespace, &slug, patch).await? }))
                    }
                    MemoryType::Troubleshoot => {
                        let patch: TroubleshootItemPatch = parse_field(&arguments, "patch")?;
                        Ok(json!({ "item": self.memory.update_troubleshoot(namespace, &slug, patch).await? }))
                    }
                }
            }
            "delete" => {
                let slug = require_str(&arguments, "slug")?.to_string();
                self.memory.delete(namespace, memory_type, &slug).await?;
                Ok(json!({ "deleted": slug }))
            }
            "get" => {
                let slug = require_str(&arguments, "slug")?;
                match memory_type {
                    MemoryType::Architecture => Ok(json!({ "item": self.memory.get_architecture(namespace, slug).await? })),
                    MemoryType::Troubleshoot => Ok(json!({ "item": self.memory.get_troubleshoot(namespace, slug).await? })),
                }
            }
            "list" => {
                let limit = optional_usize(&arguments, "limit", 20);
                let offset = optional_usize(&arguments, "offset", 0);
                match memory_type {
                    MemoryType::Architecture => Ok(json!({ "items": self.memory.list_architecture(namespace, limit, offset).await? })),
                    MemoryType::Troubleshoot => Ok(json!({ "items": self.memory.list_troubleshoot(namespace, limit, offset).await? })),
                }
            }
            "search" => {
                let query = require_str(&arguments, "query")?;
                let mode = match arguments.get("search_type").and_then(Value::as_str).unwrap_or("hybrid") {
                    "semantic" => SearchType::Semantic,
                    "keyword" => SearchType::Keyword,
                    _ => SearchType::Hybrid,
                };
                let options = SearchOptions {
                    similarity_threshold: arguments.get("similarity_threshold").and_then(Value::as_f64).unwrap_or(0.0) as f32,
                    limit: optional_usize(&arguments, "limit", 10),
                    include_score: true,
                };
                let hits = self.memory.search(namespace, memory_type, query, mode, &options).await?;
                let results: Vec<Value> = hits.into_iter().map(|hit| {
                    let mut row = hit.row.into_value();
                    if let Some(object) = row.as_object_mut() {
                        object.insert("score".to_string(), json!(hit.score));
                    }
                    row
                }).collect();
                Ok(json!({ "results": results }))
            }
            "get_context" => {
                let slug = require_str(&arguments, "slug")?;
                let budget = arguments.get("token_budget").and_then(Value::as_u64).map(|v| v as usize);
                Ok(json!({ "context": self.memory.get_context(namespace, slug, budget).await? }))
            }
            "match_problem" => {
                let description = require_str(&arguments, "description")?.to_string();
                let limit = optional_usize(&arguments, "limit", 5);
                Ok(json!({ "matches": self.memory.match_problem(namespace, description, limit).await? }))
            }
            "export" => {
                let slug = require_str(&arguments, "slug")?;
                match memory_type {
                    MemoryType::Architecture => Ok(json!({ "document": self.memory.export_architecture(namespace, slug).await? })),
                    MemoryType::Troubleshoot => Ok(json!({ "document": self.memory.export_troubleshoot(namespace, slug).await? })),
                }
            }
            "import" => {
                let document = require_str(&arguments, "document")?.to_string();
                let mode = match arguments.get("import_mode").and_then(Value::as_str) {
                    Some("skip_existing") => ImportMode::SkipExisting,
                    _ => ImportMode::Merge,
                };
                match memory_type {
                    MemoryType::Architecture => Ok(json!({ "item": self.memory.import_architecture(namespace, &document, mode).await? })),
                    MemoryType::Troubleshoot => Ok(json!({ "item": self.memory.import_troubleshoot(namespace, &document, mode).await? })),
                }
            }
            "export_batch" => {
                let slugs: Vec<String> = parse_field(&arguments, "slugs")?;
                let results = self.memory.export_batch(namespace, memory_type, &slugs).await;
                Ok(json!({ "results": results.into_iter().map(envelope_result).collect::<Vec<_>>() }))
            }
            "import_batch" => {
                let docs: Vec<String> = parse_field(&arguments, "documents")?;
                let mode = match arguments.get("import_mode").and_then(Value::as_str) {
                    Some("skip_existing") => ImportMode::SkipExisting,
                    _ => ImportMode::Merge,
                };
                let results = self.memory.import_batch(namespace, memory_type, &docs, mode).await;
                Ok(json!({ "results": results.into_iter().map(envelope_result).collect::<Vec<_>>() }))
            }
            other => Err(ServerError::InvalidAction(other.to_string())),
        }
    }
}

/// Adapts one closed tool onto the generic [`crate::handlers::ToolHandler`] trait the
/// registry/router already know how to serve over `tools/call`.
pub struct JiveToolHandler {
    dispatcher: Arc<ToolDispatcher>,
    tool_name: &'static str,
}

impl JiveToolHandler {
    /// Build a handler bound to one tool name in the closed catalog.
    #[must_use]
    pub fn new(dispatcher: Arc<ToolDispatcher>, tool_name: &'static str) -> Self {
        Self { dispatcher, tool_name }
    }
}

#[async_trait::async_trait]
impl crate::handlers::ToolHandler for JiveToolHandler {
    async fn handle(
        &self,
        request: jive_protocol::types::CallToolRequest,
        ctx: jive_core::RequestContext,
    ) -> crate::error::ServerResult<jive_protocol::types::CallToolResult> {
        let arguments = request
            .arguments
            .map(|map| Value::Object(map.into_iter().collect()))
            .unwrap_or_else(|| json!({}));

        let sources = NamespaceSources {
            path_segment: ctx.get_metadata("path-namespace").and_then(Value::as_str).map(str::to_string),
            header: ctx.get_metadata("x-namespace").and_then(Value::as_str).map(str::to_string),
            meta_namespace: arguments
                .get("_meta")
                .and_then(|m| m.get("namespace"))
                .and_then(Value::as_str)
                .map(str::to_string),
            argument_namespace: None,
        };

        let envelope = self.dispatcher.dispatch(self.tool_name, &sources, arguments).await;
        let is_error = matches!(envelope, ToolEnvelope::Failure { .. });
        let rendered = envelope.to_json();
        let text = serde_json::to_string_pretty(&rendered).unwrap_or_else(|_| rendered.to_string());

        Ok(jive_protocol::types::CallToolResult {
            content: vec![jive_protocol::types::ContentBlock::Text(jive_protocol::types::TextContent {
                text,
                annotations: None,
                meta: None,
            })],
            is_error: Some(is_error),
        })
    }

    fn tool_definition(&self) -> jive_protocol::types::Tool {
        let schema = crate::schema::tool_schema(self.tool_name);
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect());

        jive_protocol::types::Tool {
            name: self.tool_name.to_string(),
            title: None,
            description: Some(format!("Jive project-management tool: {}", self.tool_name)),
            input_schema: jive_protocol::types::ToolInputSchema {
                schema_type: "object".to_string(),
                properties,
                required,
                additional_properties: Some(false),
            },
            output_schema: None,
            annotations: None,
            meta: None,
        }
    }
}

fn envelope_result<T: serde::Serialize>(outcome: Result<T, jive_memory::MemoryError>) -> Value {
    match outcome {
        Ok(value) => json!({ "success": true, "data": value }),
        Err(error) => {
            let server_error: ServerError = error.into();
            json!({ "success": false, "error": { "code": server_error.taxonomy_code(), "message": server_error.to_string() } })
        }
    }
}
