//! Per-tool JSON Schema validation (§6.2: unknown fields are rejected).
//!
//! Each of the eight tools gets a hand-written top-level schema covering every field any of
//! its actions accept; nested payload schemas for `item`/`patch` are generated from the
//! repository's own `NewWorkItem`/`WorkItemPatch`/etc. types via `schemars`, so a field added to
//! those structs is picked up here without a second edit.

use jsonschema::JSONSchema;
use jive_memory::ArchitectureItemPatch;
use schemars::schema_for;
use serde_json::{json, Value};

use crate::error::ServerError;

fn schema_value<T: schemars::JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({"type": "object"}))
}

/// Build the JSON Schema (draft-07, per `jsonschema`'s default) describing every argument one
/// of the eight closed tools accepts across all of its actions.
#[must_use]
pub fn tool_schema(tool_name: &str) -> Value {
    match tool_name {
        "jive_manage_work_item" => json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["create", "update", "delete"]},
                "item": schema_value::<jive_workitem::NewWorkItem>(),
                "id": {"type": "string"},
                "patch": schema_value::<jive_workitem::WorkItemPatch>(),
                "mode": {"type": "string", "enum": ["soft", "hard", "cascade"]},
                "namespace": {"type": "string"},
                "_meta": {"type": "object"},
            },
            "required": ["action"],
            "additionalProperties": false,
        }),
        "jive_get_work_item" => json!({
            "type": "object",
            "properties": {
                "identifier": {"type": "string"},
                "format": {"type": "string", "enum": ["minimal", "summary", "detailed"]},
                "namespace": {"type": "string"},
                "_meta": {"type": "object"},
            },
            "required": ["identifier"],
            "additionalProperties": false,
        }),
        "jive_search_content" => json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "search_type": {"type": "string", "enum": ["semantic", "keyword", "hybrid"]},
                "similarity_threshold": {"type": "number", "minimum": 0.0, "maximum": 1.0},
                "limit": {"type": "integer", "minimum": 1},
                "include_score": {"type": "boolean"},
                "table": {"type": "string", "enum": ["work_item", "architecture", "troubleshoot"]},
                "namespace": {"type": "string"},
                "_meta": {"type": "object"},
            },
            "required": ["query"],
            "additionalProperties": false,
        }),
        "jive_get_hierarchy" => json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["get", "add_dependency", "remove_dependency", "validate"]},
                "id": {"type": "string"},
                "relationship_type": {
                    "type": "string",
                    "enum": ["children", "descendants", "parents", "ancestors", "dependencies", "dependents", "full_hierarchy"],
                },
                "recursive": {"type": "boolean"},
                "max_depth": {"type": "integer", "minimum": 0},
                "transitive": {"type": "boolean"},
                "source_id": {"type": "string"},
                "target_id": {"type": "string"},
                "dependency_type": {"type": "string", "enum": ["blocks", "blocked_by", "related", "subtask_of"]},
                "scope": {"type": "string", "enum": ["namespace", "subtree"]},
                "namespace": {"type": "string"},
                "_meta": {"type": "object"},
            },
            "required": ["action"],
            "additionalProperties": false,
        }),
        "jive_execute_work_item" => json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["execute", "status", "cancel", "validate"]},
                "id": {"type": "string"},
                "execution_id": {"type": "string"},
                "namespace": {"type": "string"},
                "_meta": {"type": "object"},
            },
            "required": ["action", "id"],
            "additionalProperties": false,
        }),
        "jive_track_progress" => json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["track", "get_report", "get_status", "set_milestone", "get_analytics"]},
                "entity_id": {"type": "string"},
                "entity_type": {"type": "string"},
                "progress_percentage": {"type": "integer", "minimum": 0, "maximum": 100},
                "status": {"type": "string"},
                "notes": {"type": "string"},
                "blockers": {"type": "array", "items": {"type": "string"}},
                "group_by": {"type": "string", "enum": ["status", "priority", "item_type"]},
                "include_history": {"type": "boolean"},
                "milestone": {"type": "object"},
                "since": {"type": "string", "format": "date-time"},
                "until": {"type": "string", "format": "date-time"},
                "namespace": {"type": "string"},
                "_meta": {"type": "object"},
            },
            "required": ["action"],
            "additionalProperties": false,
        }),
        "jive_sync_data" => json!({
            "type": "object",
            "properties": {
                "action": {"type": "string", "enum": ["sync", "backup", "restore", "status", "validate"]},
                "file_path": {"type": "string"},
                "sync_direction": {"type": "string", "enum": ["db_to_file", "file_to_db", "bidirectional"]},
                "namespace": {"type": "string"},
                "_meta": {"type": "object"},
            },
            "required": ["action"],
            "additionalProperties": false,
        }),
        "jive_memory" => json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": [
                        "create", "update", "delete", "get", "list", "search", "get_context",
                        "match_problem", "export", "import", "export_batch", "import_batch",
                    ],
                },
                "memory_type": {"type": "string", "enum": ["architecture", "troubleshoot"]},
                "item": {
                    "anyOf": [
                        schema_value::<jive_memory::NewArchitectureItem>(),
                        schema_value::<jive_memory::NewTroubleshootItem>(),
                    ],
                },
                "slug": {"type": "string"},
                "patch": {
                    "anyOf": [
                        schema_value::<ArchitectureItemPatch>(),
                        schema_value::<jive_memory::TroubleshootItemPatch>(),
                    ],
                },
                "limit": {"type": "integer", "minimum": 1},
                "offset": {"type": "integer", "minimum": 0},
                "query": {"type": "string"},
                "search_type": {"type": "string", "enum": ["semantic", "keyword", "hybrid"]},
                "similarity_threshold": {"type": "number", "minimum": 0.0, "maximum": 1.0},
                "token_budget": {"type": "integer", "minimum": 1},
                "description": {"type": "string"},
                "document": {"type": "string"},
                "import_mode": {"type": "string", "enum": ["merge", "skip_existing"]},
                "slugs": {"type": "array", "items": {"type": "string"}},
                "documents": {"type": "array", "items": {"type": "string"}},
                "namespace": {"type": "string"},
                "_meta": {"type": "object"},
            },
            "required": ["action"],
            "additionalProperties": false,
        }),
        other => json!({"type": "object", "additionalProperties": true, "description": other}),
    }
}

/// Validate `arguments` against `tool_name`'s schema, mapping the first violation onto
/// [`ServerError::Validation`] with its JSON Pointer as the field path.
pub fn validate_arguments(tool_name: &str, arguments: &Value) -> Result<(), ServerError> {
    let schema = tool_schema(tool_name);
    let compiled = JSONSchema::compile(&schema)
        .map_err(|e| ServerError::Internal(format!("invalid schema for {tool_name}: {e}")))?;

    if let Err(mut errors) = compiled.validate(arguments) {
        if let Some(first) = errors.next() {
            return Err(ServerError::Validation {
                field: first.instance_path.to_string(),
                message: first.to_string(),
            });
        }
    }
    Ok(())
}
