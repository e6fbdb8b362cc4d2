//! Supporting types for repository queries and mutations that don't belong on the entities
//! themselves: filters, outcomes, and graph-validation reports.

use serde::{Deserialize, Serialize};

use crate::model::{ItemType, Priority, WorkItem, WorkItemStatus};

/// Scalar filters accepted by `list`. Every field is AND-combined; absent fields are unfiltered.
#[derive(Debug, Clone, Default)]
pub struct WorkItemListFilter {
    /// Restrict to this type.
    pub item_type: Option<ItemType>,
    /// Restrict to this status.
    pub status: Option<WorkItemStatus>,
    /// Restrict to this priority.
    pub priority: Option<Priority>,
    /// Restrict to direct children of this parent; `Some(None)` restricts to roots.
    pub parent_id: Option<Option<String>>,
    /// Restrict to items carrying this tag.
    pub tag: Option<String>,
}

/// Field to sort `list` results on, before the `order_index`/`created_at` tie-break chain.
#[derive(Debug, Clone, Copy)]
pub enum SortField {
    /// Sort by `created_at`.
    CreatedAt,
    /// Sort by `updated_at`.
    UpdatedAt,
    /// Sort by `priority`.
    Priority,
    /// Sort by `sequence_number`.
    SequenceNumber,
}

/// A successful mutation plus any soft-invariant warnings it produced (e.g. a relaxed
/// `item_type` ordering violation).
#[derive(Debug, Clone)]
pub struct WorkItemOutcome {
    /// The resulting row.
    pub item: WorkItem,
    /// Non-fatal issues the caller should surface.
    pub warnings: Vec<String>,
}

/// `delete` behavior for a work item's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// Children are re-parented to the deleted item's parent (or made roots). Default.
    ReparentChildren,
    /// Children and all their descendants are deleted too.
    DeleteDescendants,
}

/// Which edges to consider relative to a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Edges where the item is the target (things blocking it).
    In,
    /// Edges where the item is the source (things it blocks).
    Out,
    /// Both directions.
    Both,
}

/// Scope over which `validate_graph` inspects the stored data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationScope {
    /// A single item's subtree, rooted at the given id.
    Subtree(String),
    /// The entire namespace.
    Namespace,
}

/// One structural problem found by `validate_graph`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphViolation {
    /// A cycle in the `blocks` subgraph.
    Cycle(Vec<String>),
    /// An item whose `parent_id` does not resolve to an existing item.
    OrphanedItem {
        /// The orphan's id.
        item_id: String,
        /// The missing parent id it referenced.
        missing_parent_id: String,
    },
    /// A dependency edge referencing a missing item; self-healed by deleting the edge.
    DanglingEdge {
        /// The edge's id (now deleted).
        edge_id: String,
        /// The endpoint id that no longer exists.
        missing_endpoint_id: String,
    },
}
