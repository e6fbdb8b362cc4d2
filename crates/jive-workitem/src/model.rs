//! Data model: `WorkItem` and its satellite entities, field-for-field as specified.

use jive_core::Namespace;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Position of a work item in the initiative→epic→feature→story→task chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Broadest unit of work.
    Initiative,
    /// Sub-division of an initiative.
    Epic,
    /// Sub-division of an epic.
    Feature,
    /// Sub-division of a feature.
    Story,
    /// Leaf unit of work.
    Task,
}

impl ItemType {
    /// This type's rank in the initiative(0) > epic(1) > ... > task(4) chain.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Initiative => 0,
            Self::Epic => 1,
            Self::Feature => 2,
            Self::Story => 3,
            Self::Task => 4,
        }
    }
}

/// Lifecycle state of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    /// Not yet started.
    NotStarted,
    /// Actively being worked.
    InProgress,
    /// Finished.
    Completed,
    /// Stalled on an external condition.
    Blocked,
    /// Abandoned.
    Cancelled,
}

/// Relative urgency of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Lowest urgency.
    Low,
    /// Default urgency.
    Medium,
    /// Elevated urgency.
    High,
    /// Drop-everything urgency.
    Critical,
}

/// Rough estimate of implementation difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Near-zero effort.
    Trivial,
    /// Small, well-understood change.
    Simple,
    /// Typical-sized change.
    Moderate,
    /// Spans multiple subsystems.
    Complex,
    /// Requires design work before implementation.
    VeryComplex,
}

/// Relationship type of a [`WorkItemDependency`] edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// `source` must complete before `target` may start. The only type cycle-checked.
    Blocks,
    /// Inverse spelling of `Blocks`; normalized away on insert, never persisted.
    BlockedBy,
    /// Informational only.
    Related,
    /// Advisory duplicate of the parent relation.
    SubtaskOf,
}

/// State of an [`ExecutionLog`] row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    /// Scheduled but not yet running.
    Queued,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Aborted via `jive_execute_work_item(action=cancel)`.
    Cancelled,
}

/// Primary project-management entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Immutable primary key.
    pub id: String,
    /// Owning namespace.
    pub namespace: Namespace,
    /// Position in the initiative/epic/feature/story/task chain.
    pub item_type: ItemType,
    /// Non-empty, at most 200 characters.
    pub title: String,
    /// At most 10000 characters.
    pub description: String,
    /// Lifecycle state.
    pub status: WorkItemStatus,
    /// Urgency.
    pub priority: Priority,
    /// Parent item id, or `None` for a root.
    pub parent_id: Option<String>,
    /// Gap-permitted, unique within siblings of the same parent.
    pub sequence_number: i64,
    /// Monotone within siblings; drives list/tree ordering.
    pub order_index: i64,
    /// 0-100.
    pub progress_percentage: u8,
    /// Implementation difficulty estimate.
    pub complexity: Complexity,
    /// Free-form classification tags.
    pub context_tags: BTreeSet<String>,
    /// Ordered list of acceptance criteria.
    pub acceptance_criteria: Vec<String>,
    /// Estimated effort in hours.
    pub effort_estimate: Option<f64>,
    /// Free-form labels.
    pub tags: BTreeSet<String>,
    /// Owning individual, if assigned.
    pub assignee: Option<String>,
    /// RFC3339 UTC creation time.
    pub created_at: String,
    /// RFC3339 UTC last-modification time.
    pub updated_at: String,
    /// Computed from `title` + `description`; `None` until first embedded.
    pub embedding: Option<Vec<f32>>,
}

/// Fields a caller may supply when creating a work item; everything else is computed.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NewWorkItem {
    /// Kind of work item.
    pub item_type: ItemType,
    /// Title, validated non-empty and `<= 200` chars by the repository.
    pub title: String,
    /// Description, validated `<= 10000` chars by the repository.
    #[serde(default)]
    pub description: String,
    /// Parent item id.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Urgency; defaults to `medium`.
    #[serde(default)]
    pub priority: Priority,
    /// Difficulty estimate; defaults to `moderate`.
    #[serde(default)]
    pub complexity: Complexity,
    /// Classification tags.
    #[serde(default)]
    pub context_tags: BTreeSet<String>,
    /// Acceptance criteria.
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    /// Estimated effort in hours.
    #[serde(default)]
    pub effort_estimate: Option<f64>,
    /// Free-form labels.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Assignee, if known at creation time.
    #[serde(default)]
    pub assignee: Option<String>,
}

impl Default for ItemType {
    fn default() -> Self {
        Self::Task
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Self::Moderate
    }
}

/// Patch applied by `update`; every field is optional, `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct WorkItemPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<WorkItemStatus>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New complexity estimate. Re-parenting is not part of this patch; it goes through
    /// `reorder`, which also renumbers affected siblings.
    pub complexity: Option<Complexity>,
    /// Replaces the whole set.
    pub context_tags: Option<BTreeSet<String>>,
    /// Replaces the whole list.
    pub acceptance_criteria: Option<Vec<String>>,
    /// New effort estimate.
    pub effort_estimate: Option<f64>,
    /// Replaces the whole set.
    pub tags: Option<BTreeSet<String>>,
    /// New assignee.
    pub assignee: Option<String>,
}

/// Edge in the dependency DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemDependency {
    /// Primary key.
    pub id: String,
    /// Owning namespace.
    pub namespace: Namespace,
    /// Edge origin.
    pub source_id: String,
    /// Edge destination.
    pub target_id: String,
    /// Always normalized to `Blocks` before persistence (never stored as `BlockedBy`).
    pub dependency_type: DependencyType,
    /// RFC3339 UTC creation time.
    pub created_at: String,
}

/// Append-only row recording one execution attempt of a work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLog {
    /// Primary key.
    pub id: String,
    /// Owning namespace.
    pub namespace: Namespace,
    /// The executed work item.
    pub work_item_id: String,
    /// Current execution state.
    pub state: ExecutionState,
    /// RFC3339 UTC start time.
    pub started_at: String,
    /// RFC3339 UTC end time, if finished.
    pub ended_at: Option<String>,
    /// RFC3339 UTC time `cancel` was requested, if `state == Cancelled`. Distinct from
    /// `ended_at`, which this call also sets, since a cancellation always "ends" the run.
    pub cancelled_at: Option<String>,
    /// Error message, if `state == Failed`.
    pub error: Option<String>,
    /// Paths/URIs of artifacts produced.
    pub artifacts: Vec<String>,
    /// Free-form notes.
    pub notes: String,
}

/// Append-only row recording a progress update against any entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Primary key.
    pub id: String,
    /// Owning namespace.
    pub namespace: Namespace,
    /// The entity this event describes.
    pub entity_id: String,
    /// Kind of entity (`"work_item"`, `"milestone"`, ...).
    pub entity_type: String,
    /// 0-100.
    pub progress_percentage: u8,
    /// Status string at the time of recording.
    pub status: String,
    /// Free-form notes.
    pub notes: String,
    /// Active blockers at the time of recording.
    pub blockers: Vec<String>,
    /// RFC3339 UTC recording time.
    pub recorded_at: String,
}

/// A target checkpoint spanning a set of work items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Primary key.
    pub id: String,
    /// Owning namespace.
    pub namespace: Namespace,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Free-form classification.
    pub milestone_type: String,
    /// RFC3339 UTC target date.
    pub target_date: String,
    /// Work items whose completion gates this milestone.
    pub associated_work_item_ids: Vec<String>,
    /// Human-readable success criteria.
    pub success_criteria: Vec<String>,
    /// Urgency.
    pub priority: Priority,
    /// RFC3339 UTC creation time.
    pub created_at: String,
}
