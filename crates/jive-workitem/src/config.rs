//! Ambient configuration for repository-level policy choices left open by the distilled spec.

use serde::{Deserialize, Serialize};

/// Tunables for the work-item repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkItemConfig {
    /// When `true`, a child whose `item_type` outranks its parent's (e.g. an epic under a
    /// story) is rejected with `VALIDATION_ERROR` at `create`/`update`. When `false` (default),
    /// the violation is reported in the response alongside a successful write.
    pub strict_type_order: bool,
    /// Maximum BFS hops for `get_dependencies(transitive = true)`.
    pub max_dependency_hops: usize,
    /// Minimum similarity score accepted by `get`'s vector-search fallback.
    pub get_min_score: f32,
}

impl Default for WorkItemConfig {
    fn default() -> Self {
        Self {
            strict_type_order: false,
            max_dependency_hops: 10,
            get_min_score: 0.5,
        }
    }
}
