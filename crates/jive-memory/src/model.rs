//! Data model: `ArchitectureItem` and `TroubleshootItem`, field-for-field as specified.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use jive_core::Namespace;

/// Which memory table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryType {
    /// `ArchitectureItem` rows.
    Architecture,
    /// `TroubleshootItem` rows.
    Troubleshoot,
}

/// A piece of reusable architectural knowledge, addressed by `unique_slug` rather than a UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureItem {
    /// Primary key within the namespace; kebab-case, `[a-z0-9-]+`.
    pub unique_slug: String,
    /// Owning namespace.
    pub namespace: Namespace,
    /// Title.
    pub title: String,
    /// Situations where this architecture applies.
    pub ai_when_to_use: Vec<String>,
    /// Full requirements, in markdown.
    pub ai_requirements: String,
    /// Slugs of items that elaborate on this one.
    pub children_slugs: Vec<String>,
    /// Slugs of loosely related items.
    pub related_slugs: Vec<String>,
    /// Work-item ids this architecture is realized by.
    pub linked_epic_ids: Vec<String>,
    /// Free-text search keywords.
    pub keywords: Vec<String>,
    /// Free-form classification tags.
    pub tags: Vec<String>,
    /// Computed from `title` + `ai_requirements` + `keywords`; `None` until first embedded.
    pub embedding: Option<Vec<f32>>,
    /// RFC3339 UTC creation time.
    pub created_at: String,
    /// RFC3339 UTC last-modification time.
    pub updated_at: String,
}

/// Fields a caller may supply when creating an architecture item.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NewArchitectureItem {
    /// Desired slug; validated against `[a-z0-9-]+` by the repository.
    pub unique_slug: String,
    /// Title.
    pub title: String,
    /// Situations where this architecture applies.
    #[serde(default)]
    pub ai_when_to_use: Vec<String>,
    /// Full requirements, in markdown.
    #[serde(default)]
    pub ai_requirements: String,
    /// Slugs of items that elaborate on this one.
    #[serde(default)]
    pub children_slugs: Vec<String>,
    /// Slugs of loosely related items.
    #[serde(default)]
    pub related_slugs: Vec<String>,
    /// Work-item ids this architecture is realized by.
    #[serde(default)]
    pub linked_epic_ids: Vec<String>,
    /// Free-text search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Free-form classification tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Patch applied by `update`; every field is optional, `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ArchitectureItemPatch {
    /// New title.
    pub title: Option<String>,
    /// Replaces the whole list.
    pub ai_when_to_use: Option<Vec<String>>,
    /// New requirements text.
    pub ai_requirements: Option<String>,
    /// Replaces the whole list.
    pub children_slugs: Option<Vec<String>>,
    /// Replaces the whole list.
    pub related_slugs: Option<Vec<String>>,
    /// Replaces the whole list.
    pub linked_epic_ids: Option<Vec<String>>,
    /// Replaces the whole list.
    pub keywords: Option<Vec<String>>,
    /// Replaces the whole list.
    pub tags: Option<Vec<String>>,
}

/// A known problem/resolution pair, addressed by `unique_slug` rather than a UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TroubleshootItem {
    /// Primary key within the namespace; kebab-case, `[a-z0-9-]+`.
    pub unique_slug: String,
    /// Owning namespace.
    pub namespace: Namespace,
    /// Title.
    pub title: String,
    /// Markdown describing the problem, including error signatures.
    pub ai_use_case: String,
    /// Markdown of ordered resolution steps.
    pub ai_solutions: String,
    /// Free-text search keywords.
    pub keywords: Vec<String>,
    /// Free-form classification tags.
    pub tags: Vec<String>,
    /// Times this item has been returned by `match_problem`.
    pub usage_count: u64,
    /// Times a caller has reported the suggested solution worked.
    pub success_count: u64,
    /// Computed from `title` + `ai_use_case` + `ai_solutions` + `keywords`; `None` until first
    /// embedded.
    pub embedding: Option<Vec<f32>>,
    /// RFC3339 UTC creation time.
    pub created_at: String,
    /// RFC3339 UTC last-modification time.
    pub updated_at: String,
}

/// Fields a caller may supply when creating a troubleshoot item.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NewTroubleshootItem {
    /// Desired slug; validated against `[a-z0-9-]+` by the repository.
    pub unique_slug: String,
    /// Title.
    pub title: String,
    /// Markdown describing the problem, including error signatures.
    #[serde(default)]
    pub ai_use_case: String,
    /// Markdown of ordered resolution steps.
    #[serde(default)]
    pub ai_solutions: String,
    /// Free-text search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Free-form classification tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Patch applied by `update`; every field is optional, `None` means "leave unchanged".
///
/// `record_success`, when `true`, increments `success_count` by one — the caller-reports-success
/// step from `match_problem`'s design, folded into the generic update rather than a ninth action.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TroubleshootItemPatch {
    /// New title.
    pub title: Option<String>,
    /// New problem description.
    pub ai_use_case: Option<String>,
    /// New resolution steps.
    pub ai_solutions: Option<String>,
    /// Replaces the whole list.
    pub keywords: Option<Vec<String>>,
    /// Replaces the whole list.
    pub tags: Option<Vec<String>>,
    /// Increments `success_count` by one when `true`.
    #[serde(default)]
    pub record_success: bool,
}

/// Result row from `match_problem`: the item plus its success-rate-boosted score.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedProblem {
    /// The matched item, with `usage_count` already incremented.
    pub item: TroubleshootItem,
    /// `base * boost`, per the memory repository's ranking formula.
    pub score: f32,
}

/// How `import`/`import_batch` resolves a slug that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Overwrite the existing item with the imported fields.
    Merge,
    /// Leave the existing item untouched and report it as skipped.
    SkipExisting,
}

/// Validate a user-facing slug against `^[a-z0-9-]+$`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
