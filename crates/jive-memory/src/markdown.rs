//! Markdown + YAML front-matter serialization for `export`/`import`.
//!
//! The front matter carries every scalar field (including `created_at`/`updated_at`, so a
//! round-tripped import recreates an item identical to the original); `namespace` and
//! `embedding` are not part of the document — the former is supplied by the caller's request
//! context, the latter is recomputed from the restored text fields. The body below the front
//! matter is a human-readable rendering only; `import` never reads it.

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};
use crate::model::{is_valid_slug, ArchitectureItem, TroubleshootItem};

#[derive(Debug, Serialize, Deserialize)]
struct ArchitectureFrontMatter {
    unique_slug: String,
    title: String,
    #[serde(default)]
    ai_when_to_use: Vec<String>,
    #[serde(default)]
    ai_requirements: String,
    #[serde(default)]
    children_slugs: Vec<String>,
    #[serde(default)]
    related_slugs: Vec<String>,
    #[serde(default)]
    linked_epic_ids: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TroubleshootFrontMatter {
    unique_slug: String,
    title: String,
    #[serde(default)]
    ai_use_case: String,
    #[serde(default)]
    ai_solutions: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    usage_count: u64,
    #[serde(default)]
    success_count: u64,
    created_at: String,
    updated_at: String,
}

fn split_front_matter(markdown: &str) -> MemoryResult<(&str, &str)> {
    let rest = markdown
        .strip_prefix("---\r\n")
        .or_else(|| markdown.strip_prefix("---\n"))
        .ok_or_else(|| MemoryError::Markdown("document must start with a `---` front-matter fence".to_string()))?;
    let end = rest
        .find("\n---")
        .ok_or_else(|| MemoryError::Markdown("front matter is not terminated by a closing `---`".to_string()))?;
    let yaml = &rest[..end];
    let body = rest[end..].trim_start_matches("\n---").trim_start_matches(['\r', '\n']);
    Ok((yaml, body))
}

/// Render an architecture item as markdown with YAML front matter.
#[must_use]
pub fn export_architecture(item: &ArchitectureItem) -> String {
    let front = ArchitectureFrontMatter {
        unique_slug: item.unique_slug.clone(),
        title: item.title.clone(),
        ai_when_to_use: item.ai_when_to_use.clone(),
        ai_requirements: item.ai_requirements.clone(),
        children_slugs: item.children_slugs.clone(),
        related_slugs: item.related_slugs.clone(),
        linked_epic_ids: item.linked_epic_ids.clone(),
        keywords: item.keywords.clone(),
        tags: item.tags.clone(),
        created_at: item.created_at.clone(),
        updated_at: item.updated_at.clone(),
    };
    let yaml = serde_yaml::to_string(&front).unwrap_or_default();
    format!("---\n{yaml}---\n\n# {}\n\n{}\n", item.title, item.ai_requirements)
}

/// Parse an architecture document's front matter into a caller-supplied-namespace-free item.
///
/// # Errors
///
/// Returns [`MemoryError::Markdown`] if the document has no front matter or it doesn't parse,
/// and [`MemoryError::InvalidSlug`] if `unique_slug` fails validation.
pub fn import_architecture(markdown: &str) -> MemoryResult<ParsedArchitecture> {
    let (yaml, _body) = split_front_matter(markdown)?;
    let front: ArchitectureFrontMatter =
        serde_yaml::from_str(yaml).map_err(|e| MemoryError::Markdown(e.to_string()))?;
    if !is_valid_slug(&front.unique_slug) {
        return Err(MemoryError::InvalidSlug(front.unique_slug));
    }
    Ok(ParsedArchitecture {
        unique_slug: front.unique_slug,
        title: front.title,
        ai_when_to_use: front.ai_when_to_use,
        ai_requirements: front.ai_requirements,
        children_slugs: front.children_slugs,
        related_slugs: front.related_slugs,
        linked_epic_ids: front.linked_epic_ids,
        keywords: front.keywords,
        tags: front.tags,
        created_at: front.created_at,
        updated_at: front.updated_at,
    })
}

/// Render a troubleshoot item as markdown with YAML front matter.
#[must_use]
pub fn export_troubleshoot(item: &TroubleshootItem) -> String {
    let front = TroubleshootFrontMatter {
        unique_slug: item.unique_slug.clone(),
        title: item.title.clone(),
        ai_use_case: item.ai_use_case.clone(),
        ai_solutions: item.ai_solutions.clone(),
        keywords: item.keywords.clone(),
        tags: item.tags.clone(),
        usage_count: item.usage_count,
        success_count: item.success_count,
        created_at: item.created_at.clone(),
        updated_at: item.updated_at.clone(),
    };
    let yaml = serde_yaml::to_string(&front).unwrap_or_default();
    format!(
        "---\n{yaml}---\n\n# {}\n\n## Use case\n\n{}\n\n## Solutions\n\n{}\n",
        item.title, item.ai_use_case, item.ai_solutions
    )
}

/// Parse a troubleshoot document's front matter into a caller-supplied-namespace-free item.
///
/// # Errors
///
/// Returns [`MemoryError::Markdown`] if the document has no front matter or it doesn't parse,
/// and [`MemoryError::InvalidSlug`] if `unique_slug` fails validation.
pub fn import_troubleshoot(markdown: &str) -> MemoryResult<ParsedTroubleshoot> {
    let (yaml, _body) = split_front_matter(markdown)?;
    let front: TroubleshootFrontMatter =
        serde_yaml::from_str(yaml).map_err(|e| MemoryError::Markdown(e.to_string()))?;
    if !is_valid_slug(&front.unique_slug) {
        return Err(MemoryError::InvalidSlug(front.unique_slug));
    }
    Ok(ParsedTroubleshoot {
        unique_slug: front.unique_slug,
        title: front.title,
        ai_use_case: front.ai_use_case,
        ai_solutions: front.ai_solutions,
        keywords: front.keywords,
        tags: front.tags,
        usage_count: front.usage_count,
        success_count: front.success_count,
        created_at: front.created_at,
        updated_at: front.updated_at,
    })
}

/// An architecture item parsed from markdown, awaiting a namespace and recomputed embedding.
#[derive(Debug, Clone)]
pub struct ParsedArchitecture {
    /// Slug, already validated.
    pub unique_slug: String,
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
    /// RFC3339 UTC creation time, carried over from the document.
    pub created_at: String,
    /// RFC3339 UTC last-modification time, carried over from the document.
    pub updated_at: String,
}

/// A troubleshoot item parsed from markdown, awaiting a namespace and recomputed embedding.
#[derive(Debug, Clone)]
pub struct ParsedTroubleshoot {
    /// Slug, already validated.
    pub unique_slug: String,
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
    /// RFC3339 UTC creation time, carried over from the document.
    pub created_at: String,
    /// RFC3339 UTC last-modification time, carried over from the document.
    pub updated_at: String,
}
