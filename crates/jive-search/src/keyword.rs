//! Token-overlap scoring: no stemming, no stopword list, just Jaccard over lowercased
//! alphanumeric runs plus a flat boost when the query also hits the title field.

use std::collections::HashSet;

use jive_store::Row;

use crate::TextFields;

/// Split `text` into lowercase alphanumeric tokens.
#[must_use]
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

const TITLE_BOOST: f32 = 0.1;

/// Score a single row against `query_tokens`: Jaccard overlap across all of `text_fields`,
/// plus [`TITLE_BOOST`] if the first field in `text_fields` shares any token with the query.
pub(crate) fn score_row(row: &Row, text_fields: &TextFields, query_tokens: &HashSet<String>) -> f32 {
    let mut doc_tokens: HashSet<String> = HashSet::new();
    for field in &text_fields.fields {
        if let Some(text) = field_text(row, field) {
            doc_tokens.extend(tokenize(&text));
        }
    }
    if doc_tokens.is_empty() {
        return 0.0;
    }

    let jaccard = jaccard_similarity(query_tokens, &doc_tokens);
    if jaccard == 0.0 {
        return 0.0;
    }

    let title_hit = text_fields
        .fields
        .first()
        .and_then(|title_field| field_text(row, title_field))
        .map(|title| !tokenize(&title).is_disjoint(query_tokens))
        .unwrap_or(false);

    if title_hit { jaccard + TITLE_BOOST } else { jaccard }
}

fn field_text(row: &Row, field: &str) -> Option<String> {
    match row.fields.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => None,
    }
}

fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let intersection = a.intersection(b).count();
    if intersection == 0 {
        return 0.0;
    }
    let union = a.union(b).count();
    #[allow(clippy::cast_precision_loss)]
    {
        intersection as f32 / union as f32
    }
}
