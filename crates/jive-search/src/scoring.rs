//! Normalization and blending shared by the hybrid search mode.

use std::collections::HashMap;

use crate::RankedRow;

const SEMANTIC_WEIGHT: f32 = 0.7;
const KEYWORD_WEIGHT: f32 = 0.3;

/// Min-max normalize `rows` scores to `[0, 1]` in place. A single-element or constant-score
/// set normalizes to `1.0` for every row rather than dividing by zero.
pub fn min_max_normalize(rows: &mut [RankedRow]) {
    let Some(min) = rows.iter().map(|r| r.score).fold(None, |acc, s| {
        Some(acc.map_or(s, |m: f32| m.min(s)))
    }) else {
        return;
    };
    let max = rows.iter().map(|r| r.score).fold(min, f32::max);

    let range = max - min;
    for row in rows {
        row.score = if range <= f32::EPSILON { 1.0 } else { (row.score - min) / range };
    }
}

/// Blend independently-normalized semantic and keyword candidate sets into one ranked list,
/// deduping by row id and keeping the higher of the two contributions per id.
pub(crate) fn blend(mut semantic: Vec<RankedRow>, mut keyword: Vec<RankedRow>) -> Vec<RankedRow> {
    min_max_normalize(&mut semantic);
    min_max_normalize(&mut keyword);

    let mut combined: HashMap<String, RankedRow> = HashMap::new();

    for row in semantic {
        let id = row.row.id.clone();
        combined
            .entry(id)
            .and_modify(|existing| existing.score += row.score * SEMANTIC_WEIGHT)
            .or_insert(RankedRow {
                score: row.score * SEMANTIC_WEIGHT,
                row,
            });
    }

    for row in keyword {
        let id = row.row.id.clone();
        combined
            .entry(id)
            .and_modify(|existing| existing.score += row.score * KEYWORD_WEIGHT)
            .or_insert(RankedRow {
                score: row.score * KEYWORD_WEIGHT,
                row,
            });
    }

    combined.into_values().collect()
}
