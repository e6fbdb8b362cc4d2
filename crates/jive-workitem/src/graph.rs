//! Pure graph algorithms over the hierarchy (forest) and dependency (DAG) relations.
//!
//! Operates on in-memory adjacency built from a namespace's full item/edge set — acceptable at
//! the expected scale of under 10,000 work items per namespace.

use std::collections::{HashMap, HashSet};

use crate::model::{DependencyType, WorkItem, WorkItemDependency};

/// Run a DFS from `target` over existing `blocks` edges (`source`); if `start` is reachable,
/// return the discovered cycle path `[start, ..., target, start]`.
///
/// Called with `existing` already containing every committed `blocks` edge in the namespace,
/// `start`/`target` being the candidate edge's endpoints after `blocked_by` normalization
/// (i.e. the edge under test is `start --blocks--> target`).
#[must_use]
pub fn find_cycle(existing: &[WorkItemDependency], start: &str, target: &str) -> Option<Vec<String>> {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    for edge in existing {
        if edge.dependency_type == DependencyType::Blocks {
            adjacency
                .entry(edge.source_id.clone())
                .or_default()
                .push(edge.target_id.clone());
        }
    }

    let mut stack = vec![vec![target.to_string()]];
    let mut visited: HashSet<String> = HashSet::new();

    while let Some(path) = stack.pop() {
        let Some(node) = path.last().cloned() else { continue };
        if node == start {
            let mut cycle = path;
            cycle.push(start.to_string());
            return Some(cycle);
        }
        if !visited.insert(node.clone()) {
            continue;
        }
        if let Some(neighbors) = adjacency.get(&node) {
            for next in neighbors {
                let mut extended = path.clone();
                extended.push(next.clone());
                stack.push(extended);
            }
        }
    }
    None
}

/// Build `parent_id -> [child ids in order_index order]` for every item (including roots,
/// keyed by `None`).
#[must_use]
pub fn children_index(items: &[WorkItem]) -> HashMap<Option<String>, Vec<String>> {
    let mut by_parent: HashMap<Option<String>, Vec<(i64, String)>> = HashMap::new();
    for item in items {
        by_parent
            .entry(item.parent_id.clone())
            .or_default()
            .push((item.order_index, item.id.clone()));
    }
    by_parent
        .into_iter()
        .map(|(parent, mut kids)| {
            kids.sort_by_key(|(order, _)| *order);
            (parent, kids.into_iter().map(|(_, id)| id).collect())
        })
        .collect()
}

/// Walk `parent_id` pointers from `id` to the root, returning `[root, ..., parent_of(id)]`.
/// Stops early (rather than looping forever) if a cycle is somehow present in stored data.
#[must_use]
pub fn ancestor_chain(by_id: &HashMap<String, WorkItem>, id: &str) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = by_id.get(id).and_then(|item| item.parent_id.clone());
    let mut seen = HashSet::new();
    while let Some(parent_id) = current {
        if !seen.insert(parent_id.clone()) {
            break;
        }
        chain.push(parent_id.clone());
        current = by_id.get(&parent_id).and_then(|item| item.parent_id.clone());
    }
    chain.reverse();
    chain
}
