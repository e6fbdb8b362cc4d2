//! Tunables for the memory repository that the distilled spec leaves as implementer choice.

use serde::{Deserialize, Serialize};

/// Configuration for the memory repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Maximum transitive depth `get_context` descends into `children_slugs`.
    pub max_context_depth: usize,
    /// Default `token_budget` for `get_context` when the caller doesn't supply one.
    pub default_token_budget: usize,
    /// Characters assumed per token when estimating cost (`ceil(chars / char_per_token)`).
    pub char_per_token: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_context_depth: 3,
            default_token_budget: 2000,
            char_per_token: 4,
        }
    }
}
