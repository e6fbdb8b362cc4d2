//! The [`Embedder`] capability trait and its implementations.

use async_trait::async_trait;
use thiserror::Error;

/// Result alias for embedding operations.
pub type EmbedResult<T> = Result<T, EmbedError>;

/// Errors raised while computing an embedding.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The remote embedding provider returned an error or was unreachable.
    #[error("embedding provider error: {0}")]
    Provider(String),
}

/// A capability for turning text into a fixed-dimension float vector.
///
/// `D` (the dimension) is fixed for the lifetime of a server process; every implementation
/// of this trait in a given deployment must agree on it. Empty or whitespace-only text always
/// yields the zero vector, signaling "no semantic component" to the search engine.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single string.
    async fn embed(&self, text: &str) -> EmbedResult<Vec<f32>>;

    /// Embed a batch of strings. The default implementation embeds sequentially; a provider
    /// with a native batch API should override this.
    async fn embed_batch(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// The fixed dimension `D` this embedder produces.
    fn dimension(&self) -> usize;
}

/// Deterministic, offline mock embedder: hashes each word into one of `D` buckets and
/// L2-normalizes the result. Used as the default so the server and its tests never depend on
/// a real model.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Construct a hash embedder producing vectors of the given dimension.
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn word_bucket(&self, word: &str) -> usize {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        word.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> EmbedResult<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(vector);
        }
        for word in trimmed.split_whitespace().map(str::to_lowercase) {
            let bucket = self.word_bucket(&word);
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Stub for a real HTTP-backed embedding provider, shaped after a `reqwest`-based client.
/// Not wired into the default build; a real deployment supplies `endpoint`/`api_key` and
/// implements the request/response mapping for its chosen provider.
#[derive(Debug, Clone)]
pub struct RemoteEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    dimension: usize,
}

impl RemoteEmbedder {
    /// Construct a remote embedder pointed at `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, dimension: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
            dimension,
        }
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed(&self, text: &str) -> EmbedResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.dimension]);
        }
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "input": text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| EmbedError::Provider(e.to_string()))?;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EmbedError::Provider(e.to_string()))?;
        let vector = body
            .get("embedding")
            .and_then(|v| v.as_array())
            .ok_or_else(|| EmbedError::Provider("response missing `embedding` array".into()))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_text_yields_zero_vector() {
        let embedder = HashEmbedder::new(16);
        let vector = embedder.embed("   ").await.unwrap();
        assert_eq!(vector, vec![0.0; 16]);
    }

    #[tokio::test]
    async fn embedding_is_deterministic_and_normalized() {
        let embedder = HashEmbedder::new(32);
        let a = embedder.embed("JWT authentication token").await.unwrap();
        let b = embedder.embed("JWT authentication token").await.unwrap();
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5 || norm == 0.0);
    }

    #[tokio::test]
    async fn distinct_text_usually_differs() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed("database migration").await.unwrap();
        let b = embedder.embed("oauth flow").await.unwrap();
        assert_ne!(a, b);
    }
}
