//! # Embedding
//!
//! Defines the embedding backend interface used by the retrieval layer to
//! turn conversation fragments into vectors.

use async_trait::async_trait;

/// Backend that turns text into fixed-dimension float vectors.
///
/// Implementations wrap a remote API. Both methods preserve input order and
/// fail atomically: callers never see a partial vector list.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error>;

    /// Embeds a batch in one API call, returning one vector per input in
    /// input order. An empty batch is `Ok(vec![])` without a network call.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error>;
}
