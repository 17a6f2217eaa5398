//! # BigModel Embedding Client
//!
//! [`EmbeddingClient`] implementation against BigModel (Zhipu AI)'s
//! embeddings API, talking raw JSON over reqwest. Default model is
//! `embedding-2` (1024 dimensions).
//!
//! Batch responses arrive with per-item indexes; results are re-sorted by
//! index so output order always matches input order.

use async_trait::async_trait;
use embedding::EmbeddingClient;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const BIGMODEL_API_BASE: &str = "https://open.bigmodel.cn/api/paas/v4/embeddings";
const EMBED_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
const EMBED_BATCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

pub const DEFAULT_EMBEDDING_MODEL: &str = "embedding-2";

/// BigModel embedding client.
#[derive(Debug, Clone)]
pub struct BigModelEmbeddingClient {
    client: Client,
    api_key: String,
    model: String,
}

impl BigModelEmbeddingClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    /// Builds a client with the default `embedding-2` model.
    pub fn with_api_key(api_key: String) -> Self {
        Self::new(api_key, DEFAULT_EMBEDDING_MODEL.to_string())
    }

    /// The configured model name, for diagnostics.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_embeddings(
        &self,
        request: &EmbeddingRequest<'_>,
        timeout: std::time::Duration,
    ) -> Result<EmbeddingResponse, anyhow::Error> {
        let send_future = self
            .client
            .post(BIGMODEL_API_BASE)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send();

        let response = match tokio::time::timeout(timeout, send_future).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => {
                warn!(error = %e, "BigModel embed request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(
                    timeout_secs = timeout.as_secs(),
                    "BigModel embed request timed out"
                );
                return Err(anyhow::anyhow!(
                    "BigModel embed request timed out after {} seconds",
                    timeout.as_secs()
                ));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "BigModel API error ({}): {}",
                status,
                error_text
            ));
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Input<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Input<'a> {
    Single(&'a str),
    Batch(&'a [&'a str]),
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingClient for BigModelEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        info!(
            model = %self.model,
            text_len = text.len(),
            "step: embedding BigModel single request"
        );

        let request = EmbeddingRequest {
            model: &self.model,
            input: Input::Single(text),
        };
        let response = self.post_embeddings(&request, EMBED_TIMEOUT).await?;

        let embedding = response
            .data
            .first()
            .ok_or_else(|| anyhow::anyhow!("No embedding in response"))?
            .embedding
            .clone();

        debug!(dimension = embedding.len(), "step: embedding BigModel single done");
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        info!(
            model = %self.model,
            batch_size = texts.len(),
            "step: embedding BigModel batch request"
        );

        let inputs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        let request = EmbeddingRequest {
            model: &self.model,
            input: Input::Batch(&inputs),
        };
        let response = self.post_embeddings(&request, EMBED_BATCH_TIMEOUT).await?;

        // The API reports per-item indexes; sort so output matches input order.
        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        let vectors: Vec<Vec<f32>> = data.into_iter().map(|item| item.embedding).collect();

        if vectors.len() != texts.len() {
            warn!(
                expected = texts.len(),
                got = vectors.len(),
                "BigModel embed_batch response count mismatch"
            );
            return Err(anyhow::anyhow!(
                "Expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            ));
        }

        debug!(
            count = vectors.len(),
            dimension = vectors.first().map(|v| v.len()).unwrap_or(0),
            "step: embedding BigModel batch done"
        );
        Ok(vectors)
    }
}
