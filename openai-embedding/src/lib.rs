//! # OpenAI Embedding Client
//!
//! [`EmbeddingClient`] implementation for OpenAI's embeddings API and any
//! OpenAI-compatible endpoint (a custom base URL points it at a local
//! Ollama-style server). Default model is `text-embedding-3-small`.
//!
//! Every call is bounded by a timeout so a stalled backend shows up as a
//! skipped batch upstream instead of a hung indexing run.

use async_openai::{types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use embedding::EmbeddingClient;
use tracing::{debug, info, instrument, warn};

/// Timeout for a single embed request.
const EMBED_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
/// Timeout for a batch request; larger payloads need more headroom.
const EMBED_BATCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);
const LOG_PREVIEW_LEN: usize = 200;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// OpenAI-compatible embedding client. Holds the async-openai client and the
/// model name.
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddingClient {
    client: Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIEmbeddingClient {
    /// Builds a client against the default OpenAI API base.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, None)
    }

    /// Builds a client with an optional custom base URL. `Some` routes all
    /// requests to that endpoint (local servers, proxies).
    pub fn with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let mut config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            config = config.with_api_base(url);
        }
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    /// The configured model name, for diagnostics.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Truncates a log preview on a char boundary.
fn preview(text: &str) -> String {
    if text.len() <= LOG_PREVIEW_LEN {
        text.to_string()
    } else {
        let safe_len = text
            .char_indices()
            .nth(LOG_PREVIEW_LEN)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len());
        format!("{}...", &text[..safe_len])
    }
}

#[async_trait]
impl EmbeddingClient for OpenAIEmbeddingClient {
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        info!(
            model = %self.model,
            text_preview = %preview(text),
            "step: embedding single request"
        );

        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(vec![text])
            .build()?;

        let embeddings = self.client.embeddings();
        let response = match tokio::time::timeout(EMBED_TIMEOUT, embeddings.create(request)).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => {
                warn!(error = %e, "embed request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(timeout_secs = EMBED_TIMEOUT.as_secs(), "embed request timed out");
                return Err(anyhow::anyhow!(
                    "embed request timed out after {} seconds",
                    EMBED_TIMEOUT.as_secs()
                ));
            }
        };

        let embedding = match response.data.first() {
            Some(item) => item.embedding.clone(),
            None => {
                warn!("embed response has no embedding data");
                return Err(anyhow::anyhow!("No embedding in response"));
            }
        };

        debug!(dimension = embedding.len(), "step: embedding single done");
        Ok(embedding)
    }

    #[instrument(skip(self, texts), fields(model = %self.model, batch_size = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            debug!("embed_batch empty input, skipping");
            return Ok(vec![]);
        }

        info!(
            model = %self.model,
            batch_size = texts.len(),
            "step: embedding batch request"
        );

        let inputs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(inputs)
            .build()?;

        let embeddings = self.client.embeddings();
        let response =
            match tokio::time::timeout(EMBED_BATCH_TIMEOUT, embeddings.create(request)).await {
                Ok(Ok(r)) => r,
                Ok(Err(e)) => {
                    warn!(error = %e, "embed_batch request failed");
                    return Err(e.into());
                }
                Err(_) => {
                    warn!(
                        timeout_secs = EMBED_BATCH_TIMEOUT.as_secs(),
                        "embed_batch request timed out"
                    );
                    return Err(anyhow::anyhow!(
                        "embed_batch request timed out after {} seconds",
                        EMBED_BATCH_TIMEOUT.as_secs()
                    ));
                }
            };

        let vectors: Vec<Vec<f32>> = response
            .data
            .into_iter()
            .map(|item| item.embedding)
            .collect();

        if vectors.len() != texts.len() {
            warn!(
                expected = texts.len(),
                got = vectors.len(),
                "embed_batch response count mismatch"
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
            "step: embedding batch done"
        );
        Ok(vectors)
    }
}
