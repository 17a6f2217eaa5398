//! Backend client construction from settings.
//!
//! Factories return `None` when the selected provider has no usable
//! credential; callers degrade (skip indexing, stay quiet) instead of
//! failing. `Settings::validate` is the place for hard errors.

use bigmodel_embedding::BigModelEmbeddingClient;
use doppel_core::{Backend, EmbeddingProvider, Settings};
use embedding::EmbeddingClient;
use llm_client::{GenerationClient, OpenAIGenerationClient};
use openai_embedding::OpenAIEmbeddingClient;
use std::sync::Arc;

/// BigModel's chat API is OpenAI-compatible under this base URL.
const BIGMODEL_CHAT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Placeholder key for local OpenAI-compatible servers that ignore auth.
const LOCAL_API_KEY: &str = "local";

pub fn create_embedding_client(settings: &Settings) -> Option<Arc<dyn EmbeddingClient>> {
    if !settings.embedding_configured() {
        return None;
    }

    match settings.embedding_provider {
        EmbeddingProvider::OpenAi => {
            let model = settings
                .embedding_model
                .clone()
                .unwrap_or_else(|| openai_embedding::DEFAULT_EMBEDDING_MODEL.to_string());
            Some(Arc::new(OpenAIEmbeddingClient::with_base_url(
                settings.openai_api_key.clone(),
                model,
                settings.openai_base_url.as_deref(),
            )))
        }
        EmbeddingProvider::BigModel => {
            let model = settings
                .embedding_model
                .clone()
                .unwrap_or_else(|| bigmodel_embedding::DEFAULT_EMBEDDING_MODEL.to_string());
            Some(Arc::new(BigModelEmbeddingClient::new(
                settings.bigmodel_api_key.clone(),
                model,
            )))
        }
    }
}

pub fn create_generation_client(settings: &Settings) -> Option<Arc<dyn GenerationClient>> {
    match settings.backend {
        Backend::Local => {
            let api_key = if settings.openai_api_key.is_empty() {
                LOCAL_API_KEY.to_string()
            } else {
                settings.openai_api_key.clone()
            };
            Some(Arc::new(OpenAIGenerationClient::with_base_url(
                api_key,
                settings.generation_model.clone(),
                Some(settings.local_base_url.as_str()),
            )))
        }
        Backend::OpenAi => {
            if settings.openai_api_key.is_empty() {
                return None;
            }
            Some(Arc::new(OpenAIGenerationClient::with_base_url(
                settings.openai_api_key.clone(),
                settings.generation_model.clone(),
                settings.openai_base_url.as_deref(),
            )))
        }
        Backend::BigModel => {
            if settings.bigmodel_api_key.is_empty() {
                return None;
            }
            Some(Arc::new(OpenAIGenerationClient::with_base_url(
                settings.bigmodel_api_key.clone(),
                settings.generation_model.clone(),
                Some(BIGMODEL_CHAT_BASE_URL),
            )))
        }
    }
}
