//! Runtime settings, loaded from environment variables.
//!
//! The engine treats these as read-only configuration: components receive the
//! flags they need at construction time, nothing reads the environment after
//! startup. Absent backend credentials are not an error here; the affected
//! features degrade at the wiring layer instead.

use anyhow::{Context, Result};
use std::env;

/// Generation backend selection. `Local` targets an OpenAI-compatible
/// endpoint on the local machine (e.g. an Ollama server).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    OpenAi,
    BigModel,
}

impl Backend {
    fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "ollama" => Ok(Backend::Local),
            "openai" => Ok(Backend::OpenAi),
            "bigmodel" | "zhipuai" => Ok(Backend::BigModel),
            other => anyhow::bail!(
                "Unknown BACKEND '{}'; expected local | openai | bigmodel",
                other
            ),
        }
    }
}

/// Embedding provider selection, independent of the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    OpenAi,
    BigModel,
}

impl EmbeddingProvider {
    fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(EmbeddingProvider::OpenAi),
            "bigmodel" | "zhipuai" => Ok(EmbeddingProvider::BigModel),
            other => anyhow::bail!(
                "Unknown EMBEDDING_PROVIDER '{}'; expected openai | bigmodel",
                other
            ),
        }
    }
}

/// All flags the engine consumes. Loaded once and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Display name the engine writes as (mention detection, prompt persona).
    pub user_name: String,
    pub backend: Backend,
    pub use_rag: bool,
    pub smart_response: bool,
    pub group_topic_participation: bool,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub bigmodel_api_key: String,
    /// Base URL for the `local` backend (OpenAI-compatible server).
    pub local_base_url: String,
    pub generation_model: String,
    pub embedding_provider: EmbeddingProvider,
    /// Embedding model name; `None` = provider default.
    pub embedding_model: Option<String>,
    pub database_url: String,
    pub index_dir: String,
    pub log_file: String,
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Settings {
    /// Loads settings from environment variables with the documented defaults.
    pub fn from_env() -> Result<Self> {
        let user_name = env::var("USER_NAME").context("USER_NAME not set")?;
        let backend = Backend::parse(
            &env::var("BACKEND").unwrap_or_else(|_| "openai".to_string()),
        )?;
        let use_rag = env_bool("USE_RAG", true);
        let smart_response = env_bool("SMART_RESPONSE", true);
        let group_topic_participation = env_bool("GROUP_TOPIC_PARTICIPATION", false);
        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let bigmodel_api_key = env::var("BIGMODEL_API_KEY")
            .or_else(|_| env::var("ZHIPUAI_API_KEY"))
            .unwrap_or_default();
        let local_base_url = env::var("LOCAL_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:11434/v1".to_string());
        let generation_model =
            env::var("GENERATION_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let embedding_provider = EmbeddingProvider::parse(
            &env::var("EMBEDDING_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
        )?;
        let embedding_model = env::var("EMBEDDING_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:doppel.db".to_string());
        let index_dir = env::var("INDEX_DIR").unwrap_or_else(|_| "./data/index".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/doppel.log".to_string());

        Ok(Self {
            user_name,
            backend,
            use_rag,
            smart_response,
            group_topic_participation,
            openai_api_key,
            openai_base_url,
            bigmodel_api_key,
            local_base_url,
            generation_model,
            embedding_provider,
            embedding_model,
            database_url,
            index_dir,
            log_file,
        })
    }

    /// Checks provider/key pairing. Missing keys for the *selected* cloud
    /// backend are reported here so the CLI can fail fast; the library layer
    /// degrades silently instead.
    pub fn validate(&self) -> Result<()> {
        if self.backend == Backend::OpenAi && self.openai_api_key.is_empty() {
            anyhow::bail!("BACKEND=openai requires OPENAI_API_KEY to be set");
        }
        if self.backend == Backend::BigModel && self.bigmodel_api_key.is_empty() {
            anyhow::bail!("BACKEND=bigmodel requires BIGMODEL_API_KEY or ZHIPUAI_API_KEY");
        }
        if self.embedding_provider == EmbeddingProvider::BigModel
            && self.bigmodel_api_key.is_empty()
        {
            anyhow::bail!(
                "EMBEDDING_PROVIDER=bigmodel requires BIGMODEL_API_KEY or ZHIPUAI_API_KEY"
            );
        }
        Ok(())
    }

    /// True when the configured embedding provider has a usable credential.
    /// The local backend shares the OpenAI-compatible embedding path, which
    /// needs no key when a base URL is set.
    pub fn embedding_configured(&self) -> bool {
        match self.embedding_provider {
            EmbeddingProvider::OpenAi => {
                !self.openai_api_key.is_empty() || self.openai_base_url.is_some()
            }
            EmbeddingProvider::BigModel => !self.bigmodel_api_key.is_empty(),
        }
    }
}
