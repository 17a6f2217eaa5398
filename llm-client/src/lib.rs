//! # LLM Client
//!
//! Generation backend interface plus the OpenAI-compatible implementation
//! used for both cloud and local (custom base URL) backends. Single
//! request/response, no streaming; the reply pipeline wants one short text.

use anyhow::Result;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{info, instrument, warn};

/// Timeout on a generation call; the only bound on worst-case reply latency.
const GENERATION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// Masks an API key for safe logging: first 7 chars + "***" + last 4 chars.
/// Keys of length <= 11 come back as "***" so no part of them leaks.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// Backend that turns an assembled prompt into reply text.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Runs one completion. `system_prompt`, when present, is sent as the
    /// system message ahead of the user prompt.
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String>;
}

/// OpenAI-compatible chat completion client.
#[derive(Clone)]
pub struct OpenAIGenerationClient {
    client: Client<async_openai::config::OpenAIConfig>,
    model: String,
    /// Kept only so request logs can show a masked key.
    api_key_for_logging: String,
}

impl OpenAIGenerationClient {
    /// Builds a client against the default OpenAI API base.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, None)
    }

    /// Builds a client with an optional custom base URL (local servers,
    /// proxies, other OpenAI-compatible endpoints).
    pub fn with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let api_key_for_logging = api_key.clone();
        let mut config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            config = config.with_api_base(url);
        }
        Self {
            client: Client::with_config(config),
            model,
            api_key_for_logging,
        }
    }

    /// The configured model name, for diagnostics.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationClient for OpenAIGenerationClient {
    #[instrument(skip(self, prompt, system_prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.to_string())
                    .build()?
                    .into(),
            );
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()?
                .into(),
        );

        info!(
            model = %self.model,
            prompt_len = prompt.len(),
            api_key = %mask_token(&self.api_key_for_logging),
            "step: generation chat_completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .build()?;

        let chat = self.client.chat();
        let response = match tokio::time::timeout(GENERATION_TIMEOUT, chat.create(request)).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => {
                warn!(error = %e, "generation request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(
                    timeout_secs = GENERATION_TIMEOUT.as_secs(),
                    "generation request timed out"
                );
                return Err(anyhow::anyhow!(
                    "generation request timed out after {} seconds",
                    GENERATION_TIMEOUT.as_secs()
                ));
            }
        };

        if let Some(ref usage) = response.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "step: generation chat_completion usage"
            );
        }

        match response.choices.first() {
            Some(choice) => Ok(choice.message.content.clone().unwrap_or_default()),
            None => anyhow::bail!("No response choices from generation backend"),
        }
    }
}
