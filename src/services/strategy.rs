//! Generation strategies tried by the orchestrator, in priority order.

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::models::SummaryRequest;
use crate::services::llm::{GenerateOptions, LlmClient};
use crate::services::prompts::{system_prompt, user_prompt};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::time::Duration;

/// One way of producing a summary text.
///
/// Implement this trait to add another provider; the orchestrator only
/// needs the ordered list.
#[async_trait]
pub trait SummaryStrategy: Send + Sync {
    fn id(&self) -> &str;

    /// Whether the strategy can be attempted at all (e.g. credentials present)
    fn is_available(&self) -> bool;

    /// Produce the summary markdown. `source` is usable book content, if any.
    async fn attempt(
        &self,
        request: &SummaryRequest,
        source: Option<&str>,
    ) -> Result<String, ProviderError>;
}

/// AI provider behind an OpenAI-compatible chat-completions endpoint.
pub struct AiStrategy {
    config: ProviderConfig,
    timeout: Duration,
    client: OnceCell<LlmClient>,
}

impl AiStrategy {
    pub fn new(config: ProviderConfig, timeout: Duration) -> Self {
        Self {
            config,
            timeout,
            client: OnceCell::new(),
        }
    }

    /// Shared client, built by the first caller and reused afterwards.
    fn client(&self) -> Result<&LlmClient, ProviderError> {
        let api_key = self
            .config
            .usable_api_key()
            .ok_or_else(|| ProviderError::MissingCredentials(self.config.id.clone()))?;

        self.client.get_or_try_init(|| {
            tracing::info!(provider = %self.config.id, "initializing provider client");
            LlmClient::new(
                self.config.api_url.clone(),
                api_key,
                self.timeout,
                self.config.extra_headers.clone(),
            )
        })
    }

    fn options(&self) -> GenerateOptions {
        GenerateOptions {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl SummaryStrategy for AiStrategy {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn is_available(&self) -> bool {
        self.config.usable_api_key().is_some()
    }

    async fn attempt(
        &self,
        request: &SummaryRequest,
        source: Option<&str>,
    ) -> Result<String, ProviderError> {
        let client = self.client()?;
        let prompt = user_prompt(request, source);

        client
            .generate_text(system_prompt(request.language()), &prompt, &self.options())
            .await
    }
}
