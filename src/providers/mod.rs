/*!
 * Provider implementations for different LLM services.
 *
 * This module contains client implementations for the supported providers:
 * - Gemini: Google Generative Language API
 * - OpenAI-compatible: Groq and OpenRouter chat completion APIs
 * - Mock: scripted responses for tests and offline runs
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{AiProvider, GenerationConfig};
use crate::errors::ProviderError;

pub mod gemini;
pub mod mock;
pub mod openai_compat;
pub mod retry;

pub use gemini::Gemini;
pub use mock::MockProvider;
pub use openai_compat::OpenAiCompatible;
pub use retry::RetryPolicy;

/// A single prompt sent to a provider
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction, if any
    pub system: Option<String>,
    /// User prompt
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Ask the provider for a JSON answer
    pub json_output: bool,
}

impl CompletionRequest {
    /// Create a request with default sampling settings
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 2048,
            json_output: false,
        }
    }

    /// Set the system instruction
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of generated tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Request a JSON answer
    pub fn json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Text returned by a provider with its token usage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Generated text
    pub text: String,
    /// Prompt tokens reported by the provider
    pub prompt_tokens: Option<u64>,
    /// Completion tokens reported by the provider
    pub completion_tokens: Option<u64>,
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the enhancer, the script generator
/// and the contract drafter.
#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Completion, ProviderError>` - The generated text or an error
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;

    /// Lowercase provider name, as stored with generated results
    fn name(&self) -> &str;

    /// Model used for completions
    fn model(&self) -> &str;
}

/// Build the client for the active provider of `config`
pub fn build_client(config: &GenerationConfig) -> Result<Arc<dyn LlmClient>> {
    let retry = RetryPolicy::new(config.common.retry_count, config.common.retry_backoff_ms)
        .with_rate_limit(config.get_rate_limit());
    let timeout = Duration::from_secs(config.get_timeout_secs());
    let model = config.get_model();
    let endpoint = config.get_endpoint();
    let api_key = config.get_api_key();

    let client: Arc<dyn LlmClient> = match config.provider {
        AiProvider::Gemini => Arc::new(Gemini::new(api_key, endpoint, model, timeout).with_retry(retry)),
        AiProvider::Groq => Arc::new(OpenAiCompatible::groq(api_key, endpoint, model, timeout).with_retry(retry)),
        AiProvider::OpenRouter => {
            Arc::new(OpenAiCompatible::openrouter(api_key, endpoint, model, timeout).with_retry(retry))
        }
        AiProvider::Mock => Arc::new(MockProvider::working().with_model(model)),
    };

    log::debug!("Using {} provider with model {}", client.name(), client.model());
    Ok(client)
}
