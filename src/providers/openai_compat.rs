use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::errors::ProviderError;
use crate::providers::retry::{error_from_response, request_error, RetryPolicy};
use crate::providers::{Completion, CompletionRequest, LlmClient};

/// Client for OpenAI-style `chat/completions` APIs (Groq, OpenRouter)
#[derive(Debug)]
pub struct OpenAiCompatible {
    /// HTTP client for API requests
    client: Client,
    /// Provider name reported to callers
    name: String,
    /// Bearer token
    api_key: String,
    /// API base URL without trailing slash, e.g. `https://api.groq.com/openai/v1`
    endpoint: String,
    /// Model name
    model: String,
    /// Extra headers sent with every request
    extra_headers: Vec<(String, String)>,
    /// Retry settings
    retry: RetryPolicy,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,

    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

impl ChatRequest {
    /// Build the wire request for a completion request
    pub fn from_completion(model: &str, request: &CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: Some(system.clone()),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: Some(request.prompt.clone()),
        });

        Self {
            model: model.to_string(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_output.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

impl ChatResponse {
    /// Text of the first choice
    pub fn extract_text(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}

impl OpenAiCompatible {
    /// Create a client for any OpenAI-compatible endpoint
    pub fn new(
        name: impl Into<String>,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap_or_default(),
            name: name.into(),
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            extra_headers: Vec::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Groq client
    pub fn groq(api_key: impl Into<String>, endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self::new("groq", api_key, endpoint, model, timeout)
    }

    /// OpenRouter client, which asks callers to identify themselves
    pub fn openrouter(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self::new("openrouter", api_key, endpoint, model, timeout)
            .with_header("HTTP-Referer", "https://github.com/scriptsmith/scriptsmith")
            .with_header("X-Title", "scriptsmith")
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    async fn send_once(&self, body: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let mut builder = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key);

        for (name, value) in &self.extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.json(body).send().await.map_err(request_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse {} API response: {}", self.name, e)))
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatible {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let body = &ChatRequest::from_completion(&self.model, &request);
        let started = Instant::now();

        let response = self.retry.run(&self.name, move || self.send_once(body)).await?;
        let text = response.extract_text();

        if text.trim().is_empty() {
            return Err(ProviderError::ParseError(format!("{} returned an empty completion", self.name)));
        }

        debug!("{} completion in {}ms", self.name, started.elapsed().as_millis());

        Ok(Completion {
            text,
            prompt_tokens: response.usage.as_ref().and_then(|u| u.prompt_tokens),
            completion_tokens: response.usage.as_ref().and_then(|u| u.completion_tokens),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}
