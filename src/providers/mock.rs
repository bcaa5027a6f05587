/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with a canned answer
 * - `MockProvider::scripted(...)` - Returns the given answers in order
 * - `MockProvider::intermittent(n)` - Fails every n-th request
 * - `MockProvider::failing()` - Always fails with an error
 *
 * Every request is recorded so tests can inspect the rendered prompts.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{Completion, CompletionRequest, LlmClient};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a canned answer
    Working,
    /// Pops scripted answers, failing once they run out
    Scripted,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for concurrency testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing generation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Model name reported to callers
    model: String,
    /// Scripted answers, consumed front to back
    responses: Arc<Mutex<VecDeque<String>>>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            model: "mock-model".to_string(),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that returns `responses` in order
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new(MockBehavior::Scripted);
        provider.responses.lock().extend(responses.into_iter().map(Into::into));
        provider
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Canned answer shaped like what the caller asked for
    fn canned_answer(request: &CompletionRequest) -> String {
        let subject: String = request
            .prompt
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default()
            .trim()
            .chars()
            .take(120)
            .collect();

        if request.json_output {
            serde_json::json!({
                "variations": [{ "title": "Mock variation", "prompt": subject }]
            })
            .to_string()
        } else {
            format!("(0:00-0:05) (Narrator) This is a mock answer.\n**[SCENE: studio]** It was asked about: {}", subject)
        }
    }

    fn answer(request: &CompletionRequest, text: String) -> Completion {
        Completion {
            prompt_tokens: Some(request.prompt.split_whitespace().count() as u64),
            completion_tokens: Some(text.split_whitespace().count() as u64),
            text,
        }
    }
}

#[async_trait]
impl LlmClient for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match self.behavior {
            MockBehavior::Working => {
                let text = Self::canned_answer(&request);
                Ok(Self::answer(&request, text))
            }

            MockBehavior::Scripted => {
                let next = self.responses.lock().pop_front();
                match next {
                    Some(text) => Ok(Self::answer(&request, text)),
                    None => Err(ProviderError::RequestFailed(format!(
                        "No scripted response left for request #{}",
                        count + 1
                    ))),
                }
            }

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    let text = Self::canned_answer(&request);
                    Ok(Self::answer(&request, text))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                let text = Self::canned_answer(&request);
                Ok(Self::answer(&request, text))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
