/*!
 * Video script generation.
 *
 * The LLM writes an annotated script for a topic. The script is then run
 * through the `ScriptCleaner` and split into TTS chunks, so callers get both
 * the raw script (for editors) and the narration (for the speech engine).
 */

use futures::stream::{self, StreamExt};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::errors::{GenerationError, ProviderError};
use crate::language_utils;
use crate::prompts::{strip_code_fences, PromptTemplate};
use crate::providers::{CompletionRequest, LlmClient};
use crate::script::{chunk_for_tts, ScriptCleaner};

/// Average speaking rate used for duration estimates
pub const WORDS_PER_MINUTE: usize = 150;

/// A script generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub topic: String,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    #[serde(default)]
    pub tone: Option<String>,
    /// Output language code; English when unset
    #[serde(default)]
    pub language: Option<String>,
}

fn default_duration_secs() -> u32 {
    60
}

impl ScriptRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            duration_secs: default_duration_secs(),
            tone: None,
            language: None,
        }
    }

    pub fn duration(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A generated script with its narration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedScript {
    pub topic: String,
    /// Script as written by the model
    pub raw: String,
    /// Cleaned, speakable text
    pub narration: String,
    /// Narration split for TTS requests
    pub chunks: Vec<String>,
    pub word_count: usize,
    pub estimated_duration_secs: u32,
}

/// Seconds needed to speak `words` words, rounded up
pub fn estimate_duration_secs(words: usize) -> u32 {
    ((words * 60).div_ceil(WORDS_PER_MINUTE)) as u32
}

/// Writes video scripts and extracts their narration
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    client: Arc<dyn LlmClient>,
    cleaner: ScriptCleaner,
    chunk_chars: usize,
    temperature: f32,
    max_tokens: u32,
}

impl ScriptGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            cleaner: ScriptCleaner::new(),
            chunk_chars: 3000,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    pub fn with_cleaner(mut self, cleaner: ScriptCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Maximum characters per TTS chunk (0 keeps the narration whole)
    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars;
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Build the completion request for `request`
    pub fn build_request(&self, request: &ScriptRequest) -> CompletionRequest {
        let language_code = request.language.as_deref().unwrap_or("en");
        let language = language_utils::get_language_name(language_code).unwrap_or_else(|_| language_code.to_string());
        let duration = request.duration_secs.to_string();
        let word_target = (request.duration_secs as usize * WORDS_PER_MINUTE / 60).to_string();

        let vars = [
            ("language", language.as_str()),
            ("tone", request.tone.as_deref().unwrap_or("engaging")),
            ("duration_secs", duration.as_str()),
            ("word_target", word_target.as_str()),
            ("topic", request.topic.trim()),
        ];

        CompletionRequest::new(PromptTemplate::new(PromptTemplate::SCRIPT_USER).render(&vars))
            .system(PromptTemplate::new(PromptTemplate::SCRIPT_SYSTEM).render(&vars))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
    }

    /// Clean and measure a raw script
    pub fn finish(&self, topic: &str, raw: &str) -> Result<GeneratedScript, GenerationError> {
        let raw = strip_code_fences(raw);
        let narration = self.cleaner.clean(&raw);
        if narration.is_empty() {
            return Err(GenerationError::EmptyScript);
        }

        let word_count = narration.split_whitespace().count();
        let chunks = chunk_for_tts(&narration, self.chunk_chars);

        Ok(GeneratedScript {
            topic: topic.to_string(),
            raw,
            chunks,
            word_count,
            estimated_duration_secs: estimate_duration_secs(word_count),
            narration,
        })
    }

    /// Generate one script
    pub async fn generate(&self, request: &ScriptRequest) -> Result<GeneratedScript, GenerationError> {
        if request.topic.trim().is_empty() {
            return Err(GenerationError::EmptyTopic);
        }

        let started = Instant::now();
        let completion = self.client.complete(self.build_request(request)).await?;
        let script = self.finish(request.topic.trim(), &completion.text)?;

        debug!(
            "Script for '{}' generated in {}ms: {} words, ~{}s",
            script.topic,
            started.elapsed().as_millis(),
            script.word_count,
            script.estimated_duration_secs
        );

        Ok(script)
    }

    /// Generate several scripts with at most `concurrency` provider calls in flight
    ///
    /// Results are returned in the order of `requests`.
    pub async fn generate_many(
        &self,
        requests: Vec<ScriptRequest>,
        concurrency: usize,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Vec<Result<GeneratedScript, GenerationError>> {
        let concurrency = concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let total = requests.len();
        let completed = Arc::new(AtomicUsize::new(0));

        info!("Generating {} script(s) with {} concurrent request(s)", total, concurrency);

        let mut results = stream::iter(requests.into_iter().enumerate())
            .map(|(index, request)| {
                let generator = self.clone();
                let semaphore = semaphore.clone();
                let completed = completed.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    let result = match semaphore.acquire().await {
                        Ok(_permit) => generator.generate(&request).await,
                        Err(e) => Err(GenerationError::Provider(ProviderError::RequestFailed(e.to_string()))),
                    };

                    if let Err(e) = &result {
                        error!("Script {} ('{}') failed: {}", index + 1, request.topic, e);
                    }

                    let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total);

                    (index, result)
                }
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<_>>()
            .await;

        // Restore input order
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }
}
