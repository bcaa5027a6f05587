use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;
use url::Url;

use crate::script::CleanerOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Output language code (ISO)
    #[serde(default = "default_language")]
    pub language: String,

    /// Generation config
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Script cleaner config
    #[serde(default)]
    pub cleaner: CleanerConfig,

    /// Result storage config
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// LLM provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Groq (OpenAI-compatible)
    Groq,
    // @provider: OpenRouter (OpenAI-compatible)
    OpenRouter,
    // @provider: Scripted responses, no network
    Mock,
}

impl AiProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Groq => "Groq",
            Self::OpenRouter => "OpenRouter",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Groq => "groq".to_string(),
            Self::OpenRouter => "openrouter".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }

    // @returns: Environment variable holding the API key, if any
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::Groq => Some("GROQ_API_KEY"),
            Self::OpenRouter => Some("OPENROUTER_API_KEY"),
            Self::Mock => None,
        }
    }

    fn default_model(&self) -> String {
        match self {
            Self::Gemini => "gemini-1.5-flash".to_string(),
            Self::Groq => "llama-3.1-8b-instant".to_string(),
            Self::OpenRouter => "meta-llama/llama-3.1-8b-instruct:free".to_string(),
            Self::Mock => "mock-model".to_string(),
        }
    }

    fn default_endpoint(&self) -> String {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com".to_string(),
            Self::Groq => "https://api.groq.com/openai/v1".to_string(),
            Self::OpenRouter => "https://openrouter.ai/api/v1".to_string(),
            Self::Mock => String::new(),
        }
    }

    fn default_rate_limit(&self) -> Option<u32> {
        match self {
            Self::Gemini => Some(15), // free tier requests per minute
            Self::Groq => Some(30),
            Self::OpenRouter => Some(20),
            Self::Mock => None,
        }
    }
}

// Implement Display trait for AiProvider
impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for AiProvider
impl std::str::FromStr for AiProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "groq" => Ok(Self::Groq),
            "openrouter" => Ok(Self::OpenRouter),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: AiProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: provider_type.default_model(),
            api_key: String::new(),
            endpoint: provider_type.default_endpoint(),
            timeout_secs: default_timeout_secs(),
            rate_limit: provider_type.default_rate_limit(),
        }
    }
}

/// Generation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: AiProvider,

    /// Available providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common generation settings
    #[serde(default)]
    pub common: GenerationCommonConfig,
}

/// Common generation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationCommonConfig {
    /// Temperature parameter for text generation (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Default number of prompt variations
    #[serde(default = "default_variation_count")]
    pub variation_count: usize,

    /// Maximum number of concurrent provider requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

impl Default for GenerationCommonConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            variation_count: default_variation_count(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

/// Script cleaner configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CleanerConfig {
    /// Remove `Host:` style labels at line start
    #[serde(default = "default_true")]
    pub strip_speaker_labels: bool,

    /// Remove timestamps that are not wrapped in parentheses
    #[serde(default = "default_true")]
    pub strip_bare_timestamps: bool,

    /// Remove bullet and numbering markers in front of narration
    #[serde(default = "default_true")]
    pub strip_list_markers: bool,

    /// Maximum characters per TTS chunk (0 disables chunking)
    #[serde(default = "default_tts_chunk_chars")]
    pub tts_chunk_chars: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            strip_speaker_labels: true,
            strip_bare_timestamps: true,
            strip_list_markers: true,
            tts_chunk_chars: default_tts_chunk_chars(),
        }
    }
}

impl CleanerConfig {
    /// Cleaner options described by this config
    pub fn options(&self) -> CleanerOptions {
        CleanerOptions {
            strip_speaker_labels: self.strip_speaker_labels,
            strip_bare_timestamps: self.strip_bare_timestamps,
            strip_list_markers: self.strip_list_markers,
        }
    }
}

/// Result storage configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Whether generated results are saved
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Database file; the platform data directory is used when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_variation_count() -> usize {
    3
}

fn default_tts_chunk_chars() -> usize {
    3000
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file, writing defaults when it is missing
    pub fn load_or_create(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            log::info!("Created default configuration at {}", path.display());
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration as pretty JSON
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        crate::file_utils::FileManager::write_to_file(path, &content)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate language
        let _language_name = crate::language_utils::get_language_name(&self.language)?;

        let temperature = self.generation.common.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0, got {}", temperature));
        }

        if self.generation.provider == AiProvider::Mock {
            return Ok(());
        }

        if self.generation.get_api_key().is_empty() {
            let env_hint = self
                .generation
                .provider
                .api_key_env_var()
                .map(|var| format!(" (or set {})", var))
                .unwrap_or_default();
            return Err(anyhow!(
                "API key is required for {} provider{}",
                self.generation.provider.display_name(),
                env_hint
            ));
        }

        let endpoint = self.generation.get_endpoint();
        Url::parse(&endpoint).with_context(|| format!("Invalid provider endpoint: {}", endpoint))?;

        Ok(())
    }

    /// Database location, falling back to the platform data directory
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        crate::database::DatabaseConnection::default_database_path()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            generation: GenerationConfig::default(),
            cleaner: CleanerConfig::default(),
            storage: StorageConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl GenerationConfig {
    pub fn optimal_concurrent_requests(&self) -> usize {
        self.common.concurrent_requests.max(1)
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &AiProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        self.provider.default_model()
    }

    /// Get the API key for the active provider, falling back to its environment variable
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        self.provider
            .api_key_env_var()
            .and_then(|var| std::env::var(var).ok())
            .map(|key| key.trim().to_string())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.trim_end_matches('/').to_string();
            }
        }

        self.provider.default_endpoint()
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Get the rate limit for the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.rate_limit;
        }

        self.provider.default_rate_limit()
    }

    /// Override the model of the active provider, adding an entry when needed
    pub fn set_model(&mut self, model: &str) {
        let provider = self.provider;
        match self
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider.to_lowercase_string())
        {
            Some(config) => config.model = model.to_string(),
            None => {
                let mut config = ProviderConfig::new(provider);
                config.model = model.to_string();
                self.available_providers.push(config);
            }
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            available_providers: vec![
                ProviderConfig::new(AiProvider::Gemini),
                ProviderConfig::new(AiProvider::Groq),
                ProviderConfig::new(AiProvider::OpenRouter),
                ProviderConfig::new(AiProvider::Mock),
            ],
            common: GenerationCommonConfig::default(),
        }
    }
}
