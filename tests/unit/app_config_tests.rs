/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;
use std::str::FromStr;

use scriptsmith::app_config::{AiProvider, Config, LogLevel, ProviderConfig};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language, "en");
    assert_eq!(config.generation.provider, AiProvider::Gemini);
    assert_eq!(config.generation.get_model(), "gemini-1.5-flash");
    assert_eq!(config.generation.get_endpoint(), "https://generativelanguage.googleapis.com");
    assert_eq!(config.generation.get_timeout_secs(), 60);
    assert_eq!(config.generation.get_rate_limit(), Some(15));

    assert_eq!(config.generation.common.retry_count, 3);
    assert_eq!(config.generation.common.variation_count, 3);
    assert_eq!(config.generation.optimal_concurrent_requests(), 4);

    assert!(config.cleaner.strip_speaker_labels);
    assert_eq!(config.cleaner.tts_chunk_chars, 3000);
    assert!(config.storage.enabled);
    assert!(config.storage.database_path.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.language, "en");

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"provider\": \"gemini\""));
}

#[test]
fn test_loadOrCreate_withExistingFile_shouldReadIt() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "language": "de",
            "generation": {
                "provider": "openrouter",
                "available_providers": [
                    {"type": "openrouter", "model": "mistral/small", "api_key": "sk-test", "endpoint": "https://example.org/v1/"}
                ],
                "common": {"temperature": 0.2}
            },
            "cleaner": {"strip_list_markers": false},
            "storage": {"database_path": "/tmp/history.db"},
            "log_level": "debug"
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.language, "de");
    assert_eq!(config.generation.provider, AiProvider::OpenRouter);
    assert_eq!(config.generation.get_model(), "mistral/small");
    assert_eq!(config.generation.get_api_key(), "sk-test");
    assert_eq!(config.generation.get_endpoint(), "https://example.org/v1");
    assert_eq!(config.generation.common.temperature, 0.2);
    assert_eq!(config.generation.common.max_tokens, 2048);
    assert!(!config.cleaner.options().strip_list_markers);
    assert!(config.cleaner.options().strip_speaker_labels);
    assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/history.db"));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    let error = Config::load_or_create(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("Failed to parse config file"));
}

#[test]
fn test_validate_withoutApiKey_shouldNameEnvironmentVariable() {
    if std::env::var("GROQ_API_KEY").is_ok() {
        return;
    }

    let mut config = Config::default();
    config.generation.provider = AiProvider::Groq;

    let message = config.validate().unwrap_err().to_string();
    assert!(message.contains("Groq"));
    assert!(message.contains("GROQ_API_KEY"));
}

#[test]
fn test_getRateLimit_withoutProviderEntry_shouldUseProviderDefault() {
    let mut config = Config::default();
    config.generation.provider = AiProvider::Groq;
    config.generation.available_providers.clear();

    assert_eq!(config.generation.get_rate_limit(), Some(30));
    assert_eq!(config.generation.get_model(), "llama-3.1-8b-instant");

    config.generation.set_model("llama-3.3-70b");
    assert_eq!(config.generation.available_providers.len(), 1);
    assert_eq!(config.generation.get_model(), "llama-3.3-70b");
}

#[test]
fn test_providerConfig_new_shouldUseProviderDefaults() {
    let config = ProviderConfig::new(AiProvider::OpenRouter);
    assert_eq!(config.provider_type, "openrouter");
    assert_eq!(config.endpoint, "https://openrouter.ai/api/v1");
    assert!(config.api_key.is_empty());
}

#[test]
fn test_logLevel_fromStr_shouldAcceptWarningAlias() {
    assert_eq!(LogLevel::from_str("WARNING").unwrap(), LogLevel::Warn);
    assert_eq!(LogLevel::from_str("trace").unwrap().to_level_filter(), log::LevelFilter::Trace);
    assert!(LogLevel::from_str("loud").is_err());
}
