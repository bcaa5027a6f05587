/*!
 * Tests for prompt enhancement
 */

use std::sync::Arc;
use scriptsmith::enhancer::{parse_variations, EnhanceContext, EnhanceRequest, PromptEnhancer, MAX_VARIATIONS};
use scriptsmith::errors::EnhanceError;
use scriptsmith::providers::MockProvider;

#[test]
fn test_parseVariations_withNumberedList_shouldSplitTitles() {
    let text = "Here are some ideas:\n1. **Golden Hour**: A drone shot over wheat fields\n2) A macro shot of dew on grass\n";
    let variations = parse_variations(text, 5).unwrap();

    assert_eq!(variations.len(), 2);
    assert_eq!(variations[0].title, "Golden Hour");
    assert_eq!(variations[0].prompt, "A drone shot over wheat fields");
    assert_eq!(variations[1].title, "Variation 2");
    assert_eq!(variations[1].prompt, "A macro shot of dew on grass");
}

#[test]
fn test_parseVariations_withAlternativeKeys_shouldReadPrompt() {
    let text = r#"{"prompts": [{"enhanced_prompt": "Neon city at night"}, {"description": "Foggy pier"}]}"#;
    let variations = parse_variations(text, 10).unwrap();

    assert_eq!(variations.len(), 2);
    assert_eq!(variations[0].prompt, "Neon city at night");
    assert_eq!(variations[1].prompt, "Foggy pier");
}

#[test]
fn test_parseVariations_withMoreThanRequested_shouldTruncate() {
    let text = r#"["a", "b", "c", "d"]"#;
    assert_eq!(parse_variations(text, 3).unwrap().len(), 3);
}

#[test]
fn test_parseVariations_withNothingUsable_shouldFail() {
    let result = parse_variations("I cannot help with that request.", 3);
    assert!(matches!(result, Err(EnhanceError::Unparseable(_))));
}

#[test]
fn test_enhanceRequestValidate_shouldRejectBadInput() {
    assert!(matches!(EnhanceRequest::new("  ", 3).validate(), Err(EnhanceError::EmptyPrompt)));
    assert!(matches!(EnhanceRequest::new("idea", 0).validate(), Err(EnhanceError::InvalidCount(0))));
    assert!(matches!(
        EnhanceRequest::new("idea", MAX_VARIATIONS + 1).validate(),
        Err(EnhanceError::InvalidCount(11))
    ));
    assert!(EnhanceRequest::new("idea", MAX_VARIATIONS).validate().is_ok());
}

#[tokio::test]
async fn test_enhance_shouldRenderContextIntoPrompt() {
    let provider = MockProvider::scripted([r#"{"variations":[{"title":"T","prompt":"P"}]}"#]);
    let enhancer = PromptEnhancer::new(Arc::new(provider.clone()));
    let context = EnhanceContext {
        tone: Some("playful".to_string()),
        audience: Some("kids".to_string()),
        platform: Some("YouTube Shorts".to_string()),
        duration_secs: Some(30),
        language: Some("fr".to_string()),
    };

    let variations = enhancer
        .enhance(&EnhanceRequest::new("a cat learning to surf", 4).with_context(context))
        .await
        .unwrap();
    assert_eq!(variations.len(), 1);

    let sent = &provider.requests()[0];
    assert!(sent.json_output);
    assert!(sent.prompt.contains("Tone: playful"));
    assert!(sent.prompt.contains("Audience: kids"));
    assert!(sent.prompt.contains("Platform: YouTube Shorts"));
    assert!(sent.prompt.contains("Target duration: 30 seconds"));
    assert!(sent.prompt.ends_with("a cat learning to surf"));

    let system = sent.system.as_deref().unwrap_or_default();
    assert!(system.contains("exactly 4 variations"));
    assert!(system.contains("French"));
}

#[tokio::test]
async fn test_enhance_withInvalidRequest_shouldNotCallProvider() {
    let provider = MockProvider::working();
    let enhancer = PromptEnhancer::new(Arc::new(provider.clone()));

    let result = enhancer.enhance(&EnhanceRequest::new("", 3)).await;

    assert!(matches!(result, Err(EnhanceError::EmptyPrompt)));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_enhance_withFailingProvider_shouldReturnProviderError() {
    let enhancer = PromptEnhancer::new(Arc::new(MockProvider::failing()));
    let result = enhancer.enhance(&EnhanceRequest::new("idea", 2)).await;
    assert!(matches!(result, Err(EnhanceError::Provider(_))));
}
