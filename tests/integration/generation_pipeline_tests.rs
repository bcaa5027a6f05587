/*!
 * Integration tests for the provider-backed generation pipeline
 */

use anyhow::Result;

use scriptsmith::contract::{ContractKind, ContractRequest, Party};
use scriptsmith::database::GenerationKind;
use scriptsmith::enhancer::{EnhanceContext, EnhanceRequest, PromptVariation};
use scriptsmith::generator::ScriptRequest;
use scriptsmith::providers::MockProvider;
use crate::common;

#[tokio::test]
async fn test_enhance_withWorkingProvider_shouldStoreVariationsAsJson() -> Result<()> {
    common::init_test_logger();
    let controller = common::mock_controller(MockProvider::working())?;
    let request = EnhanceRequest::new("  a cat learning to surf ", 3).with_context(EnhanceContext {
        platform: Some("TikTok".to_string()),
        ..EnhanceContext::default()
    });

    let variations = controller.enhance(&request).await?;

    assert_eq!(variations.len(), 1);
    assert_eq!(variations[0].title, "Mock variation");
    assert_eq!(variations[0].prompt, "a cat learning to surf");

    let history = controller.history_list(Some(GenerationKind::Enhancement), 10).await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].prompt, "a cat learning to surf");
    let stored: Vec<PromptVariation> = serde_json::from_str(&history[0].content)?;
    assert_eq!(stored, variations);

    Ok(())
}

#[tokio::test]
async fn test_generateScript_withWorkingProvider_shouldReturnCleanNarration() -> Result<()> {
    let provider = MockProvider::working();
    let controller = common::mock_controller(provider.clone())?;

    let script = controller
        .generate_script(&ScriptRequest::new("tide pools").duration(30).tone("calm"))
        .await?;

    assert!(script.raw.contains("[SCENE: studio]"));
    assert!(script.narration.starts_with("This is a mock answer."));
    assert!(script.narration.ends_with("tide pools"));
    assert!(!script.narration.contains("0:00"));
    assert_eq!(script.chunks.len(), 1);
    assert!(script.estimated_duration_secs > 0);

    let sent = &provider.requests()[0];
    assert!(sent.prompt.contains("calm video script of about 30 seconds"));

    Ok(())
}

#[tokio::test]
async fn test_generateScript_withBlankTopic_shouldNotCallProvider() -> Result<()> {
    let provider = MockProvider::working();
    let controller = common::mock_controller(provider.clone())?;

    assert!(controller.generate_script(&ScriptRequest::new("   ")).await.is_err());
    assert_eq!(provider.request_count(), 0);
    assert_eq!(controller.history_stats().await?.total, 0);

    Ok(())
}

#[tokio::test]
async fn test_generateScript_withFailingProvider_shouldStoreNothing() -> Result<()> {
    let controller = common::mock_controller(MockProvider::failing())?;

    let error = controller.generate_script(&ScriptRequest::new("volcanoes")).await.unwrap_err();

    assert!(format!("{:#}", error).contains("Simulated provider failure"));
    assert_eq!(controller.history_stats().await?.total, 0);

    Ok(())
}

/// Half of the requests fail; successes keep their input positions
#[tokio::test]
async fn test_generateScripts_withIntermittentProvider_shouldKeepInputOrder() -> Result<()> {
    let controller = common::mock_controller(MockProvider::intermittent(2))?;
    let topics = ["bees", "comets", "deserts", "glaciers"];

    let results = controller
        .generate_scripts(topics.iter().map(|topic| ScriptRequest::new(*topic)).collect())
        .await;

    assert_eq!(results.len(), topics.len());
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    for (topic, result) in topics.iter().zip(&results) {
        if let Ok(script) = result {
            assert_eq!(script.topic, *topic);
            assert!(script.narration.ends_with(topic));
        }
    }

    let stats = controller.history_stats().await?;
    assert_eq!(stats.scripts, 2);

    Ok(())
}

#[tokio::test]
async fn test_generateScripts_withSlowProvider_shouldCompleteEveryRequest() -> Result<()> {
    let provider = MockProvider::slow(20);
    let controller = common::mock_controller(provider.clone())?;
    let requests: Vec<ScriptRequest> = (1..=6).map(|i| ScriptRequest::new(format!("topic {}", i))).collect();

    let results = controller.generate_scripts(requests).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(provider.request_count(), 6);
    assert_eq!(results[5].as_ref().map(|s| s.topic.as_str()).ok(), Some("topic 6"));

    Ok(())
}

#[tokio::test]
async fn test_buildContract_withAi_shouldStoreRequestAndDraftedBody() -> Result<()> {
    let provider = MockProvider::scripted([
        "**1. Deliverables.** {{party_b}} shall deliver {{deliverables}} by {{deadline}}.\n\n**2. Payment.** {{party_a}} pays {{rate}}.",
    ]);
    let controller = common::mock_controller(provider.clone())?;
    let request = ContractRequest::new(
        ContractKind::Freelance,
        vec![Party::new("Studio North"), Party::new("Lee Park").role("Illustrator")],
    )
    .term("deliverables", "twelve illustrations")
    .term("rate", "$2,400")
    .term("deadline", "June 30")
    .jurisdiction("Ontario");

    let contract = controller.build_contract(&request, true).await?;

    assert!(contract.markdown.contains("Lee Park shall deliver twelve illustrations by June 30."));
    assert!(contract.markdown.contains("**2. Payment.** Studio North pays $2,400."));
    assert!(contract.markdown.contains("**Lee Park** (Illustrator)"));
    assert!(contract.markdown.contains("the laws of Ontario."));
    assert_eq!(provider.request_count(), 1);

    let history = controller.history_list(Some(GenerationKind::Contract), 5).await?;
    assert_eq!(history.len(), 1);
    let stored_request: ContractRequest = serde_json::from_str(&history[0].prompt)?;
    assert_eq!(stored_request, request);
    assert_eq!(history[0].content, contract.markdown);

    Ok(())
}
