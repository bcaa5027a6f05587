/*!
 * Tests for error types and conversions
 */

use scriptsmith::errors::{AppError, ContractError, EnhanceError, GenerationError, ProviderError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_isRetryable_shouldOnlyAcceptTransientFailures() {
    assert!(ProviderError::ConnectionError("reset".to_string()).is_retryable());
    assert!(ProviderError::RateLimitExceeded("slow down".to_string()).is_retryable());
    assert!(ProviderError::ApiError { status_code: 503, message: "busy".to_string() }.is_retryable());

    assert!(!ProviderError::ApiError { status_code: 400, message: "bad".to_string() }.is_retryable());
    assert!(!ProviderError::AuthenticationError("no key".to_string()).is_retryable());
    assert!(!ProviderError::ParseError("junk".to_string()).is_retryable());
    assert!(!ProviderError::RequestFailed("dns".to_string()).is_retryable());
}

#[test]
fn test_enhanceError_invalidCount_shouldNameTheLimit() {
    let display = EnhanceError::InvalidCount(42).to_string();
    assert_eq!(display, "Invalid variation count 42: expected 1 to 10");
}

#[test]
fn test_contractError_missingTerms_shouldListKeys() {
    let error = ContractError::MissingTerms(vec!["fees".to_string(), "services".to_string()]);
    assert_eq!(error.to_string(), "Missing required terms: fees, services");
}

#[test]
fn test_providerError_intoDomainErrors_shouldKeepMessage() {
    let enhance: EnhanceError = ProviderError::AuthenticationError("bad key".to_string()).into();
    assert!(matches!(enhance, EnhanceError::Provider(ProviderError::AuthenticationError(_))));
    assert!(enhance.to_string().contains("bad key"));

    let generation: GenerationError = ProviderError::ConnectionError("offline".to_string()).into();
    assert!(matches!(generation, GenerationError::Provider(_)));
}

#[test]
fn test_appError_fromDomainErrors_shouldWrapEachKind() {
    let app: AppError = GenerationError::EmptyTopic.into();
    assert_eq!(app.to_string(), "Generation error: Script topic is empty");

    let app: AppError = ContractError::NotEnoughParties(1).into();
    assert!(matches!(app, AppError::Contract(ContractError::NotEnoughParties(1))));

    let app: AppError = EnhanceError::EmptyPrompt.into();
    assert!(matches!(app, AppError::Enhance(_)));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
    let app: AppError = io.into();
    assert!(matches!(app, AppError::File(_)));
    assert!(app.to_string().contains("missing.txt"));
}

#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let app: AppError = anyhow::anyhow!("something odd").into();
    assert_eq!(app.to_string(), "Unknown error: something odd");
}
