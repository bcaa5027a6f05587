/*!
 * Error types for the scriptsmith application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether a request that failed with this error is worth sending again
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Errors that can occur while enhancing a prompt
#[derive(Error, Debug)]
pub enum EnhanceError {
    /// The prompt was blank
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// The requested number of variations is out of range
    #[error("Invalid variation count {0}: expected 1 to {max}", max = crate::enhancer::MAX_VARIATIONS)]
    InvalidCount(usize),

    /// The model answer held no usable variations
    #[error("Could not read variations from response: {0}")]
    Unparseable(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors that can occur while generating a video script
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The topic was blank
    #[error("Script topic is empty")]
    EmptyTopic,

    /// The model answer held no narration after cleaning
    #[error("Generated script contains no narration")]
    EmptyScript,

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors that can occur while assembling a contract
#[derive(Error, Debug)]
pub enum ContractError {
    /// Fewer than two parties were supplied
    #[error("A contract needs at least two parties, got {0}")]
    NotEnoughParties(usize),

    /// Required terms for the contract kind were not supplied
    #[error("Missing required terms: {}", .0.join(", "))]
    MissingTerms(Vec<String>),

    /// The contract kind name is not known
    #[error("Unknown contract kind: {0}")]
    UnknownKind(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from prompt enhancement
    #[error("Enhance error: {0}")]
    Enhance(#[from] EnhanceError),

    /// Error from script generation
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Error from contract assembly
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
