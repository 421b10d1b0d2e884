/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported LLM providers:
 * - OpenAI: OpenAI chat completions API (also used for LM Studio)
 * - Anthropic: Anthropic messages API
 * - Mock: in-process backend for tests and benchmarks
 */

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use std::fmt::Debug;
use std::time::Duration;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// A fallible `translate(text, source, target)` function
///
/// This is the only thing the parallel translator knows about the outside world.
/// Implementations must be safe to call from many tasks at once.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` from `source_language` to `target_language`
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String, ProviderError>;
}

/// HTTP client with the configured request timeout
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))
}

/// Turn a non-success response into a provider error
pub(crate) async fn error_from_response(provider: &str, response: Response) -> ProviderError {
    let status = response.status().as_u16();
    let error_text = response.text().await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    status_error(provider, status, error_text)
}

// Logged at debug level only: the caller records the failure and reports it
// once the progress bar is gone.
fn status_error(provider: &str, status_code: u16, error_text: String) -> ProviderError {
    debug!("{} API error ({}): {}", provider, status_code, error_text);
    ProviderError::from_status(status_code, error_text)
}

pub mod openai;
pub mod anthropic;
pub mod mock;
