/*!
 * Provider implementations for the generative language APIs.
 *
 * This module contains client implementations for the supported providers:
 * - Gemini: Google generative language API
 * - Ollama: Local LLM server
 * - Mock: Scripted provider for tests
 */

use async_trait::async_trait;
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
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    ///
    /// # Arguments
    /// * `response` - The response from the provider
    ///
    /// # Returns
    /// * `String` - The extracted text
    fn extract_text(response: &Self::Response) -> String;
}

/// Delay before retry number `attempt` (1-based).
///
/// Exponential backoff from `backoff_base_ms`, never shorter than the spacing
/// implied by a requests-per-minute `rate_limit`.
pub fn retry_delay(attempt: u32, backoff_base_ms: u64, rate_limit: Option<u32>) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let backoff_ms = backoff_base_ms.saturating_mul(1u64 << exponent);

    let spacing_ms = match rate_limit {
        Some(limit) if limit > 0 => 60_000 / limit as u64,
        _ => 0,
    };

    Duration::from_millis(backoff_ms.max(spacing_ms))
}

/// Shorten a response body for log and error messages
pub(crate) fn truncate_body(body: &str) -> String {
    if body.chars().count() > 500 {
        format!("{}…", body.chars().take(500).collect::<String>())
    } else {
        body.to_string()
    }
}

pub mod gemini;
pub mod mock;
pub mod ollama;
