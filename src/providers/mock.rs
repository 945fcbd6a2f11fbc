/*!
 * Mock provider implementation for testing.
 *
 * The mock never touches the network and can simulate the failures the
 * chunked translation has to deal with:
 * - `MockProvider::working()` - Always succeeds with a tagged echo of the input
 * - `MockProvider::failing_on(n)` - Fails on the n-th call only
 * - `MockProvider::failing()` - Always fails with a connection error
 * - `MockProvider::empty()` - Succeeds with an empty text
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::translation::ChunkTranslator;

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Source language
    pub source_language: String,
    /// Target language
    pub target_language: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails on the given 1-based call number, succeeds otherwise
    FailOnCall { call: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty text
    Empty,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of requests received
    request_count: Arc<AtomicUsize>,
    /// Texts of the received requests, in order
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider failing on the given call
    pub fn failing_on(call: usize) -> Self {
        Self::new(MockBehavior::FailOnCall { call })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts of the requests received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// The translation the mock produces for `text`
    pub fn translate_echo(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: MockRequest) -> Result<MockResponse, ProviderError> {
        let call = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().push(request.text.clone());

        let echo = MockResponse {
            text: Self::translate_echo(&request.text, &request.target_language),
        };

        match self.behavior {
            MockBehavior::Working => Ok(echo),
            MockBehavior::FailOnCall { call: failing_call } if failing_call == call => {
                Err(ProviderError::ConnectionError(format!("Simulated failure on call {}", call)))
            }
            MockBehavior::FailOnCall { .. } => Ok(echo),
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated failure".to_string())),
            MockBehavior::Empty => Ok(MockResponse { text: String::new() }),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(echo)
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated failure".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &MockResponse) -> String {
        response.text.clone()
    }
}

#[async_trait]
impl ChunkTranslator for MockProvider {
    async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let response = self.complete(MockRequest {
            text: chunk.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }).await?;

        Ok(Self::extract_text(&response))
    }
}
