/*!
 * Tests for error types
 */

use std::error::Error;
use ltwai::errors::{AppError, ProviderError, TextError, TranslationError};

/// Messages carry the details of the failure
#[test]
fn test_provider_error_display_shouldIncludeDetails() {
    let api_error = ProviderError::ApiError { status_code: 500, message: "boom".to_string() };
    assert_eq!(api_error.to_string(), "API responded with error: 500 - boom");
    assert_eq!(ProviderError::EmptyResponse.to_string(), "Provider returned an empty translation");
}

/// Only transient failures are retried
#[test]
fn test_provider_error_isRetryable_shouldOnlyAcceptTransientErrors() {
    assert!(ProviderError::ConnectionError("reset".to_string()).is_retryable());
    assert!(ProviderError::RateLimitExceeded("slow down".to_string()).is_retryable());
    assert!(ProviderError::ApiError { status_code: 502, message: String::new() }.is_retryable());

    assert!(!ProviderError::ApiError { status_code: 404, message: String::new() }.is_retryable());
    assert!(!ProviderError::AuthenticationError("bad key".to_string()).is_retryable());
    assert!(!ProviderError::ParseError("eof".to_string()).is_retryable());
    assert!(!ProviderError::EmptyResponse.is_retryable());
}

/// The chunk failure names the chunk and keeps the provider error as source
#[test]
fn test_chunk_translation_failed_shouldExposeChunkAndSource() {
    let error = TranslationError::ChunkTranslationFailed {
        chunk_index: 2,
        total_chunks: 3,
        source: ProviderError::ConnectionError("timeout".to_string()),
    };

    assert_eq!(error.to_string(), "Translation of chunk 2/3 failed: Connection error: timeout");
    let source = error.source().expect("source error");
    assert_eq!(source.to_string(), "Connection error: timeout");
}

/// Configuration errors pass through unchanged
#[test]
fn test_translation_error_fromTextError_shouldBeTransparent() {
    let error: TranslationError = TextError::InvalidConfiguration("max_chars must be greater than zero".to_string()).into();

    assert_eq!(error.to_string(), "Invalid configuration: max_chars must be greater than zero");
}

/// Lower-level errors convert into the application error
#[test]
fn test_app_error_conversions_shouldWrapUnderlyingErrors() {
    let from_provider: AppError = ProviderError::EmptyResponse.into();
    assert!(matches!(from_provider, AppError::Provider(ProviderError::EmptyResponse)));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("something odd").into();
    assert_eq!(from_anyhow.to_string(), "Unknown error: something odd");
}
