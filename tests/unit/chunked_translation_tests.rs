/*!
 * Tests for chunk-by-chunk translation with the mock provider
 */

use std::time::{Duration, Instant};
use ltwai::errors::{ProviderError, TextError, TranslationError};
use ltwai::providers::mock::MockProvider;
use ltwai::text_chunker::{split_text, DEFAULT_MAX_CHARS_PER_CHUNK};
use ltwai::translation::ChunkedTranslator;
use crate::common;

/// Each chunk is translated once, in order, and joined with blank lines
#[tokio::test]
async fn test_translate_withSixtyThousandChars_shouldTranslateThreeChunksInOrder() {
    let text = common::generate_text(60_000);
    let expected_chunks = split_text(&text, DEFAULT_MAX_CHARS_PER_CHUNK).unwrap();
    let translator = ChunkedTranslator::new(MockProvider::working(), DEFAULT_MAX_CHARS_PER_CHUNK);

    let outcome = translator.translate(&text, "pt", "en", |_, _| {}).await.unwrap();

    assert_eq!(outcome.chunk_count, 3);
    assert_eq!(translator.translator().call_count(), 3);
    assert_eq!(translator.translator().requests(), expected_chunks);

    let expected_text = expected_chunks.iter()
        .map(|chunk| MockProvider::translate_echo(chunk, "en"))
        .collect::<Vec<_>>()
        .join("\n\n");
    assert_eq!(outcome.translated_text, expected_text);
}

/// A failure aborts the run and later chunks are never submitted
#[tokio::test]
async fn test_translate_withFailureOnSecondChunk_shouldAbortWithChunkIndex() {
    let text = common::generate_text(60_000);
    let translator = ChunkedTranslator::new(MockProvider::failing_on(2), DEFAULT_MAX_CHARS_PER_CHUNK);
    let mut progress_calls = Vec::new();

    let result = translator.translate(&text, "pt", "en", |done, total| progress_calls.push((done, total))).await;

    match result {
        Err(TranslationError::ChunkTranslationFailed { chunk_index, total_chunks, source }) => {
            assert_eq!(chunk_index, 2);
            assert_eq!(total_chunks, 3);
            assert!(matches!(source, ProviderError::ConnectionError(_)));
        }
        other => panic!("Expected ChunkTranslationFailed, got {:?}", other),
    }

    assert_eq!(translator.translator().call_count(), 2);
    assert_eq!(progress_calls, vec![(1, 3)]);
}

/// A failing single-chunk text reports chunk 1 of 1
#[tokio::test]
async fn test_translate_withFailingProvider_shouldReportFirstChunk() {
    let translator = ChunkedTranslator::new(MockProvider::failing(), 100);

    let error = translator.translate("Short text.", "pt", "en", |_, _| {}).await.unwrap_err();

    assert!(matches!(
        error,
        TranslationError::ChunkTranslationFailed { chunk_index: 1, total_chunks: 1, .. }
    ));
    assert!(error.to_string().contains("chunk 1/1"));
}

/// A blank translation counts as a failure
#[tokio::test]
async fn test_translate_withEmptyResponse_shouldFailWithEmptyResponse() {
    let translator = ChunkedTranslator::new(MockProvider::empty(), 100);

    let error = translator.translate("Some text.", "pt", "en", |_, _| {}).await.unwrap_err();

    match error {
        TranslationError::ChunkTranslationFailed { source, .. } => {
            assert!(matches!(source, ProviderError::EmptyResponse));
        }
        other => panic!("Expected ChunkTranslationFailed, got {:?}", other),
    }
}

/// Empty input makes no provider call
#[tokio::test]
async fn test_translate_withEmptyText_shouldReturnEmptyOutcome() {
    let translator = ChunkedTranslator::new(MockProvider::working(), 100);

    let outcome = translator.translate("   ", "pt", "en", |_, _| panic!("no progress expected")).await.unwrap();

    assert_eq!(outcome.translated_text, "");
    assert_eq!(outcome.chunk_count, 0);
    assert_eq!(translator.translator().call_count(), 0);
}

/// A zero chunk size is rejected before any request
#[tokio::test]
async fn test_translate_withZeroChunkSize_shouldFailWithInvalidConfiguration() {
    let translator = ChunkedTranslator::new(MockProvider::working(), 0);

    let error = translator.translate("Text.", "pt", "en", |_, _| {}).await.unwrap_err();

    assert!(matches!(error, TranslationError::InvalidConfiguration(TextError::InvalidConfiguration(_))));
    assert_eq!(translator.translator().call_count(), 0);
}

/// Progress is reported after every chunk
#[tokio::test]
async fn test_translate_withSeveralChunks_shouldReportProgressAfterEachChunk() {
    let text = common::generate_text(1_000);
    let translator = ChunkedTranslator::new(MockProvider::working(), 300);
    let mut progress_calls = Vec::new();

    let outcome = translator.translate(&text, "pt", "en", |done, total| progress_calls.push((done, total))).await.unwrap();

    let total = outcome.chunk_count;
    assert!(total >= 4);
    let expected: Vec<(usize, usize)> = (1..=total).map(|done| (done, total)).collect();
    assert_eq!(progress_calls, expected);
}

/// The delay is applied between chunks, not before the first
#[tokio::test]
async fn test_translate_withChunkDelay_shouldWaitBetweenChunks() {
    let text = common::generate_text(250);
    let translator = ChunkedTranslator::new(MockProvider::working(), 100)
        .with_chunk_delay(Duration::from_millis(20));

    let start = Instant::now();
    let outcome = translator.translate(&text, "pt", "en", |_, _| {}).await.unwrap();

    assert_eq!(outcome.chunk_count, 3);
    assert!(start.elapsed() >= Duration::from_millis(40));
}

/// Short text is sent as a single chunk
#[tokio::test]
async fn test_translate_withShortText_shouldSendTextUnchanged() {
    let translator = ChunkedTranslator::new(MockProvider::working(), 100);

    let outcome = translator.translate("A short sentence.", "pt", "es", |_, _| {}).await.unwrap();

    assert_eq!(outcome.chunk_count, 1);
    assert_eq!(outcome.translated_text, "[es] A short sentence.");
    assert_eq!(translator.translator().requests(), vec!["A short sentence."]);
}
