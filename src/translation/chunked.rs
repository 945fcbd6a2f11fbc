/*!
 * Chunked translation of long texts.
 *
 * The text is split with the boundary-preferring chunker, every chunk is
 * sent to the translator strictly in order, and the translations are joined
 * back with paragraph breaks. The first failing chunk aborts the whole run.
 */

use async_trait::async_trait;
use log::{debug, info};
use std::time::{Duration, Instant};

use crate::errors::{ProviderError, TranslationError};
use crate::text_chunker::{TextChunker, char_len};

/// Separator placed between translated chunks
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Capability to translate one chunk of text
#[async_trait]
pub trait ChunkTranslator: Send + Sync {
    /// Translate `chunk` from `source_language` to `target_language`
    async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;
}

/// Result of a successful chunked translation
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    /// Translated chunks joined with paragraph breaks
    pub translated_text: String,
    /// Number of chunks the source was split into
    pub chunk_count: usize,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

/// Translates texts of any length through a chunk translator
#[derive(Debug)]
pub struct ChunkedTranslator<T: ChunkTranslator> {
    translator: T,
    max_chars_per_chunk: usize,
    chunk_delay: Duration,
}

impl<T: ChunkTranslator> ChunkedTranslator<T> {
    /// Create a chunked translator without delay between chunks
    pub fn new(translator: T, max_chars_per_chunk: usize) -> Self {
        Self {
            translator,
            max_chars_per_chunk,
            chunk_delay: Duration::ZERO,
        }
    }

    /// Pause for `delay` between two consecutive chunks
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// The wrapped chunk translator
    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Maximum chunk length in characters
    pub fn max_chars_per_chunk(&self) -> usize {
        self.max_chars_per_chunk
    }

    /// Translate `text`, reporting `(completed, total)` after every chunk.
    ///
    /// Chunks are submitted one at a time, in order. A blank translation
    /// counts as a failure. On the first failure the remaining chunks are
    /// never submitted and no partial text is returned.
    pub async fn translate<F>(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        mut progress: F,
    ) -> Result<TranslationOutcome, TranslationError>
    where
        F: FnMut(usize, usize),
    {
        let start_time = Instant::now();
        let chunks = TextChunker::new(self.max_chars_per_chunk)?.split(text);
        let total_chunks = chunks.len();

        if total_chunks == 0 {
            return Ok(TranslationOutcome {
                translated_text: String::new(),
                chunk_count: 0,
                elapsed: start_time.elapsed(),
            });
        }

        info!(
            "Translating {} chars in {} chunk(s) ({} -> {})",
            char_len(text),
            total_chunks,
            source_language,
            target_language
        );

        let mut translations = Vec::with_capacity(total_chunks);

        for (index, chunk) in chunks.iter().enumerate() {
            let chunk_index = index + 1;

            if index > 0 && !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }

            debug!("Chunk {}/{}: {} chars", chunk_index, total_chunks, char_len(chunk));

            let translated = self.translator
                .translate_chunk(chunk, source_language, target_language)
                .await
                .and_then(|translated| {
                    match translated.trim() {
                        "" => Err(ProviderError::EmptyResponse),
                        trimmed => Ok(trimmed.to_string()),
                    }
                })
                .map_err(|source| TranslationError::ChunkTranslationFailed {
                    chunk_index,
                    total_chunks,
                    source,
                })?;

            translations.push(translated);
            progress(chunk_index, total_chunks);
        }

        let elapsed = start_time.elapsed();
        info!("Translated {} chunk(s) in {:.1}s", total_chunks, elapsed.as_secs_f64());

        Ok(TranslationOutcome {
            translated_text: translations.join(CHUNK_SEPARATOR),
            chunk_count: total_chunks,
            elapsed,
        })
    }
}
