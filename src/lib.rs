/*!
 * # LTwAI - Long Text Translator with AI
 *
 * A Rust library for translating long plain-text documents with AI and
 * turning the translation into timed SRT subtitles.
 *
 * ## Features
 *
 * - Boundary-preferring splitting of long texts into request-sized chunks
 * - Sequential chunk translation with progress reporting and fail-fast errors
 * - Providers:
 *   - Google Gemini API
 *   - Ollama (local LLM)
 * - Subtitle synthesis from plain text with reading-rate based timing
 * - Plain-text report with word and character statistics
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `text_chunker`: Splitting of long texts into bounded chunks
 * - `subtitle_processor`: Subtitle block building and SRT output
 * - `translation`: AI-powered translation:
 *   - `translation::chunked`: Chunk-by-chunk translation of a document
 *   - `translation::core`: Provider dispatch and token usage
 *   - `translation::prompts`: System prompt templates
 * - `providers`: Client implementations for the LLM providers:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted provider for tests
 * - `report`: Plain-text translation report
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod report;
pub mod subtitle_processor;
pub mod text_chunker;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{SubtitleBlock, SubtitleBuilder, SubtitleCollection, build_blocks};
pub use text_chunker::{TextChunker, split_text};
pub use translation::{ChunkTranslator, ChunkedTranslator, TranslationOutcome, TranslationService};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use errors::{AppError, ProviderError, TextError, TranslationError};
