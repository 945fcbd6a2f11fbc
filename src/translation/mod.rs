/*!
 * Translation of long texts using AI providers.
 *
 * - `chunked`: Sequential chunk-by-chunk translation of a whole document
 * - `core`: Translation service dispatching single chunks to a provider
 * - `prompts`: System prompt templates
 */

// Re-export main types for easier usage
pub use self::chunked::{ChunkTranslator, ChunkedTranslator, TranslationOutcome};
pub use self::core::{TokenUsageStats, TranslationService};
pub use self::prompts::PromptTemplate;

// Submodules
pub mod chunked;
pub mod core;
pub mod prompts;
