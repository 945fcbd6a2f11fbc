/*!
 * Prompt templates for long text translation.
 *
 * This module provides:
 * - The default system prompt for documentary and religious text translation
 * - Placeholder rendering with language display names
 */

pub mod templates;

// Re-export main types
pub use templates::PromptTemplate;
