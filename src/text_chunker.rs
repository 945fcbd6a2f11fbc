/*!
 * Boundary-preferring text chunker.
 *
 * Long documents are cut into ordered chunks that fit in a single provider
 * request. Cuts prefer paragraph breaks, then line breaks, sentence ends,
 * clause ends and finally word boundaries; only when none of those lies far
 * enough into the window is the text cut at the exact size bound.
 *
 * Lengths are counted in chars, never bytes.
 */

use log::debug;

use crate::errors::TextError;

/// Default chunk size, kept well under the input limits of the providers
pub const DEFAULT_MAX_CHARS_PER_CHUNK: usize = 25_000;

/// Default fraction of the window a boundary must reach to be used as a cut
pub const DEFAULT_MIN_CUT_RATIO: f64 = 0.7;

/// Fraction of the window a paragraph break must reach to be used as a cut
pub const PARAGRAPH_MIN_CUT_RATIO: f64 = 0.1;

// @struct: Cut point candidate
#[derive(Debug, Clone, Copy)]
struct Boundary {
    // @field: Literal searched backward from the bound
    pattern: &'static str,
    // @field: Bytes of the pattern that stay with the emitted chunk
    keep: usize,
    // @field: Uses the paragraph threshold instead of the regular one
    paragraph: bool,
}

// Priority order matters: the first accepted kind wins.
const BOUNDARIES: [Boundary; 5] = [
    Boundary { pattern: "\n\n", keep: 0, paragraph: true },
    Boundary { pattern: "\n", keep: 0, paragraph: false },
    Boundary { pattern: ". ", keep: 1, paragraph: false },
    Boundary { pattern: ", ", keep: 1, paragraph: false },
    Boundary { pattern: " ", keep: 0, paragraph: false },
];

/// Splits text into chunks of at most `max_chars` characters
#[derive(Debug, Clone)]
pub struct TextChunker {
    max_chars: usize,
    min_cut_ratio: f64,
}

impl TextChunker {
    /// Create a chunker with the default cut threshold
    pub fn new(max_chars: usize) -> Result<Self, TextError> {
        if max_chars == 0 {
            return Err(TextError::InvalidConfiguration(
                "max_chars must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            max_chars,
            min_cut_ratio: DEFAULT_MIN_CUT_RATIO,
        })
    }

    /// Override the fraction of the window a boundary must reach
    pub fn with_min_cut_ratio(mut self, ratio: f64) -> Result<Self, TextError> {
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(TextError::InvalidConfiguration(format!(
                "min_cut_ratio must be in (0, 1], got {}",
                ratio
            )));
        }

        self.min_cut_ratio = ratio;
        Ok(self)
    }

    /// Maximum chunk length in characters
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split `text` into ordered, non-empty chunks.
    ///
    /// Blank input yields no chunks. Text that already fits is returned
    /// unchanged as a single chunk. Otherwise whitespace around every cut is
    /// trimmed, so rejoining the chunks restores the text only up to
    /// whitespace. A space-free token longer than the bound is broken by the
    /// hard cut, never earlier.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        if char_len(text) <= self.max_chars {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut remaining = text.trim();

        while char_len(remaining) > self.max_chars {
            let cut = self.find_cut(remaining);
            let chunk = remaining[..cut].trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
            remaining = remaining[cut..].trim();
        }

        if !remaining.is_empty() {
            chunks.push(remaining.to_string());
        }

        debug!(
            "Split {} chars into {} chunk(s) of at most {} chars",
            char_len(text),
            chunks.len(),
            self.max_chars
        );

        chunks
    }

    // @returns: Byte offset where the next chunk ends
    // @requires: remaining longer than max_chars and starting with non-whitespace
    fn find_cut(&self, remaining: &str) -> usize {
        let threshold = self.min_cut_ratio * self.max_chars as f64;
        let paragraph_threshold = self.min_cut_ratio.min(PARAGRAPH_MIN_CUT_RATIO) * self.max_chars as f64;

        for boundary in BOUNDARIES.iter() {
            // The kept part of the pattern must still fit under the bound
            let latest_start = self.max_chars - boundary.keep;
            let search_end = byte_offset(remaining, latest_start + boundary.pattern.len());

            let Some(position) = remaining[..search_end].rfind(boundary.pattern) else {
                continue;
            };

            let char_position = char_len(&remaining[..position]);
            let accepted = if boundary.paragraph {
                char_position > 0 && char_position as f64 >= paragraph_threshold
            } else {
                char_position as f64 >= threshold
            };

            if accepted {
                return position + boundary.keep;
            }
        }

        byte_offset(remaining, self.max_chars)
    }
}

/// Split `text` into chunks of at most `max_chars` characters using the
/// default cut threshold
pub fn split_text(text: &str, max_chars: usize) -> Result<Vec<String>, TextError> {
    Ok(TextChunker::new(max_chars)?.split(text))
}

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

// @returns: Byte offset of the char at index `n`, or the string length
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(i, _)| i)
}
