use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, Context};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TextError;
use crate::text_chunker::char_len;

// @module: Subtitle block building and SRT output

/// Default maximum characters shown in one subtitle block
pub const DEFAULT_MAX_CHARS_PER_BLOCK: usize = 84;

/// Default reading rate in characters per second
pub const DEFAULT_READING_RATE: f64 = 14.0;

// @const: Sentence pattern, terminators included
static SENTENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^.!?]+[.!?]+").unwrap()
});

// @struct: Single timed subtitle block
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleBlock {
    // @field: Sequence number, 1-based
    pub seq_num: usize,

    // @field: Start time in seconds
    pub start_secs: f64,

    // @field: End time in seconds
    pub end_secs: f64,

    // @field: Block text
    pub text: String,
}

impl SubtitleBlock {
    /// Creates a new subtitle block
    pub fn new(seq_num: usize, start_secs: f64, end_secs: f64, text: String) -> Self {
        SubtitleBlock {
            seq_num,
            start_secs,
            end_secs,
            text,
        }
    }

    /// Display duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_secs)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_secs)
    }

    /// Format seconds to SRT format (HH:MM:SS,mmm).
    ///
    /// Milliseconds are rounded to the nearest value. Negative and non-finite
    /// input renders as zero; hours widen past two digits when needed.
    pub fn format_timestamp(secs: f64) -> String {
        let ms = if secs.is_finite() && secs > 0.0 {
            (secs * 1000.0).round() as u64
        } else {
            0
        };

        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Builds timed subtitle blocks out of plain text
#[derive(Debug, Clone)]
pub struct SubtitleBuilder {
    max_chars_per_block: usize,
    reading_rate: f64,
}

impl SubtitleBuilder {
    /// Create a builder, rejecting non-positive bounds and rates
    pub fn new(max_chars_per_block: usize, reading_rate: f64) -> Result<Self, TextError> {
        if max_chars_per_block == 0 {
            return Err(TextError::InvalidConfiguration(
                "max_chars_per_block must be greater than zero".to_string(),
            ));
        }

        if !reading_rate.is_finite() || reading_rate <= 0.0 {
            return Err(TextError::InvalidConfiguration(format!(
                "reading_rate must be a positive number of characters per second, got {}",
                reading_rate
            )));
        }

        Ok(Self {
            max_chars_per_block,
            reading_rate,
        })
    }

    /// Split `text` into blocks and assign contiguous timestamps.
    ///
    /// Sentences are packed greedily into blocks of at most
    /// `max_chars_per_block` characters. A sentence that is longer than the
    /// bound on its own is packed word by word instead; a single word longer
    /// than the bound gets a block of its own. Whitespace inside sentences is
    /// collapsed to single spaces so that no block contains a blank line.
    pub fn build(&self, text: &str) -> Vec<SubtitleBlock> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let sentences = Self::segment_sentences(text);
        let texts = self.group_blocks(&sentences);

        let mut start_secs = 0.0;
        let blocks: Vec<SubtitleBlock> = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let end_secs = start_secs + char_len(&text) as f64 / self.reading_rate;
                let block = SubtitleBlock::new(i + 1, start_secs, end_secs, text);
                start_secs = end_secs;
                block
            })
            .collect();

        debug!(
            "Built {} subtitle block(s) from {} sentence(s), total {:.3}s",
            blocks.len(),
            sentences.len(),
            start_secs
        );

        blocks
    }

    // @returns: Whitespace-normalized sentences in order
    fn segment_sentences(text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut last_end = 0;

        for found in SENTENCE_REGEX.find_iter(text) {
            sentences.push(normalize_whitespace(found.as_str()));
            last_end = found.end();
        }

        // Text after the last terminator, or all of it when there is none
        let tail = &text[last_end..];
        if !tail.trim().is_empty() {
            sentences.push(normalize_whitespace(tail));
        }

        sentences.retain(|s| !s.is_empty());
        sentences
    }

    fn group_blocks(&self, sentences: &[String]) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut current = String::new();

        for sentence in sentences {
            if char_len(sentence) > self.max_chars_per_block {
                Self::flush(&mut blocks, &mut current);
                for word in sentence.split(' ') {
                    if char_len(word) > self.max_chars_per_block {
                        warn!(
                            "Word of {} chars exceeds the subtitle block limit of {}",
                            char_len(word),
                            self.max_chars_per_block
                        );
                    }
                    self.append_or_flush(&mut blocks, &mut current, word);
                }
                continue;
            }

            self.append_or_flush(&mut blocks, &mut current, sentence);
        }

        Self::flush(&mut blocks, &mut current);
        blocks
    }

    fn append_or_flush(&self, blocks: &mut Vec<String>, current: &mut String, piece: &str) {
        if current.is_empty() {
            current.push_str(piece);
            return;
        }

        if char_len(current) + 1 + char_len(piece) > self.max_chars_per_block {
            Self::flush(blocks, current);
            current.push_str(piece);
        } else {
            current.push(' ');
            current.push_str(piece);
        }
    }

    fn flush(blocks: &mut Vec<String>, current: &mut String) {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            blocks.push(trimmed.to_string());
        }
        current.clear();
    }
}

/// Build timed subtitle blocks from `text`
pub fn build_blocks(
    text: &str,
    max_chars_per_block: usize,
    reading_rate: f64,
) -> Result<Vec<SubtitleBlock>, TextError> {
    Ok(SubtitleBuilder::new(max_chars_per_block, reading_rate)?.build(text))
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collection of subtitle blocks with metadata
#[derive(Debug)]
pub struct SubtitleCollection {
    /// File the text came from
    pub source_file: PathBuf,

    /// List of subtitle blocks
    pub entries: Vec<SubtitleBlock>,

    /// Language of the block texts
    pub language: String,
}

impl SubtitleCollection {
    /// Create an empty subtitle collection
    pub fn new(source_file: PathBuf, language: String) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
            language,
        }
    }

    /// Build a collection from plain text
    pub fn from_text(source_file: PathBuf, language: String, text: &str, builder: &SubtitleBuilder) -> Self {
        SubtitleCollection {
            source_file,
            entries: builder.build(text),
            language,
        }
    }

    /// End time of the last block in seconds
    pub fn total_duration_secs(&self) -> f64 {
        self.entries.last().map_or(0.0, |entry| entry.end_secs)
    }

    /// End time of the last block, saturating at `Duration::MAX`
    pub fn total_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.total_duration_secs()).unwrap_or(Duration::MAX)
    }

    /// Render all blocks in SRT format
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
