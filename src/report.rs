use chrono::Local;
use std::fmt::Write;

use crate::text_chunker::char_len;

// @module: Plain-text translation report

/// Word and character counts of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStatistics {
    /// Whitespace-separated words
    pub words: usize,
    /// Characters
    pub chars: usize,
}

impl TextStatistics {
    /// Count words and characters of `text`
    pub fn from_text(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            chars: char_len(text),
        }
    }
}

/// Relative change from `original` to `translated`, e.g. `+12.5%`.
///
/// `None` when the original count is zero.
pub fn percent_diff(original: usize, translated: usize) -> Option<String> {
    if original == 0 {
        return None;
    }

    let diff = (translated as f64 - original as f64) / original as f64 * 100.0;
    let sign = if diff > 0.0 { "+" } else { "" };
    Some(format!("{}{:.1}%", sign, diff))
}

/// First line of every rendered report
pub const REPORT_TITLE: &str = "TRANSLATION REPORT";

const RULE_WIDTH: usize = 60;
const STATISTICS_HEADING: &str = "STATISTICS";

fn section_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn translation_heading(target_label: &str) -> String {
    format!("TRANSLATION ({})", target_label)
}

/// Original and translated text with their statistics
#[derive(Debug, Clone)]
pub struct TranslationReport {
    source_label: String,
    target_label: String,
    original: String,
    translated: String,
}

impl TranslationReport {
    /// Create a report; labels are shown as given
    pub fn new(source_label: &str, target_label: &str, original: &str, translated: &str) -> Self {
        Self {
            source_label: source_label.to_string(),
            target_label: target_label.to_string(),
            original: original.to_string(),
            translated: translated.to_string(),
        }
    }

    /// Statistics of the original text
    pub fn original_stats(&self) -> TextStatistics {
        TextStatistics::from_text(&self.original)
    }

    /// Statistics of the translated text
    pub fn translated_stats(&self) -> TextStatistics {
        TextStatistics::from_text(&self.translated)
    }

    /// Render the report as plain text
    pub fn render(&self) -> String {
        let original = self.original_stats();
        let translated = self.translated_stats();
        let rule = section_rule();
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", REPORT_TITLE);
        let _ = writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out, "Languages: {} -> {}", self.source_label, self.target_label);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out);
        let _ = writeln!(out, "ORIGINAL TEXT ({})", self.source_label);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", self.original.trim());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", translation_heading(&self.target_label));
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", self.translated.trim());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", STATISTICS_HEADING);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Original:   {} words, {} characters", original.words, original.chars);
        let _ = writeln!(
            out,
            "Translated: {} words ({}), {} characters ({})",
            translated.words,
            percent_diff(original.words, translated.words).unwrap_or_else(|| "n/a".to_string()),
            translated.chars,
            percent_diff(original.chars, translated.chars).unwrap_or_else(|| "n/a".to_string()),
        );

        out
    }

    /// Translated text of a rendered report, `None` when `content` is not a report.
    ///
    /// The translation section is located from the end of the report, after
    /// the original text, so an original quoting the headings does not matter.
    pub fn extract_translation(content: &str) -> Option<String> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.lines().next()? != REPORT_TITLE {
            return None;
        }

        let target_label = content.lines()
            .find_map(|line| line.strip_prefix("Languages: "))
            .and_then(|languages| languages.split_once(" -> "))
            .map(|(_, target)| target.trim_end())?;

        let rule = section_rule();
        let heading = format!("\n{}\n{}\n", translation_heading(target_label), rule);
        let statistics = format!("\n\n{}\n{}\n", STATISTICS_HEADING, rule);

        let end = content.rfind(&statistics)?;
        let start = content[..end].rfind(&heading)? + heading.len();

        Some(content[start..end].trim().to_string())
    }
}
