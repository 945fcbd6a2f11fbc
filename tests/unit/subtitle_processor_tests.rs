/*!
 * Tests for subtitle block building and SRT output
 */

use std::fmt::Write;
use std::path::PathBuf;
use anyhow::Result;
use ltwai::errors::TextError;
use ltwai::subtitle_processor::{
    SubtitleBlock, SubtitleBuilder, SubtitleCollection, build_blocks,
    DEFAULT_MAX_CHARS_PER_BLOCK, DEFAULT_READING_RATE,
};
use ltwai::text_chunker::char_len;
use crate::common;

/// Sentences that do not fit together get their own timed blocks
#[test]
fn test_build_blocks_withTwoSentences_shouldTimeBlocksContiguously() {
    let blocks = build_blocks("Hello world. This is a test.", 15, 10.0).unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].text, "Hello world.");
    assert_eq!(blocks[0].format_start_time(), "00:00:00,000");
    assert_eq!(blocks[0].format_end_time(), "00:00:01,200");
    assert_eq!(blocks[1].text, "This is a test.");
    assert_eq!(blocks[1].format_start_time(), "00:00:01,200");
    assert_eq!(blocks[1].format_end_time(), "00:00:02,700");
}

/// Short sentences are packed into one block
#[test]
fn test_build_blocks_withShortSentences_shouldPackThemTogether() {
    let blocks = build_blocks("Hi. How are you? Fine!", 84, 14.0).unwrap();

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].text, "Hi. How are you? Fine!");
    assert_eq!(blocks[0].seq_num, 1);
}

/// Empty text yields no blocks
#[test]
fn test_build_blocks_withEmptyText_shouldReturnNoBlocks() {
    assert!(build_blocks("", DEFAULT_MAX_CHARS_PER_BLOCK, DEFAULT_READING_RATE).unwrap().is_empty());
    assert!(build_blocks("  \n ", DEFAULT_MAX_CHARS_PER_BLOCK, DEFAULT_READING_RATE).unwrap().is_empty());
}

/// Invalid bounds and rates are rejected before any work
#[test]
fn test_build_blocks_withInvalidParameters_shouldFail() {
    assert!(matches!(build_blocks("Text.", 0, 14.0), Err(TextError::InvalidConfiguration(_))));
    assert!(matches!(build_blocks("Text.", 84, 0.0), Err(TextError::InvalidConfiguration(_))));
    assert!(matches!(build_blocks("Text.", 84, -1.0), Err(TextError::InvalidConfiguration(_))));
    assert!(matches!(build_blocks("Text.", 84, f64::NAN), Err(TextError::InvalidConfiguration(_))));
}

/// A sentence longer than the bound is packed word by word
#[test]
fn test_build_blocks_withLongSentence_shouldSplitOnWords() {
    let text = "This sentence is definitely much longer than twenty characters.";
    let blocks = build_blocks(text, 20, 10.0).unwrap();

    assert!(blocks.len() > 1);
    for block in &blocks {
        assert!(char_len(&block.text) <= 20, "block {:?} over bound", block.text);
    }

    let rejoined = blocks.iter().map(|b| b.text.as_str()).collect::<Vec<_>>().join(" ");
    assert_eq!(rejoined, text);
}

/// A single word longer than the bound stays whole
#[test]
fn test_build_blocks_withOversizedWord_shouldKeepWordWhole() {
    let blocks = build_blocks("Supercalifragilisticexpialidocious is long.", 10, 10.0).unwrap();

    assert_eq!(blocks[0].text, "Supercalifragilisticexpialidocious");
    assert_eq!(blocks[1].text, "is long.");
}

/// Trailing text without a terminator is kept
#[test]
fn test_build_blocks_withUnterminatedTail_shouldKeepTail() {
    let blocks = build_blocks("First sentence. And then some", 15, 10.0).unwrap();

    let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["First sentence.", "And then some"]);
}

/// Start of every block equals the end of the previous one
#[test]
fn test_build_blocks_withDocument_shouldBeContiguousAndOrdered() {
    let text = common::sample_document().repeat(5);
    let blocks = build_blocks(&text, 40, 14.0).unwrap();

    assert_eq!(blocks[0].start_secs, 0.0);
    for (i, pair) in blocks.windows(2).enumerate() {
        assert_eq!(pair[0].end_secs, pair[1].start_secs);
        assert!(pair[1].start_secs >= pair[0].start_secs);
        assert_eq!(pair[0].seq_num, i + 1);
    }

    for block in &blocks {
        let expected = char_len(&block.text) as f64 / 14.0;
        assert!((block.duration_secs() - expected).abs() < 1e-9);
        assert!(!block.text.contains('\n'));
    }
}

/// Display renders one SRT record
#[test]
fn test_subtitle_block_display_withValidBlock_shouldFormatSrtRecord() {
    let block = SubtitleBlock::new(3, 61.234, 65.432, "Hello World".to_string());
    let mut output = String::new();
    write!(output, "{}", block).unwrap();

    assert_eq!(output, "3\n00:01:01,234 --> 00:01:05,432\nHello World\n\n");
}

/// Timestamps round to the nearest millisecond and widen past 99 hours
#[test]
fn test_format_timestamp_withEdgeValues_shouldRoundAndClamp() {
    assert_eq!(SubtitleBlock::format_timestamp(0.0), "00:00:00,000");
    assert_eq!(SubtitleBlock::format_timestamp(2.7), "00:00:02,700");
    assert_eq!(SubtitleBlock::format_timestamp(0.0016), "00:00:00,002");
    assert_eq!(SubtitleBlock::format_timestamp(-1.0), "00:00:00,000");
    assert_eq!(SubtitleBlock::format_timestamp(f64::INFINITY), "00:00:00,000");
    assert_eq!(SubtitleBlock::format_timestamp(360_000.0), "100:00:00,000");
}

/// A collection renders every block as a record
#[test]
fn test_subtitle_collection_toSrtString_withBlocks_shouldRenderAllRecords() {
    let builder = SubtitleBuilder::new(15, 10.0).unwrap();
    let collection = SubtitleCollection::from_text(
        PathBuf::from("script.en.translation.txt"),
        "en".to_string(),
        "Hello world. This is a test.",
        &builder,
    );

    let expected = "1\n00:00:00,000 --> 00:00:01,200\nHello world.\n\n\
                    2\n00:00:01,200 --> 00:00:02,700\nThis is a test.\n\n";
    assert_eq!(collection.to_srt_string(), expected);
    assert!((collection.total_duration_secs() - 2.7).abs() < 1e-9);
}

/// Writing creates the file and any missing directory
#[test]
fn test_subtitle_collection_writeToSrt_withNestedPath_shouldCreateFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("nested").join("out.srt");

    let builder = SubtitleBuilder::new(84, 14.0)?;
    let collection = SubtitleCollection::from_text(
        PathBuf::from("in.txt"),
        "en".to_string(),
        "One sentence. Another one.",
        &builder,
    );
    collection.write_to_srt(&output_path)?;

    let written = std::fs::read_to_string(&output_path)?;
    assert_eq!(written, collection.to_srt_string());
    assert!(written.starts_with("1\n00:00:00,000 --> "));
    Ok(())
}

/// The total duration saturates instead of overflowing
#[test]
fn test_subtitle_collection_totalDuration_withTinyReadingRate_shouldSaturate() -> Result<()> {
    let normal = SubtitleCollection::from_text(
        PathBuf::from("in.txt"),
        "en".to_string(),
        "Hello world. This is a test.",
        &SubtitleBuilder::new(15, 10.0)?,
    );
    assert!((normal.total_duration().as_secs_f64() - 2.7).abs() < 1e-6);

    let huge = SubtitleCollection::from_text(
        PathBuf::from("in.txt"),
        "en".to_string(),
        "Hello world.",
        &SubtitleBuilder::new(84, 1e-20)?,
    );
    assert!(huge.total_duration_secs() > 1e20);
    assert_eq!(huge.total_duration(), std::time::Duration::MAX);
    assert!(huge.to_srt_string().starts_with("1\n00:00:00,000 --> "));
    Ok(())
}
