/*!
 * Tests for file utilities
 */

use std::path::{Path, PathBuf};
use anyhow::Result;
use ltwai::file_utils::FileManager;
use crate::common;

/// Output names combine stem, language and extension
#[test]
fn test_generate_output_path_withLanguage_shouldBuildName() {
    let path = FileManager::generate_output_path("/data/script.txt", "/out", "en", "srt");
    assert_eq!(path, PathBuf::from("/out/script.en.srt"));

    let dotted = FileManager::generate_output_path("script.txt", "out", "es", ".srt");
    assert_eq!(dotted, Path::new("out").join("script.es.srt"));
}

/// Report and subtitle paths share the stem
#[test]
fn test_report_and_subtitle_paths_shouldUseKnownSuffixes() {
    assert_eq!(
        FileManager::report_path("docs/episode1.txt", "out", "en"),
        Path::new("out").join("episode1.en.translation.txt")
    );
    assert_eq!(
        FileManager::subtitle_path("docs/episode1.txt", "out", "en"),
        Path::new("out").join("episode1.en.srt")
    );
}

/// Only source text files are found, in name order, reports excluded
#[test]
fn test_find_text_files_withMixedFiles_shouldReturnSortedSources() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_file(dir, "b.txt", "B")?;
    common::create_test_file(dir, "a.TXT", "A")?;
    common::create_test_file(dir, "a.en.translation.txt", "report")?;
    common::create_test_file(dir, "a.en.srt", "srt")?;
    common::create_test_file(dir, "notes.md", "md")?;
    std::fs::create_dir(dir.join("nested"))?;
    common::create_test_file(&dir.join("nested"), "c.txt", "C")?;

    let files = FileManager::find_text_files(dir)?;
    let names: Vec<String> = files.iter()
        .map(|p| p.strip_prefix(dir).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a.TXT", "b.txt", "nested/c.txt"]);
    Ok(())
}

/// Writing creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.txt");

    FileManager::write_to_file(&path, "conteúdo")?;

    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(temp_dir.path().join("a")));
    assert_eq!(FileManager::read_to_string(&path)?, "conteúdo");
    Ok(())
}

/// Reading a missing file fails with the path in the message
#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    let error = FileManager::read_to_string("/definitely/not/here.txt").unwrap_err();
    assert!(error.to_string().contains("here.txt"));
}
