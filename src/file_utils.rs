use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Suffix of generated plain-text reports, skipped when scanning for input
pub const REPORT_SUFFIX: &str = "translation.txt";

/// Extension of generated subtitle files
pub const SUBTITLE_EXTENSION: &str = "srt";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for a translated document
    // @params: input_file, output_dir, target_language, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let output_filename = format!(
            "{}.{}.{}",
            stem.to_string_lossy(),
            target_language,
            extension.trim_start_matches('.')
        );

        output_dir.as_ref().join(output_filename)
    }

    /// Path of the plain-text report for `input_file`
    pub fn report_path<P1: AsRef<Path>, P2: AsRef<Path>>(input_file: P1, output_dir: P2, target_language: &str) -> PathBuf {
        Self::generate_output_path(input_file, output_dir, target_language, REPORT_SUFFIX)
    }

    /// Path of the SRT file for `input_file`
    pub fn subtitle_path<P1: AsRef<Path>, P2: AsRef<Path>>(input_file: P1, output_dir: P2, target_language: &str) -> PathBuf {
        Self::generate_output_path(input_file, output_dir, target_language, SUBTITLE_EXTENSION)
    }

    /// Find source text files in a directory, skipping generated reports
    pub fn find_text_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let is_text = path.extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("txt"));
            let is_report = path.file_name()
                .is_some_and(|name| name.to_string_lossy().to_lowercase().ends_with(&format!(".{}", REPORT_SUFFIX)));

            if is_text && !is_report {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }
}
