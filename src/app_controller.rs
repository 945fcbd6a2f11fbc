use anyhow::{Result, Context, anyhow, bail};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::report::TranslationReport;
use crate::subtitle_processor::{SubtitleBuilder, SubtitleCollection};
use crate::translation::{ChunkTranslator, ChunkedTranslator, TranslationService};

// @module: Application controller for long text translation

/// What happened to one input file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// The file was translated and the enabled outputs written
    Translated {
        /// Plain-text report, when enabled
        report_path: Option<PathBuf>,
        /// SRT file, when enabled
        subtitle_path: Option<PathBuf>,
        /// Number of chunks sent to the provider
        chunk_count: usize,
    },
    /// Outputs already existed or the input was empty
    Skipped,
}

/// Counters of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    /// Files translated
    pub processed: usize,
    /// Files skipped
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
}

/// Main application controller for text translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Configuration used by this controller
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wrap `translator` with the chunk size and delay from the configuration
    pub fn chunked_translator<T: ChunkTranslator>(&self, translator: T) -> ChunkedTranslator<T> {
        let common = &self.config.translation.common;
        ChunkedTranslator::new(translator, common.max_chars_per_chunk)
            .with_chunk_delay(Duration::from_millis(common.chunk_delay_ms))
    }

    // @creates: Translation service for the configured provider
    fn translation_service(&self) -> Result<ChunkedTranslator<TranslationService>> {
        let service = TranslationService::new(self.config.translation.clone())
            .context("Failed to create translation service")?;
        Ok(self.chunked_translator(service))
    }

    /// Run the workflow for a single text file
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<FileOutcome> {
        let translator = self.translation_service()?;
        let outcome = self.run_with_translator(&translator, &input_file, &output_dir, force_overwrite).await?;

        if matches!(outcome, FileOutcome::Translated { .. }) {
            info!("🔢 {}", translator.translator().token_usage().summary());
        }

        Ok(outcome)
    }

    /// Translate `input_file` with `translator` and write the enabled outputs
    pub async fn run_with_translator<T: ChunkTranslator>(
        &self,
        translator: &ChunkedTranslator<T>,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        let output = &self.config.output;
        if !output.write_report && !output.write_subtitles {
            bail!("Both report and subtitle output are disabled, nothing to write");
        }

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let source_language = &self.config.source_language;
        let target_language = &self.config.target_language;
        let report_path = FileManager::report_path(input_file, output_dir, target_language);
        let subtitle_path = FileManager::subtitle_path(input_file, output_dir, target_language);

        if !force_overwrite && self.outputs_exist(&report_path, &subtitle_path) {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", input_file);
            return Ok(FileOutcome::Skipped);
        }

        let text = FileManager::read_to_string(input_file)?;
        if text.trim().is_empty() {
            warn!("Skipping {:?}, file is empty", input_file);
            return Ok(FileOutcome::Skipped);
        }

        info!(
            "🚀 LTwAI: {} -> {} | {:?}",
            language_utils::display_name(source_language),
            language_utils::display_name(target_language),
            input_file
        );

        let progress_bar = Self::chunk_progress_bar();
        let result = translator
            .translate(&text, source_language, target_language, |completed, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(completed as u64);
            })
            .await;

        let outcome = match result {
            Ok(outcome) => {
                progress_bar.finish_and_clear();
                outcome
            }
            Err(e) => {
                progress_bar.abandon();
                return Err(e).with_context(|| format!("Failed to translate {:?}", input_file));
            }
        };

        info!(
            "Translated {} chunk(s) in {}",
            outcome.chunk_count,
            Self::format_duration(outcome.elapsed)
        );

        let report_path = if output.write_report {
            let report = TranslationReport::new(
                &Self::language_label(source_language),
                &Self::language_label(target_language),
                &text,
                &outcome.translated_text,
            );
            FileManager::write_to_file(&report_path, &report.render())?;
            info!("Success: {}", report_path.display());
            Some(report_path)
        } else {
            None
        };

        let subtitle_path = if output.write_subtitles {
            let subtitles = self.build_subtitles(input_file, &outcome.translated_text)?;
            subtitles.write_to_srt(&subtitle_path)?;
            info!(
                "Success: {} ({} blocks, {})",
                subtitle_path.display(),
                subtitles.entries.len(),
                Self::format_duration(subtitles.total_duration())
            );
            Some(subtitle_path)
        } else {
            None
        };

        Ok(FileOutcome::Translated {
            report_path,
            subtitle_path,
            chunk_count: outcome.chunk_count,
        })
    }

    /// Run the workflow in folder mode, processing all text files in a directory
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let translator = self.translation_service()?;
        let summary = self.run_folder_with_translator(&translator, &input_dir, force_overwrite).await?;

        if summary.processed > 0 {
            info!("🔢 {}", translator.translator().token_usage().summary());
        }

        Ok(summary)
    }

    /// Folder mode with an explicit translator; per-file failures are counted, not fatal
    pub async fn run_folder_with_translator<T: ChunkTranslator>(
        &self,
        translator: &ChunkedTranslator<T>,
        input_dir: &Path,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let text_files = FileManager::find_text_files(input_dir)?;
        if text_files.is_empty() {
            return Err(anyhow!("No text files found in directory: {:?}", input_dir));
        }

        info!("Found {} text file(s) in {:?}", text_files.len(), input_dir);
        let mut summary = FolderSummary::default();

        for text_file in &text_files {
            let output_dir = text_file.parent().unwrap_or(input_dir);

            match self.run_with_translator(translator, text_file, output_dir, force_overwrite).await {
                Ok(FileOutcome::Translated { .. }) => summary.processed += 1,
                Ok(FileOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {:?}: {:#}", text_file, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// Build an SRT file from a translation report or a plain translated text file
    pub fn export_subtitles(&self, text_file: &Path, output_path: Option<PathBuf>, force_overwrite: bool) -> Result<PathBuf> {
        let output_path = output_path.unwrap_or_else(|| text_file.with_extension("srt"));

        if output_path.exists() && !force_overwrite {
            bail!("Output file already exists: {:?} (use -f to force overwrite)", output_path);
        }

        let content = FileManager::read_to_string(text_file)?;
        let text = match TranslationReport::extract_translation(&content) {
            Some(translation) => {
                debug!("{:?} is a translation report, using its translation section", text_file);
                translation
            }
            None => content,
        };

        let subtitles = self.build_subtitles(text_file, &text)?;
        if subtitles.entries.is_empty() {
            warn!("{:?} contains no text, writing an empty subtitle file", text_file);
        }

        subtitles.write_to_srt(&output_path)?;
        info!("Success: {} ({} blocks)", output_path.display(), subtitles.entries.len());

        Ok(output_path)
    }

    fn build_subtitles(&self, source_file: &Path, text: &str) -> Result<SubtitleCollection> {
        let subtitle_config = &self.config.subtitle;
        let builder = SubtitleBuilder::new(subtitle_config.max_chars_per_block, subtitle_config.reading_rate)
            .context("Invalid subtitle configuration")?;

        let collection = SubtitleCollection::from_text(
            source_file.to_path_buf(),
            self.config.target_language.clone(),
            text,
            &builder,
        );
        debug!("{}", collection);

        Ok(collection)
    }

    // @returns: Whether every enabled output is already on disk
    fn outputs_exist(&self, report_path: &Path, subtitle_path: &Path) -> bool {
        let output = &self.config.output;
        (!output.write_report || report_path.exists()) && (!output.write_subtitles || subtitle_path.exists())
    }

    fn chunk_progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    // @returns: "Portuguese (pt)" style label
    fn language_label(code: &str) -> String {
        format!("{} ({})", language_utils::display_name(code), code)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
