// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use ltwai::app_config::{self, Config, TranslationProvider};
use ltwai::app_controller::{Controller, FileOutcome};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a text file or every text file in a directory
    Translate(TranslateArgs),

    /// Build an SRT file from a translation report or a translated text file
    Subtitles(SubtitlesArgs),

    /// Generate shell completions for ltwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input text file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Source language code (e.g., 'pt', 'en', 'es')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the provider
    #[arg(long, env = "LTWAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output directory (defaults to the input file's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Do not write the plain-text report
    #[arg(long)]
    no_report: bool,

    /// Do not write the SRT subtitle file
    #[arg(long)]
    no_subtitles: bool,
}

#[derive(Args, Debug)]
struct SubtitlesArgs {
    /// Translation report (only its translation section is used) or plain translated text
    #[arg(value_name = "TEXT_FILE")]
    text_file: PathBuf,

    /// Output SRT path (defaults to the text file with an .srt extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum characters per subtitle block
    #[arg(long)]
    max_chars_per_block: Option<usize>,

    /// Reading rate in characters per second
    #[arg(long)]
    reading_rate: Option<f64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,
}

/// LTwAI - Long Text Translator with AI
///
/// Translates long documents chunk by chunk with AI providers and exports the
/// result as a plain-text report and a timed SRT subtitle file.
#[derive(Parser, Debug)]
#[command(name = "ltwai")]
#[command(version)]
#[command(about = "AI-powered long text translation tool")]
#[command(long_about = "LTwAI splits long texts into chunks, translates them with AI providers and builds subtitles from the translation.

EXAMPLES:
    ltwai translate script.txt                      # Translate using default config
    ltwai translate -f script.txt                   # Force overwrite existing files
    ltwai translate -s pt -t es script.txt          # Translate from Portuguese to Spanish
    ltwai translate -p ollama -m llama3.2:3b docs/  # Use a local model on a whole directory
    ltwai subtitles script.en.translation.txt       # Rebuild subtitles from a translation report
    ltwai completions bash > ltwai.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    gemini - Google Gemini API (requires API key, default: gemini-2.5-flash)
    ollama - Local Ollama server (default: llama3.2:3b)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Records are filtered by log::max_level, which may change after init
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config or the command line says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ltwai", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
        Commands::Subtitles(args) => run_subtitles(args),
    }
}

// @applies: Log level from the command line, else from the config
fn apply_log_level(cli_level: Option<CliLogLevel>, config: &mut Config) {
    if let Some(level) = cli_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(level) = options.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_log_level(options.log_level, &mut config);

    // Override config with CLI options if provided
    if let Some(provider) = options.provider {
        config.translation.provider = provider.into();
    }

    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }

    if let Some(api_key) = &options.api_key {
        config.translation.active_provider_config_mut().api_key = api_key.clone();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if options.no_report {
        config.output.write_report = false;
    }

    if options.no_subtitles {
        config.output.write_subtitles = false;
    }

    config.validate()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    let input_path = options.input_path;

    if input_path.is_file() {
        let output_dir = match options.output_dir {
            Some(dir) => dir,
            None => input_path.parent().map(PathBuf::from).unwrap_or_default(),
        };

        if let FileOutcome::Translated { chunk_count, .. } = controller.run(input_path, output_dir, options.force_overwrite).await? {
            info!("Done ({} chunk(s))", chunk_count);
        }
    } else if input_path.is_dir() {
        if options.output_dir.is_some() {
            return Err(anyhow!("--output-dir is only supported for single files; folder mode writes next to each input"));
        }

        let summary = controller.run_folder(input_path, options.force_overwrite).await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to translate", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

fn run_subtitles(options: SubtitlesArgs) -> Result<()> {
    let mut config = Config::load_or_create(&options.config_path)?;
    apply_log_level(options.log_level, &mut config);

    if let Some(max_chars) = options.max_chars_per_block {
        config.subtitle.max_chars_per_block = max_chars;
    }

    if let Some(rate) = options.reading_rate {
        config.subtitle.reading_rate = rate;
    }

    let controller = Controller::with_config(config)?;
    controller.export_subtitles(&options.text_file, options.output, options.force_overwrite)?;

    Ok(())
}
