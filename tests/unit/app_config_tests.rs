/*!
 * Tests for application configuration
 */

use anyhow::Result;
use ltwai::app_config::{Config, LogLevel, TranslationProvider};
use crate::common;

fn config_with_gemini_key() -> Config {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().api_key = "test-key".to_string();
    config
}

/// Defaults match the documented values
#[test]
fn test_default_config_shouldHaveDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "pt");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    assert_eq!(config.translation.get_model(), "gemini-2.5-flash");
    assert_eq!(config.translation.get_endpoint(), "https://generativelanguage.googleapis.com");
    assert_eq!(config.translation.common.max_chars_per_chunk, 25_000);
    assert_eq!(config.subtitle.max_chars_per_block, 84);
    assert_eq!(config.subtitle.reading_rate, 14.0);
    assert!(config.output.write_report);
    assert!(config.output.write_subtitles);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.translation.common.system_prompt.contains("{target_language}"));
}

/// Missing fields fall back to their defaults
#[test]
fn test_config_deserialization_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "target_language": "es",
        "translation": {
            "provider": "ollama",
            "common": { "chunk_delay_ms": 0 }
        },
        "subtitle": { "reading_rate": 17.5 }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.source_language, "pt");
    assert_eq!(config.target_language, "es");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.common.chunk_delay_ms, 0);
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.subtitle.reading_rate, 17.5);
    assert_eq!(config.subtitle.max_chars_per_block, 84);
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert!(config.translation.get_rate_limit().is_none());
}

/// Gemini needs an API key, Ollama does not
#[test]
fn test_validate_withProviderKeys_shouldRequireGeminiKey() {
    let mut config = Config::default();
    assert!(config.validate().is_err());

    config.translation.provider = TranslationProvider::Ollama;
    assert!(config.validate().is_ok());

    assert!(config_with_gemini_key().validate().is_ok());
}

/// Bad languages and bounds are rejected
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = config_with_gemini_key();
    config.target_language = "xx".to_string();
    assert!(config.validate().is_err());

    let mut config = config_with_gemini_key();
    config.translation.common.max_chars_per_chunk = 0;
    assert!(config.validate().is_err());

    let mut config = config_with_gemini_key();
    config.subtitle.max_chars_per_block = 0;
    assert!(config.validate().is_err());

    let mut config = config_with_gemini_key();
    config.subtitle.reading_rate = 0.0;
    assert!(config.validate().is_err());
}

/// Model overrides apply to the active provider only
#[test]
fn test_active_provider_config_mut_withModelOverride_shouldOnlyChangeActiveProvider() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.active_provider_config_mut().model = "mistral".to_string();

    assert_eq!(config.translation.get_model(), "mistral");
    assert_eq!(
        config.translation.get_provider_config(&TranslationProvider::Gemini).unwrap().model,
        "gemini-2.5-flash"
    );
}

/// A missing provider entry is created on demand
#[test]
fn test_active_provider_config_mut_withoutEntry_shouldCreateDefaultEntry() {
    let mut config = Config::default();
    config.translation.available_providers.clear();

    config.translation.active_provider_config_mut().api_key = "k".to_string();

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.get_api_key(), "k");
}

/// Provider names parse case-insensitively
#[test]
fn test_translation_provider_fromStr_shouldParseKnownNames() {
    assert_eq!("Gemini".parse::<TranslationProvider>().unwrap(), TranslationProvider::Gemini);
    assert_eq!("ollama".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert!("openai".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Gemini.to_string(), "gemini");
}

/// A missing config file is created with defaults and reloads identically
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&config_path)?;
    assert!(config_path.exists());

    let reloaded = Config::load(&config_path)?;
    assert_eq!(reloaded.source_language, created.source_language);
    assert_eq!(reloaded.translation.available_providers.len(), 2);
    assert_eq!(reloaded.translation.common.system_prompt, created.translation.common.system_prompt);
    Ok(())
}

/// Malformed JSON is reported with the file name
#[test]
fn test_load_withMalformedJson_shouldFailWithContext() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let error = Config::load(&config_path).unwrap_err();
    assert!(format!("{:#}", error).contains("conf.json"));
    Ok(())
}
