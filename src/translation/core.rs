/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which dispatches single
 * chunk translations to the configured provider and tracks token usage.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use super::chunked::ChunkTranslator;
use super::prompts::PromptTemplate;

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Number of successful requests
    pub requests: u64,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::with_provider_info(String::new(), String::new())
    }
}

impl TokenUsageStats {
    /// Create new token usage stats with provider info
    pub fn with_provider_info(provider: String, model: String) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            requests: 0,
            start_time: Instant::now(),
            api_duration: Duration::ZERO,
            provider,
            model,
        }
    }

    /// Record one request and the token counts the provider reported
    pub fn add_token_usage(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>, duration: Duration) {
        if let Some(pt) = prompt_tokens {
            self.prompt_tokens += pt;
            self.total_tokens += pt;
        }

        if let Some(ct) = completion_tokens {
            self.completion_tokens += ct;
            self.total_tokens += ct;
        }

        self.requests += 1;
        self.api_duration += duration;
    }

    /// Calculate tokens per minute rate
    pub fn tokens_per_minute(&self) -> f64 {
        // API time when available, elapsed time otherwise
        let duration_minutes = if self.api_duration.as_secs_f64() > 0.0 {
            self.api_duration.as_secs_f64() / 60.0
        } else {
            self.start_time.elapsed().as_secs_f64() / 60.0
        };

        if duration_minutes > 0.0 {
            self.total_tokens as f64 / duration_minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        let elapsed_minutes = self.start_time.elapsed().as_secs_f64() / 60.0;
        let api_minutes = self.api_duration.as_secs_f64() / 60.0;

        format!(
            "Token Usage Summary:\n\
             Provider: {}\n\
             Model: {}\n\
             Requests: {}\n\
             Prompt tokens: {}\n\
             Completion tokens: {}\n\
             Total tokens: {}\n\
             Elapsed time: {:.2} minutes\n\
             API request time: {:.2} minutes\n\
             Tokens per minute: {:.2}",
            self.provider,
            self.model,
            self.requests,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens,
            elapsed_minutes,
            api_minutes,
            self.tokens_per_minute()
        )
    }
}

/// Parse an endpoint string into a scheme-qualified host and a port
pub fn parse_endpoint(endpoint: &str) -> Result<(String, u16)> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    let host = url.host_str()
        .ok_or_else(|| anyhow!("Invalid host in endpoint: {}", endpoint))?;

    let port = url.port_or_known_default().unwrap_or(80);

    Ok((format!("{}://{}", url.scheme(), host), port))
}

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// Google Gemini API
    Gemini {
        /// Client instance
        client: Gemini,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },
}

/// Translation service dispatching chunks to the configured provider
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// System prompt template
    prompt: PromptTemplate,

    /// Accumulated token usage
    usage: Mutex<TokenUsageStats>,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let retry_count = config.common.retry_count;
        let retry_backoff_ms = config.common.retry_backoff_ms;
        let rate_limit = config.get_rate_limit();
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            ConfigTranslationProvider::Gemini => {
                let api_key = config.get_api_key();
                if api_key.is_empty() {
                    return Err(anyhow!("Translation API key is required for Gemini provider"));
                }

                TranslationProviderImpl::Gemini {
                    client: Gemini::new_with_config(
                        api_key,
                        config.get_endpoint(),
                        config.get_model(),
                        timeout_secs,
                        retry_count,
                        retry_backoff_ms,
                        rate_limit,
                    ),
                }
            },
            ConfigTranslationProvider::Ollama => {
                let (host, port) = parse_endpoint(&config.get_endpoint())?;

                TranslationProviderImpl::Ollama {
                    client: Ollama::new_with_config(host, port, timeout_secs, retry_count, retry_backoff_ms, rate_limit),
                }
            },
        };

        let prompt = if config.common.system_prompt.trim().is_empty() {
            PromptTemplate::default()
        } else {
            PromptTemplate::new(&config.common.system_prompt)
        };

        let usage = TokenUsageStats::with_provider_info(
            config.provider.display_name().to_string(),
            config.get_model(),
        );

        Ok(Self {
            provider,
            config,
            prompt,
            usage: Mutex::new(usage),
        })
    }

    /// Display name of the active provider
    pub fn provider_name(&self) -> &str {
        self.config.provider.display_name()
    }

    /// Model used for translation
    pub fn model(&self) -> String {
        self.config.get_model()
    }

    /// Snapshot of the token usage so far
    pub fn token_usage(&self) -> TokenUsageStats {
        self.usage.lock().clone()
    }

    /// System prompt rendered with the display names of both languages
    pub fn system_prompt(&self, source_language: &str, target_language: &str) -> String {
        self.prompt.render(
            &language_utils::display_name(source_language),
            &language_utils::display_name(target_language),
        )
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        info!("Testing connection to {} with model {}", self.provider_name(), self.model());

        match &self.provider {
            TranslationProviderImpl::Gemini { client } => client.test_connection().await,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
        }
    }

    /// Translate a single text string
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let start_time = Instant::now();
        let system_prompt = self.system_prompt(source_language, target_language);
        let temperature = self.config.common.temperature;

        let (translated_text, prompt_tokens, completion_tokens) = match &self.provider {
            TranslationProviderImpl::Gemini { client } => {
                let request = GeminiRequest::new(text)
                    .system(system_prompt)
                    .temperature(temperature);

                let response = client.complete(request).await?;
                let usage = response.usage_metadata.as_ref();

                (
                    Gemini::extract_text(&response),
                    usage.map(|u| u.prompt_token_count),
                    usage.map(|u| u.candidates_token_count),
                )
            },
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(self.config.get_model(), text)
                    .system(system_prompt)
                    .temperature(temperature);

                let response = client.complete(request).await?;

                (
                    Ollama::extract_text(&response),
                    response.prompt_eval_count,
                    response.eval_count,
                )
            },
        };

        let duration = start_time.elapsed();
        debug!("{} response received in {:?}", self.provider_name(), duration);
        self.usage.lock().add_token_usage(prompt_tokens, completion_tokens, duration);

        if translated_text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(translated_text)
    }
}

#[async_trait]
impl ChunkTranslator for TranslationService {
    async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        self.translate_text(chunk, source_language, target_language).await
    }
}
