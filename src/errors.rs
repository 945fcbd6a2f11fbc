/*!
 * Error types for the ltwai application.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when building or sending an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered successfully but without any text
    #[error("Provider returned an empty translation")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether a new attempt of the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Errors raised by the text splitting and subtitle building functions
#[derive(Error, Debug, PartialEq)]
pub enum TextError {
    /// A size bound or reading rate was not strictly positive
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors that can occur during a chunked translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// One chunk could not be translated; the whole operation was aborted
    #[error("Translation of chunk {chunk_index}/{total_chunks} failed: {source}")]
    ChunkTranslationFailed {
        /// 1-based index of the failed chunk
        chunk_index: usize,
        /// Number of chunks the text was split into
        total_chunks: usize,
        /// Underlying provider failure
        #[source]
        source: ProviderError,
    },

    /// Splitting parameters were rejected before any request was made
    #[error(transparent)]
    InvalidConfiguration(#[from] TextError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from text splitting or subtitle building
    #[error("Text error: {0}")]
    Text(#[from] TextError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
