/*!
 * Error types for the dmtranslate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
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
        message: String
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

    /// The request did not complete within the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The API answered but the answer carried no text
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Map a non-success HTTP status to the matching provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// A line selected for translation that does not follow the `KEY = value` layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// No `=` separator on a line that matched the translation marker
    #[error("Line {} has no '=' separator: {line}", line_index + 1)]
    MissingSeparator {
        /// 0-based position of the line in the input
        line_index: usize,
        /// The offending line, without its terminator
        line: String,
    },
}

/// Configuration problems, all of them detected before any translation starts
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Worker pool size outside `1..=MAX_CONCURRENCY`
    #[error("Concurrency must be between 1 and {max}, got {0}", max = crate::translation::parallel::MAX_CONCURRENCY)]
    InvalidConcurrency(usize),

    /// The input file does not exist
    #[error("Input file does not exist: {0}")]
    InputNotFound(String),

    /// The input file exists but cannot be read
    #[error("Input file cannot be read: {path} ({reason})")]
    InputUnreadable {
        /// Input path
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// The output file cannot be created or written
    #[error("Output path is not writable: {path} ({reason})")]
    OutputUnwritable {
        /// Output path
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// The selected provider requires an API key
    #[error("Translation API key is required for {0} provider")]
    MissingApiKey(String),

    /// The language is neither an ISO code nor a known English name
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// Provider endpoint is not a valid URL
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Endpoint as configured
        endpoint: String,
        /// Parse failure
        reason: String,
    },

    /// A classifier marker was configured as an empty string
    #[error("Classifier marker '{0}' must not be empty")]
    EmptyMarker(&'static str),
}
