/*!
 * Error types for the scenestock application.
 *
 * This module contains custom error types for each stage of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors raised while validating the uploaded script document
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Input bytes were empty or not decodable as JSON
    #[error("Script is not valid JSON: {0}")]
    InvalidJson(String),

    /// The top-level scenes array field is missing
    #[error("Script document has no scenes array (expected a 'scenes' or 'response' field)")]
    MissingScenes,

    /// The scenes field exists but is not an array
    #[error("Script field '{0}' is not an array")]
    NotAnArray(String),

    /// The scenes array is present but empty
    #[error("Script document contains no scenes")]
    EmptyScenes,

    /// A scene is missing its phrase or the phrase is empty
    #[error("Scene {0} has an empty phrase")]
    EmptyPhrase(usize),

    /// Supplied scene order values must be unique positive integers
    #[error("Invalid scene order value: {0}")]
    InvalidOrder(String),
}

/// Errors that can occur when invoking the generative model
#[derive(Error, Debug)]
pub enum ModelCallError {
    /// Error when making an API request fails
    #[error("Model request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the API itself
    #[error("Model API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Model authentication error: {0}")]
    AuthenticationError(String),

    /// Error related to rate limiting or quota
    #[error("Model rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

/// Errors raised while parsing the model's free-form text response
#[derive(Error, Debug)]
pub enum ModelResponseError {
    /// No balanced JSON array substring was found in the response text
    #[error("Model response contains no JSON array")]
    NoJsonArray,

    /// An array was found but could not be parsed as JSON
    #[error("Model response array is not parseable JSON: {0}")]
    ParseError(String),

    /// Parsing succeeded but zero entries survived structural validation
    #[error("No valid scene entries in model response ({dropped} entries dropped)")]
    NoValidEntries {
        /// Number of entries rejected during validation
        dropped: usize,
    },
}

/// Errors that can occur while resolving a single media suggestion.
///
/// These are always absorbed locally by the resolver (the suggestion
/// degrades to an empty media list) and never surface as pipeline failure.
#[derive(Error, Debug)]
pub enum SuggestionResolutionError {
    /// Error when making the provider request fails
    #[error("Media provider request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the provider API itself
    #[error("Media provider responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the provider
        message: String,
    },

    /// Provider replied but the payload did not match the expected shape
    #[error("Malformed media provider response: {0}")]
    MalformedResponse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Fatal input validation failure (4xx-equivalent)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Fatal model transport/auth failure (5xx-equivalent)
    #[error("Model call error: {0}")]
    ModelCall(#[from] ModelCallError),

    /// Fatal model output failure, distinct from transport failure
    #[error("Model response error: {0}")]
    ModelResponse(#[from] ModelResponseError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
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
