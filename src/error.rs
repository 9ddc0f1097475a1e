//! Error types for this crate.
//!
//! All fallible operations return [`Result<T>`] which uses [`AnalyzerError`] as the error type.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`AnalyzerError`] as the error type.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// The unified error type for all crate errors.
///
/// The first four variants are construction failures: the analyzer could not be built and
/// the provider stays uninitialized, so the next request retries.
///
/// # Example
///
/// ```rust
/// use sentimiento::error::AnalyzerError;
///
/// fn is_retryable(e: &AnalyzerError) -> bool {
///     matches!(e, AnalyzerError::Download(_) | AnalyzerError::Construction(_))
/// }
///
/// assert!(is_retryable(&AnalyzerError::Download("timeout".into())));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnalyzerError {
    /// Network or download failure. Retry may help.
    #[error("download failed: {0}")]
    Download(String),

    /// Tokenizer could not be loaded, or the input could not be encoded.
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    /// Device or inference runtime could not be set up.
    #[error("device error: {0}")]
    Device(String),

    /// Weights or model config are missing or incompatible.
    #[error("failed to construct analyzer: {0}")]
    Construction(String),

    /// Forward pass or output decoding failed.
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl From<hf_hub::api::sync::ApiError> for AnalyzerError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        AnalyzerError::Download(format!("HuggingFace API error: {value}"))
    }
}

impl From<candle_core::Error> for AnalyzerError {
    fn from(value: candle_core::Error) -> Self {
        AnalyzerError::Prediction(value.to_string())
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(value: std::io::Error) -> Self {
        AnalyzerError::Unexpected(value.to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(value: serde_json::Error) -> Self {
        AnalyzerError::Construction(value.to_string())
    }
}

impl From<figment::Error> for AnalyzerError {
    fn from(value: figment::Error) -> Self {
        AnalyzerError::Config(value.to_string())
    }
}
