use crate::config::RuntimeConfig;
use crate::error::Result;

use super::prediction::Prediction;

/// A sentiment classifier the analyzer can drive.
///
/// Implementations own whatever they need to run (weights, tokenizer, device). The
/// analyzer only calls [`load`](Self::load) once through its provider and then
/// [`predict`](Self::predict) per request.
pub trait SentimentModel: Send + Sync {
    /// Everything needed to construct the model.
    type Options: std::fmt::Debug + Clone + Send + Sync;

    /// Construct the model for inference under `runtime`.
    ///
    /// This is the expensive step: it may download and map weights.
    fn load(options: Self::Options, runtime: &RuntimeConfig) -> Result<Self>
    where
        Self: Sized;

    /// Classify already preprocessed text.
    fn predict(&self, text: &str) -> Result<Prediction>;
}
