use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::model::SentimentModel;
use super::preprocess::{Preprocessor, TweetPreprocessor};
use super::result::AnalysisResult;
use crate::error::Result;
use crate::pipelines::provider::AnalyzerProvider;
use crate::pipelines::stats::PipelineStats;

/// Turns raw review text into an [`AnalysisResult`].
///
/// Construct with [`SentimentAnalyzerBuilder`](super::SentimentAnalyzerBuilder), or
/// directly from a provider when the model type is custom.
///
/// # Examples
///
/// ```rust,no_run
/// # use sentimiento::sentiment::SentimentAnalyzerBuilder;
/// # fn main() -> sentimiento::error::Result<()> {
/// let analyzer = SentimentAnalyzerBuilder::robertuito().build();
///
/// let result = analyzer.analyze_review_sentiment("¡Me encantó el servicio!")?;
/// println!(
///     "{} -> {}",
///     result.sentiment_analysis.label, result.summary.puntuacion_estrellas
/// );
/// # Ok(())
/// # }
/// ```
pub struct SentimentAnalyzer<M: SentimentModel, P: Preprocessor = TweetPreprocessor> {
    provider: AnalyzerProvider<M>,
    preprocessor: P,
    // One forward pass at a time: peak memory stays that of a single request.
    predict_gate: Mutex<()>,
}

impl<M: SentimentModel> SentimentAnalyzer<M, TweetPreprocessor> {
    /// Analyzer with the default social-text preprocessing.
    pub fn new(provider: AnalyzerProvider<M>) -> Self {
        Self::with_preprocessor(provider, TweetPreprocessor::default())
    }
}

impl<M: SentimentModel, P: Preprocessor> SentimentAnalyzer<M, P> {
    /// Analyzer with a custom preprocessor.
    pub fn with_preprocessor(provider: AnalyzerProvider<M>, preprocessor: P) -> Self {
        Self {
            provider,
            preprocessor,
            predict_gate: Mutex::new(()),
        }
    }

    /// Classify `review_text` and derive its star rating.
    ///
    /// Any string is accepted, including the empty one. The first call constructs the
    /// model. Concurrent callers share the model but take turns running it.
    ///
    /// # Errors
    ///
    /// Returns the provider's construction error or the model's prediction error
    /// unchanged. There is no partial result.
    pub fn analyze_review_sentiment(&self, review_text: &str) -> Result<AnalysisResult> {
        let stats = PipelineStats::start();

        let processed = self.preprocessor.preprocess(review_text);
        let model = self.provider.acquire()?;
        let prediction = {
            let _turn = self
                .predict_gate
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            model.predict(&processed)?
        };
        let result = AnalysisResult::assemble(review_text, processed, &prediction);

        let stats = stats.finish();
        debug!(
            label = %result.sentiment_analysis.label,
            stars = result.rating().get(),
            elapsed_ms = stats.millis(),
            "analyzed review"
        );
        Ok(result)
    }

    /// The provider owning the model.
    pub fn provider(&self) -> &AnalyzerProvider<M> {
        &self.provider
    }

    /// Construct the model now instead of on the first analysis.
    ///
    /// # Errors
    ///
    /// Returns the construction error; a later call retries.
    pub fn warm_up(&self) -> Result<Arc<M>> {
        self.provider.acquire()
    }
}
