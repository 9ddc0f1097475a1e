use super::model::SentimentModel;
use super::pipeline::SentimentAnalyzer;
use super::preprocess::TweetPreprocessor;
use crate::config::RuntimeConfig;
use crate::models::{RobertuitoOptions, RobertuitoSentimentModel};
use crate::pipelines::provider::AnalyzerProvider;

/// Builder for [`SentimentAnalyzer`] instances.
///
/// Building is cheap: the model itself is constructed lazily on the first analysis.
///
/// # Examples
///
/// ```rust,no_run
/// # use sentimiento::sentiment::SentimentAnalyzerBuilder;
/// let analyzer = SentimentAnalyzerBuilder::robertuito()
///     .repo("pysentimiento/robertuito-sentiment-analysis")
///     .compute_threads(1)
///     .build();
/// ```
pub struct SentimentAnalyzerBuilder<M: SentimentModel> {
    options: M::Options,
    runtime: RuntimeConfig,
    preprocessor: TweetPreprocessor,
}

impl<M: SentimentModel> SentimentAnalyzerBuilder<M> {
    /// Builder for any model type from its options.
    pub fn new(options: M::Options) -> Self {
        Self {
            options,
            runtime: RuntimeConfig::default(),
            preprocessor: TweetPreprocessor::default(),
        }
    }

    /// Replace the whole runtime configuration.
    pub fn runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Threads available to the math kernels.
    pub fn compute_threads(mut self, threads: usize) -> Self {
        self.runtime.compute_threads = threads;
        self
    }

    /// Run on CPU only (default), or allow an accelerator when one is available.
    pub fn cpu_only(mut self, cpu_only: bool) -> Self {
        self.runtime.cpu_only = cpu_only;
        self
    }

    /// Replace the preprocessing settings.
    pub fn preprocessor(mut self, preprocessor: TweetPreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Build the analyzer. No model is loaded yet.
    pub fn build(self) -> SentimentAnalyzer<M> {
        SentimentAnalyzer::with_preprocessor(
            AnalyzerProvider::new(self.options, self.runtime),
            self.preprocessor,
        )
    }
}

impl SentimentAnalyzerBuilder<RobertuitoSentimentModel> {
    /// Builder for the Spanish RoBERTuito sentiment classifier.
    pub fn robertuito() -> Self {
        Self::new(RobertuitoOptions::default())
    }

    /// Hub repository to load the RoBERTuito weights from.
    pub fn repo(mut self, repo: impl Into<String>) -> Self {
        self.options.repo = repo.into();
        self
    }

    /// Longest token sequence fed to the model; longer inputs are truncated.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.options.max_length = max_length;
        self
    }
}
