//! Lazy, single-instance ownership of the sentiment model.
//!
//! Loading the classifier takes seconds and hundreds of megabytes, so it is built on
//! first use and kept for the life of the provider. The cell guarding the instance
//! admits exactly one constructor at a time: concurrent first callers wait for the
//! running construction instead of starting their own. A failed construction leaves the
//! cell empty, so the next caller retries from scratch.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::pipelines::sentiment::SentimentModel;
use crate::pipelines::stats::PipelineStats;

/// Owns the lifecycle of one [`SentimentModel`] instance.
///
/// # Examples
///
/// ```rust
/// use sentimiento::config::RuntimeConfig;
/// use sentimiento::error::Result;
/// use sentimiento::provider::AnalyzerProvider;
/// use sentimiento::sentiment::{Prediction, ProbabilityDistribution, SentimentModel};
///
/// struct AlwaysNeutral;
///
/// impl SentimentModel for AlwaysNeutral {
///     type Options = ();
///     fn load(_: (), _: &RuntimeConfig) -> Result<Self> {
///         Ok(AlwaysNeutral)
///     }
///     fn predict(&self, _: &str) -> Result<Prediction> {
///         Ok(Prediction::new("NEU", ProbabilityDistribution::new().with("NEU", 1.0)))
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let provider = AnalyzerProvider::<AlwaysNeutral>::new((), RuntimeConfig::default());
/// assert!(!provider.is_ready());
///
/// let first = provider.acquire()?;
/// let second = provider.acquire()?;
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(provider.constructions(), 1);
/// # Ok(())
/// # }
/// ```
pub struct AnalyzerProvider<M: SentimentModel> {
    options: M::Options,
    runtime: RuntimeConfig,
    instance: OnceCell<Arc<M>>,
    constructions: AtomicUsize,
}

impl<M: SentimentModel> AnalyzerProvider<M> {
    /// Create an uninitialized provider. Nothing is loaded until [`Self::acquire`].
    pub fn new(options: M::Options, runtime: RuntimeConfig) -> Self {
        Self {
            options,
            runtime,
            instance: OnceCell::new(),
            constructions: AtomicUsize::new(0),
        }
    }

    /// Return the model, constructing it if this is the first successful call.
    ///
    /// # Errors
    ///
    /// Propagates the construction error. The provider stays uninitialized and the
    /// next call retries.
    pub fn acquire(&self) -> Result<Arc<M>> {
        self.instance
            .get_or_try_init(|| self.construct())
            .map(Arc::clone)
    }

    fn construct(&self) -> Result<Arc<M>> {
        let attempt = self.constructions.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            attempt,
            options = ?self.options,
            compute_threads = self.runtime.compute_threads,
            cpu_only = self.runtime.cpu_only,
            "constructing sentiment analyzer"
        );

        let stats = PipelineStats::start();
        match M::load(self.options.clone(), &self.runtime) {
            Ok(model) => {
                let stats = stats.finish();
                info!(attempt, elapsed_ms = stats.millis(), "sentiment analyzer ready");
                Ok(Arc::new(model))
            }
            Err(e) => {
                warn!(attempt, error = %e, "sentiment analyzer construction failed");
                Err(e)
            }
        }
    }

    /// Whether the model has been constructed.
    pub fn is_ready(&self) -> bool {
        self.instance.get().is_some()
    }

    /// Number of construction attempts so far, successful or not.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }
}

impl<M: SentimentModel> fmt::Debug for AnalyzerProvider<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerProvider")
            .field("options", &self.options)
            .field("runtime", &self.runtime)
            .field("ready", &self.is_ready())
            .field("constructions", &self.constructions())
            .finish()
    }
}
