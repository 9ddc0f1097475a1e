//! Stub classifier shared by the integration tests. Nothing here touches the network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sentimiento::config::RuntimeConfig;
use sentimiento::error::{AnalyzerError, Result};
use sentimiento::sentiment::{
    Prediction, ProbabilityDistribution, SentimentAnalyzer, SentimentAnalyzerBuilder,
    SentimentModel,
};

/// What the stub answers and how its construction behaves.
#[derive(Debug, Clone)]
pub struct StubOptions {
    pub label: String,
    pub probabilities: Vec<(String, f64)>,
    /// Loads that fail with a download error before one succeeds.
    pub failing_loads: Arc<AtomicUsize>,
    pub load_delay: Duration,
    pub fail_predict: bool,
    pub predict_delay: Duration,
    /// Predictions running right now, and the most ever seen at once.
    pub in_flight: Arc<AtomicUsize>,
    pub peak_in_flight: Arc<AtomicUsize>,
    /// Every text handed to `predict`, in order.
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl StubOptions {
    pub fn new(label: &str, probabilities: &[(&str, f64)]) -> Self {
        Self {
            label: label.to_string(),
            probabilities: probabilities
                .iter()
                .map(|(code, p)| (code.to_string(), *p))
                .collect(),
            failing_loads: Arc::new(AtomicUsize::new(0)),
            load_delay: Duration::ZERO,
            fail_predict: false,
            predict_delay: Duration::ZERO,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_loads(self, n: usize) -> Self {
        self.failing_loads.store(n, Ordering::SeqCst);
        self
    }

    pub fn load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn fail_predict(mut self) -> Self {
        self.fail_predict = true;
        self
    }

    pub fn predict_delay(mut self, delay: Duration) -> Self {
        self.predict_delay = delay;
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

pub struct StubModel {
    options: StubOptions,
}

impl SentimentModel for StubModel {
    type Options = StubOptions;

    fn load(options: StubOptions, _runtime: &RuntimeConfig) -> Result<Self> {
        std::thread::sleep(options.load_delay);
        let failed = options
            .failing_loads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(AnalyzerError::Download("hub unreachable".into()));
        }
        Ok(StubModel { options })
    }

    fn predict(&self, text: &str) -> Result<Prediction> {
        let running = self.options.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.options
            .peak_in_flight
            .fetch_max(running, Ordering::SeqCst);
        std::thread::sleep(self.options.predict_delay);
        self.options.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.options.seen.lock().unwrap().push(text.to_string());
        if self.options.fail_predict {
            return Err(AnalyzerError::Prediction("forward pass exploded".into()));
        }
        let probabilities: ProbabilityDistribution = self
            .options
            .probabilities
            .iter()
            .map(|(code, p)| (code.clone(), *p))
            .collect();
        Ok(Prediction::new(self.options.label.clone(), probabilities))
    }
}

pub fn analyzer(options: StubOptions) -> SentimentAnalyzer<StubModel> {
    SentimentAnalyzerBuilder::<StubModel>::new(options).build()
}
