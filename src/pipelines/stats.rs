use std::time::{Duration, Instant};

/// Timing for one pipeline step (model construction or a single analysis).
#[derive(Debug, Clone, Copy)]
pub struct PipelineStats {
    /// Total execution time.
    pub total_time: Duration,
}

impl PipelineStats {
    /// Start timing (call at start of operation).
    pub(crate) fn start() -> PipelineStatsBuilder {
        PipelineStatsBuilder {
            start_time: Instant::now(),
        }
    }

    /// Elapsed time in milliseconds, for log fields.
    pub fn millis(&self) -> f64 {
        self.total_time.as_secs_f64() * 1000.0
    }
}

/// Tracks timing from creation to [`finish`](Self::finish).
pub(crate) struct PipelineStatsBuilder {
    start_time: Instant,
}

impl PipelineStatsBuilder {
    /// Finalize stats.
    pub fn finish(self) -> PipelineStats {
        PipelineStats {
            total_time: self.start_time.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineStats;
    use std::time::Duration;

    #[test]
    fn measures_elapsed_time() {
        let builder = PipelineStats::start();
        std::thread::sleep(Duration::from_millis(5));
        let stats = builder.finish();
        assert!(stats.total_time >= Duration::from_millis(5));
        assert!(stats.millis() >= 5.0);
    }
}
