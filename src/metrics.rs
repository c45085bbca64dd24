use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use crate::error::CompareError;

/// Metrics observer for the prepare and compare stages.
pub trait CompareMetrics: Send + Sync {
    fn record_prepare(&self, latency: Duration, result: Result<(), CompareError>);
    fn record_pair(&self, latency: Duration, result: Result<(), CompareError>);
}

/// Install or clear the global compare metrics recorder.
pub fn set_compare_metrics(recorder: Option<Arc<dyn CompareMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("compare metrics lock poisoned");
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn CompareMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn CompareMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn CompareMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn CompareMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_prepare(self, result: Result<(), CompareError>) {
        self.recorder.record_prepare(self.start.elapsed(), result);
    }

    pub(crate) fn record_pair(self, result: Result<(), CompareError>) {
        self.recorder.record_pair(self.start.elapsed(), result);
    }
}
