//! Bounded telemetry history behind the dashboard graphs.

use std::collections::VecDeque;
use vend_traits::TelemetrySample;

pub const DEFAULT_HISTORY_LEN: usize = 50;
pub const DEFAULT_GRAPH_POINTS: usize = 30;

/// Replace non-finite readings with 0, the way the store's missing or
/// garbled fields are read.
#[inline]
pub fn sanitize(sample: TelemetrySample) -> TelemetrySample {
    let clean = |x: f64| if x.is_finite() { x } else { 0.0 };
    TelemetrySample::new(clean(sample.rpm), clean(sample.vibration))
}

/// Ring of the most recent samples, oldest first.
///
/// Starts with a single zero sample so graphs always have a baseline.
#[derive(Debug, Clone)]
pub struct TelemetryHistory {
    samples: VecDeque<TelemetrySample>,
    cap: usize,
}

impl Default for TelemetryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl TelemetryHistory {
    /// `cap` is clamped to at least 1.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        let mut samples = VecDeque::with_capacity(cap);
        samples.push_back(TelemetrySample::default());
        Self { samples, cap }
    }

    pub fn push(&mut self, sample: TelemetrySample) {
        if self.samples.len() == self.cap {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn latest(&self) -> TelemetrySample {
        self.samples.back().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The last `n` samples (fewer if the history is shorter), oldest first.
    pub fn window(&self, n: usize) -> impl Iterator<Item = &TelemetrySample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip)
    }

    pub fn rpm_series(&self, n: usize) -> Vec<f64> {
        self.window(n).map(|s| s.rpm).collect()
    }

    pub fn vibration_series(&self, n: usize) -> Vec<f64> {
        self.window(n).map(|s| s.vibration).collect()
    }
}
