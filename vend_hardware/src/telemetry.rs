use crate::error::{LinkError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use vend_traits::{BoxError, TelemetrySample, TelemetrySource};

/// Random readings standing in for the machine when its store is unreachable.
///
/// Each read yields `floor(u * max_rpm)` and `floor(u * max_vibration)` for
/// fresh uniform `u` in [0, 1).
pub struct SimulatedTelemetry {
    rng: StdRng,
    max_rpm: f64,
    max_vibration: f64,
}

impl SimulatedTelemetry {
    /// A fixed `seed` makes the sequence reproducible.
    pub fn new(max_rpm: f64, max_vibration: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            max_rpm,
            max_vibration,
        }
    }

    pub fn next_sample(&mut self) -> TelemetrySample {
        let rpm = (self.rng.r#gen::<f64>() * self.max_rpm).floor();
        let vibration = (self.rng.r#gen::<f64>() * self.max_vibration).floor();
        TelemetrySample::new(rpm, vibration)
    }
}

impl Default for SimulatedTelemetry {
    fn default() -> Self {
        Self::new(100.0, 50.0, None)
    }
}

impl TelemetrySource for SimulatedTelemetry {
    fn read(&mut self, _timeout: Duration) -> std::result::Result<TelemetrySample, BoxError> {
        let s = self.next_sample();
        tracing::trace!(rpm = s.rpm, vibration = s.vibration, "simulated reading");
        Ok(s)
    }
}

/// Plays back a recorded list of readings, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ReplayTelemetry {
    samples: Vec<TelemetrySample>,
    pos: usize,
}

impl ReplayTelemetry {
    pub fn new(samples: Vec<TelemetrySample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(LinkError::Empty);
        }
        Ok(Self { samples, pos: 0 })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl TelemetrySource for ReplayTelemetry {
    fn read(&mut self, _timeout: Duration) -> std::result::Result<TelemetrySample, BoxError> {
        let s = self.samples.get(self.pos).copied().ok_or(LinkError::Empty)?;
        self.pos = (self.pos + 1) % self.samples.len();
        Ok(s)
    }
}
