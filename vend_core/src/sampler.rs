//! Background telemetry polling.
//!
//! Spawns a thread that owns the `TelemetrySource`, publishes the newest
//! sample through a single-slot channel, and tracks the last-ok timestamp
//! for a stall check.
//!
//! Each `Sampler` owns exactly one thread, which is signalled and joined
//! when the `Sampler` is dropped.
use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use vend_traits::clock::Clock;
use vend_traits::{TelemetrySample, TelemetrySource};

/// Longest uninterrupted sleep; bounds how long `Drop` waits on a paced thread.
const SLEEP_SLICE: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy)]
pub struct SamplerCfg {
    /// Delay between polls.
    pub period: Duration,
    /// Timeout handed to every `TelemetrySource::read`.
    pub read_timeout: Duration,
}

impl Default for SamplerCfg {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(3000),
            read_timeout: Duration::from_millis(150),
        }
    }
}

pub struct Sampler {
    rx: xch::Receiver<TelemetrySample>,
    last_ok: Arc<AtomicU64>,
    read_errors: Arc<AtomicU64>,
    epoch: Instant,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Sampler {
    pub fn spawn<S, C>(mut source: S, cfg: SamplerCfg, clock: C) -> Self
    where
        S: TelemetrySource + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (tx, rx) = xch::bounded(1);
        let stale_rx = rx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let read_errors = Arc::new(AtomicU64::new(0));
        let read_errors_clone = read_errors.clone();
        let epoch = clock.now();

        let join_handle = std::thread::spawn(move || {
            tracing::debug!(period_ms = cfg.period.as_millis() as u64, "sampler started");
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("sampler received shutdown signal");
                    break;
                }

                match source.read(cfg.read_timeout) {
                    Ok(sample) => {
                        publish_latest(&tx, &stale_rx, sample);
                        last_ok_clone.store(clock.elapsed_ms(epoch), Ordering::Relaxed);
                    }
                    Err(e) => {
                        read_errors_clone.fetch_add(1, Ordering::Relaxed);
                        tracing::debug!(error = %e, "telemetry read failed");
                    }
                }

                if !sleep_unless_shutdown(&clock, cfg.period, &shutdown_clone) {
                    break;
                }
            }
            tracing::trace!("sampler thread exiting cleanly");
        });

        Self {
            rx,
            last_ok,
            read_errors,
            epoch,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Newest sample published since the last call, if any.
    pub fn latest(&self) -> Option<TelemetrySample> {
        self.rx.try_iter().last()
    }

    /// Block up to `timeout` for the next sample.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TelemetrySample> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Number of failed reads so far.
    pub fn read_errors(&self) -> u64 {
        self.read_errors.load(Ordering::Relaxed)
    }

    /// Milliseconds between `now_ms` (relative to this sampler's epoch) and the
    /// last successful read.
    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }

    /// `stalled_for` against the real monotonic clock.
    pub fn stalled_for_now(&self) -> u64 {
        let ms = Instant::now().saturating_duration_since(self.epoch).as_millis();
        self.stalled_for(u64::try_from(ms).unwrap_or(u64::MAX))
    }
}

/// Replace whatever is waiting in the single slot with `sample`.
fn publish_latest(
    tx: &xch::Sender<TelemetrySample>,
    stale_rx: &xch::Receiver<TelemetrySample>,
    sample: TelemetrySample,
) {
    if let Err(xch::TrySendError::Full(sample)) = tx.try_send(sample) {
        let _ = stale_rx.try_recv();
        let _ = tx.try_send(sample);
    }
}

/// Sleep `total` in slices. Returns false if shutdown was requested.
fn sleep_unless_shutdown<C: Clock>(clock: &C, total: Duration, shutdown: &AtomicBool) -> bool {
    let mut left = total;
    while !left.is_zero() {
        if shutdown.load(Ordering::Relaxed) {
            return false;
        }
        let step = left.min(SLEEP_SLICE);
        clock.sleep(step);
        left = left.saturating_sub(step);
    }
    !shutdown.load(Ordering::Relaxed)
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The thread exits after the current read (bounded by the read timeout)
        // or within one sleep slice.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("sampler thread joined"),
                Err(e) => tracing::warn!(?e, "sampler thread panicked during shutdown"),
            }
        }
    }
}
