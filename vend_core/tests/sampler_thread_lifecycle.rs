//! Sampler threads publish readings and exit when the sampler is dropped.

use std::time::Duration;
use vend_core::mocks::{FixedSource, SilentSource};
use vend_core::sampler::{Sampler, SamplerCfg};
use vend_traits::TelemetrySample;
use vend_traits::clock::{ManualClock, SystemClock};

fn fast() -> SamplerCfg {
    SamplerCfg {
        period: Duration::from_millis(5),
        read_timeout: Duration::from_millis(5),
    }
}

#[test]
fn sampler_publishes_readings() {
    let sample = TelemetrySample::new(42.0, 7.0);
    let sampler = Sampler::spawn(FixedSource(sample), fast(), SystemClock);
    assert_eq!(sampler.recv_timeout(Duration::from_secs(2)), Some(sample));
    assert_eq!(sampler.read_errors(), 0);
}

#[test]
fn sampler_thread_exits_on_drop() {
    let sampler = Sampler::spawn(
        FixedSource::default(),
        SamplerCfg {
            period: Duration::from_secs(60),
            read_timeout: Duration::from_millis(5),
        },
        SystemClock,
    );
    std::thread::sleep(Duration::from_millis(20));
    // Returns within one sleep slice even with a long period.
    drop(sampler);
}

#[test]
fn multiple_samplers_dont_leak_threads() {
    for _ in 0..10 {
        let sampler = Sampler::spawn(FixedSource::default(), fast(), SystemClock);
        std::thread::sleep(Duration::from_millis(10));
        let _ = sampler.latest();
        drop(sampler);
    }
}

#[test]
fn failed_reads_are_counted_and_stall_grows() {
    let clock = ManualClock::new();
    let sampler = Sampler::spawn(SilentSource, fast(), clock.clone());
    assert_eq!(sampler.recv_timeout(Duration::from_millis(50)), None);
    assert!(sampler.read_errors() > 0);
    assert_eq!(sampler.stalled_for(500), 500);
}

#[test]
fn latest_drains_to_the_newest_sample() {
    let sample = TelemetrySample::new(1.0, 2.0);
    let sampler = Sampler::spawn(FixedSource(sample), fast(), SystemClock);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(sampler.latest(), Some(sample));
}
