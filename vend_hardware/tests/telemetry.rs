use rstest::rstest;
use std::time::Duration;
use vend_hardware::error::LinkError;
use vend_hardware::{ReplayTelemetry, SimulatedTelemetry};
use vend_traits::{TelemetrySample, TelemetrySource};

const T: Duration = Duration::from_millis(10);

#[rstest]
#[case(100.0, 50.0)]
#[case(10.0, 3.0)]
fn simulated_readings_are_whole_and_bounded(#[case] max_rpm: f64, #[case] max_vib: f64) {
    let mut sim = SimulatedTelemetry::new(max_rpm, max_vib, Some(7));
    for _ in 0..500 {
        let s = sim.read(T).unwrap();
        assert!((0.0..max_rpm).contains(&s.rpm), "{s:?}");
        assert!((0.0..max_vib).contains(&s.vibration), "{s:?}");
        assert_eq!(s.rpm.fract(), 0.0);
        assert_eq!(s.vibration.fract(), 0.0);
    }
}

#[test]
fn seeded_simulations_repeat() {
    let mut a = SimulatedTelemetry::new(100.0, 50.0, Some(42));
    let mut b = SimulatedTelemetry::new(100.0, 50.0, Some(42));
    let xs: Vec<_> = (0..20).map(|_| a.next_sample()).collect();
    let ys: Vec<_> = (0..20).map(|_| b.next_sample()).collect();
    assert_eq!(xs, ys);
}

#[test]
fn replay_wraps_around() {
    let samples = vec![TelemetrySample::new(10.0, 1.0), TelemetrySample::new(20.0, 2.0)];
    let mut r = ReplayTelemetry::new(samples.clone()).unwrap();
    assert_eq!(r.len(), 2);
    let got: Vec<_> = (0..5).map(|_| r.read(T).unwrap()).collect();
    assert_eq!(
        got,
        vec![samples[0], samples[1], samples[0], samples[1], samples[0]]
    );
}

#[test]
fn empty_replay_is_rejected() {
    assert!(matches!(ReplayTelemetry::new(Vec::new()), Err(LinkError::Empty)));
}
