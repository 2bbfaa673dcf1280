use rstest::rstest;
use std::sync::{Arc, Mutex};
use vend_core::mocks::{NullSink, RejectingSink};
use vend_core::{AnalysisKind, Dashboard, LinkState, MachineStatus, TelemetrySample, VendError};
use vend_traits::{BoxError, CommandSink};

#[derive(Clone, Default)]
struct RecordingSink(Arc<Mutex<Vec<u8>>>);

impl CommandSink for RecordingSink {
    fn send(&mut self, command: u8) -> Result<(), BoxError> {
        self.0.lock().unwrap().push(command);
        Ok(())
    }
}

fn dashboard<K: CommandSink>(sink: K) -> Dashboard<K> {
    Dashboard::builder().with_sink(sink).build().unwrap()
}

#[test]
fn precision_strategy_runs_the_optimizer_on_the_latest_sample() {
    let mut d = dashboard(NullSink);
    d.ingest(TelemetrySample::new(40.0, 5.0));

    let a = d.activate(10).unwrap();
    assert!(a.delivered);
    assert_eq!(a.command, 10);
    assert!(a.fallback_reason.is_none());
    assert_eq!(
        a.status,
        MachineStatus::Executing {
            command: 10,
            name: "Fuzzy Logic10"
        }
    );
    assert_eq!(a.analysis.kind, AnalysisKind::Optimized);
    assert_eq!(a.analysis.result.optimal_rpm, 58);
    assert_eq!(a.analysis.result.improvement_percent, Some(-47));
    assert_eq!(a.analysis.result.vibration_delta, 0.0);
    assert_eq!(d.last_analysis(), Some(&a.analysis));
    assert_eq!(d.status().to_string(), "Executing Logic 10: Fuzzy Logic10");
}

#[rstest]
#[case(1, 1)]
#[case(9, 9)]
#[case(11, 0)]
fn commands_reach_the_sink(#[case] id: u8, #[case] command: u8) {
    let sink = RecordingSink::default();
    let mut d = dashboard(sink.clone());
    let a = d.activate(id).unwrap();
    assert_eq!(a.command, command);
    assert_eq!(*sink.0.lock().unwrap(), vec![command]);
}

#[test]
fn other_strategies_get_a_preview() {
    let mut d = dashboard(NullSink);
    d.ingest(TelemetrySample::new(40.0, 5.0));
    let a = d.activate(3).unwrap();
    assert_eq!(a.analysis.kind, AnalysisKind::Preview);
    let r = a.analysis.result;
    assert_eq!(r.optimal_rpm, 32);
    assert_eq!(r.current_accuracy, 1.0);
    assert_eq!(r.predicted_accuracy, 0.625);
    assert_eq!(r.improvement_percent, Some(35));
    assert_eq!(r.vibration_delta, 2.0);
}

#[test]
fn unreachable_store_falls_back_to_simulation() {
    let mut d = dashboard(RejectingSink);
    let a = d.activate(4).unwrap();
    assert!(!a.delivered);
    assert_eq!(
        a.fallback_reason,
        Some(VendError::Delivery("store unreachable".into()))
    );
    assert_eq!(a.status, MachineStatus::Simulation { command: 4 });
    assert_eq!(d.status().to_string(), "SIMULATION: Running Logic 4");
}

#[test]
fn unknown_strategy_leaves_state_untouched() {
    let sink = RecordingSink::default();
    let mut d = dashboard(sink.clone());
    d.report_status(Some("Dispensing"));
    assert_eq!(d.activate(12), Err(VendError::UnknownStrategy(12)));
    assert_eq!(d.status(), &MachineStatus::Reported("Dispensing".into()));
    assert!(d.last_analysis().is_none());
    assert!(sink.0.lock().unwrap().is_empty());
}

#[test]
fn history_starts_at_zero_and_ignores_garbage() {
    let mut d = dashboard(NullSink);
    assert_eq!(d.history().len(), 1);
    assert_eq!(d.latest(), TelemetrySample::default());
    d.ingest(TelemetrySample::new(f64::NAN, f64::INFINITY));
    assert_eq!(d.latest(), TelemetrySample::new(0.0, 0.0));
    assert_eq!(d.link(), LinkState::Connected);
}

#[test]
fn simulated_feed_is_flagged() {
    let mut d = dashboard(NullSink);
    d.ingest_simulated(TelemetrySample::new(12.0, 3.0));
    assert_eq!(d.link(), LinkState::Simulated);
    assert_eq!(d.status().to_string(), "SIMULATION MODE");
    d.mark_disconnected();
    assert!(!d.link().is_connected());
}

#[rstest]
#[case(None, "Standby")]
#[case(Some(""), "Standby")]
#[case(Some("  Refilling "), "Refilling")]
fn reported_status_text(#[case] text: Option<&str>, #[case] shown: &str) {
    let mut d = dashboard(NullSink);
    d.report_status(text);
    assert_eq!(d.status().to_string(), shown);
}

#[test]
fn history_is_bounded() {
    let mut d = Dashboard::builder()
        .with_sink(NullSink)
        .with_history_len(5)
        .build()
        .unwrap();
    for i in 0..20 {
        d.ingest(TelemetrySample::new(f64::from(i), 1.0));
    }
    assert_eq!(d.history().len(), 5);
    assert_eq!(d.history().rpm_series(3), vec![17.0, 18.0, 19.0]);
}
