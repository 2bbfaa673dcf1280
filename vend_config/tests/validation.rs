use rstest::rstest;
use vend_config::{SourceKind, load_toml};

#[test]
fn empty_document_is_a_valid_config() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults should validate");
    assert_eq!(cfg.optimizer.medicine_weight, 0.25);
    assert_eq!(cfg.optimizer.target_accuracy, 0.10);
    assert_eq!(cfg.telemetry.source, SourceKind::Simulated);
    assert_eq!(cfg.telemetry.sample_period_ms, 3000);
    assert_eq!(cfg.telemetry.history_len, 50);
    assert_eq!(cfg.telemetry.graph_points, 30);
    assert_eq!(cfg.simulation.max_rpm, 100);
    assert_eq!(cfg.simulation.max_vibration, 50);
    assert_eq!(cfg.store.command_path, "7_Fuzzy_Logic/command");
}

#[test]
fn full_document_parses() {
    let toml = r#"
[optimizer]
medicine_weight = 0.4
target_accuracy = 0.05

[telemetry]
source = "replay"
replay_csv = "etc/telemetry.csv"
sample_period_ms = 250
timeout_ms = 20
history_len = 10
graph_points = 10

[simulation]
max_rpm = 80
max_vibration = 40
seed = 7

[store]
command_path = "machines/a1/command"
outbox = "var/outbox.jsonl"

[logging]
level = "debug"
rotation = "daily"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.telemetry.source, SourceKind::Replay);
    assert_eq!(cfg.telemetry.read_timeout_ms, 20);
    assert_eq!(cfg.simulation.seed, Some(7));
    assert_eq!(cfg.store.outbox.as_deref(), Some("var/outbox.jsonl"));
}

#[rstest]
#[case("[optimizer]\nmedicine_weight = 0.0", "medicine_weight")]
#[case("[optimizer]\nmedicine_weight = -1.0", "medicine_weight")]
#[case("[optimizer]\ntarget_accuracy = 0.0", "target_accuracy")]
#[case("[telemetry]\nsource = \"replay\"", "replay_csv is required")]
#[case("[telemetry]\nsample_period_ms = 0", "sample_period_ms must be >= 1")]
#[case("[telemetry]\nread_timeout_ms = 0", "read_timeout_ms must be >= 1")]
#[case("[telemetry]\nhistory_len = 1\ngraph_points = 1", "history_len must be >= 2")]
#[case("[telemetry]\nhistory_len = 10\ngraph_points = 20", "graph_points must be in")]
#[case("[simulation]\nmax_rpm = 0", "max_rpm must be > 0")]
#[case("[simulation]\nmax_vibration = 0", "max_vibration must be > 0")]
#[case("[store]\ncommand_path = \"  \"", "command_path must not be empty")]
#[case("[logging]\nrotation = \"weekly\"", "rotation must be one of")]
fn rejects_out_of_range_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "expected '{needle}' in '{err}'"
    );
}

#[test]
fn unknown_source_kind_is_a_parse_error() {
    let err = load_toml("[telemetry]\nsource = \"firebase\"").expect_err("unknown variant");
    assert!(err.to_string().contains("firebase"));
}

#[test]
fn load_file_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = vend_config::load_file(&dir.path().join("missing.toml")).expect_err("no file");
    assert!(format!("{err}").contains("read config"));
}
