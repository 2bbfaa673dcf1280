use rstest::rstest;
use std::fs;
use std::io::Write;
use tempfile::tempdir;
use vend_config::load_telemetry_csv;

fn write_csv(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("telemetry.csv");
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
fn loads_rows_in_order() {
    let dir = tempdir().unwrap();
    let path = write_csv(&dir, "rpm,vibration\n40,5\n45,30\n12.5,0\n");
    let samples = load_telemetry_csv(&path).expect("valid CSV");
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].rpm, 40.0);
    assert_eq!(samples[0].vibration, 5.0);
    assert_eq!(samples[1].vibration, 30.0);
    assert_eq!(samples[2].rpm, 12.5);
}

#[test]
fn tolerates_whitespace_around_fields() {
    let dir = tempdir().unwrap();
    let path = write_csv(&dir, "rpm, vibration\n 40 , 5\n");
    let samples = load_telemetry_csv(&path).expect("trimmed CSV");
    assert_eq!(samples.len(), 1);
}

#[rstest]
#[case("rpm,vib\n40,5\n", "headers 'rpm,vibration'")]
#[case("vibration,rpm\n5,40\n", "headers 'rpm,vibration'")]
#[case("rpm,vibration\n", "has no rows")]
#[case("rpm,vibration\n40,abc\n", "invalid CSV row 2")]
#[case("rpm,vibration\n40,5\n-1,5\n", "row 3 has a negative reading")]
#[case("rpm,vibration\nNaN,5\n", "row 2 has a non-finite reading")]
fn rejects_bad_files(#[case] body: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let path = write_csv(&dir, body);
    let err = load_telemetry_csv(&path).expect_err("should fail");
    assert!(
        format!("{err}").contains(needle),
        "expected '{needle}' in '{err}'"
    );
}

#[test]
fn missing_file_is_reported_with_path() {
    let dir = tempdir().unwrap();
    let err = load_telemetry_csv(&dir.path().join("nope.csv")).expect_err("missing");
    assert!(format!("{err}").contains("open telemetry CSV"));
}
