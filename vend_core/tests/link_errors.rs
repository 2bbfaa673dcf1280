use rstest::rstest;
use vend_core::VendError;
use vend_core::link_error::{map_link_error, map_source_error};

#[rstest]
#[case("request timeout", VendError::Timeout)]
#[case("operation timed out", VendError::Timeout)]
#[case("connection refused", VendError::Delivery("connection refused".into()))]
fn string_errors_are_classified(#[case] msg: &str, #[case] expected: VendError) {
    let e = std::io::Error::other(msg.to_string());
    assert_eq!(map_link_error(&e), expected);
}

#[test]
fn source_errors_are_telemetry_errors() {
    let e = std::io::Error::other("bad frame");
    assert_eq!(map_source_error(&e), VendError::Telemetry("bad frame".into()));
}

#[cfg(feature = "link-errors")]
#[test]
fn link_errors_downcast_precisely() {
    use vend_hardware::error::LinkError;

    let boxed: vend_traits::BoxError = Box::new(LinkError::Timeout);
    assert_eq!(map_link_error(boxed.as_ref()), VendError::Timeout);

    let boxed: vend_traits::BoxError = Box::new(LinkError::Unavailable("outbox closed".into()));
    assert!(matches!(map_link_error(boxed.as_ref()), VendError::Delivery(s) if s.contains("outbox closed")));

    let boxed: vend_traits::BoxError = Box::new(LinkError::Empty);
    assert!(matches!(map_source_error(boxed.as_ref()), VendError::Telemetry(_)));
}
