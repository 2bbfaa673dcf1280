//! Maps `Box<dyn Error>` from trait boundaries to typed `VendError`.
//!
//! `vend_traits` uses boxed errors so any backend can plug in; this module
//! recovers a typed error, with a feature-gated path that downcasts
//! `vend_hardware::LinkError` precisely.

use crate::error::VendError;

pub fn map_link_error(e: &(dyn std::error::Error + 'static)) -> VendError {
    #[cfg(feature = "link-errors")]
    {
        use vend_hardware::error::LinkError;
        if let Some(link) = e.downcast_ref::<LinkError>() {
            return match link {
                LinkError::Timeout => VendError::Timeout,
                LinkError::Empty => VendError::Telemetry(link.to_string()),
                other => VendError::Delivery(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") || s.to_lowercase().contains("timed out") {
        VendError::Timeout
    } else {
        VendError::Delivery(s)
    }
}

/// Like `map_link_error`, for failures on the telemetry side.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> VendError {
    match map_link_error(e) {
        VendError::Delivery(s) => VendError::Telemetry(s),
        other => other,
    }
}
