#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core logic of the smart medicine vending dashboard (transport-agnostic).
//!
//! All I/O goes through `vend_traits::TelemetrySource` and
//! `vend_traits::CommandSink`; this crate only computes and keeps state.
//!
//! ## Architecture
//!
//! - **Optimizer**: precision-dispensing fuzzy inference (`optimizer`)
//! - **Fuzzy sets**: three-term partitions and AND (`fuzzy`)
//! - **Catalog**: the eleven selectable strategies and command codes (`catalog`)
//! - **Telemetry**: bounded history for graphs (`telemetry`) and background
//!   polling (`sampler`)
//! - **Session**: status, link state and strategy activation (`dashboard`)

pub mod builder;
pub mod catalog;
pub mod conversions;
pub mod dashboard;
pub mod error;
pub mod fuzzy;
pub mod link_error;
pub mod mocks;
pub mod optimizer;
pub mod rounding;
pub mod sampler;
pub mod status;
pub mod telemetry;

pub use builder::DashboardBuilder;
pub use catalog::{CATALOG, Strategy};
pub use dashboard::{Activation, Analysis, AnalysisKind, Dashboard};
pub use error::{BuildError, VendError};
pub use optimizer::{
    Inference, OptimizationResult, OptimizerParams, infer, optimize, optimize_with,
    predict_accuracy,
};
pub use status::{LinkState, MachineStatus};
pub use telemetry::TelemetryHistory;
pub use vend_traits::TelemetrySample;

/// Reject readings the optimizer cannot give a meaningful answer for.
///
/// `optimize` itself accepts anything; callers taking operator input use this
/// first.
pub fn check_reading(vibration: f64, rpm: f64) -> Result<(), VendError> {
    for (name, v) in [("vibration", vibration), ("rpm", rpm)] {
        if !v.is_finite() {
            return Err(VendError::InvalidInput(format!("{name} must be a finite number")));
        }
        if v < 0.0 {
            return Err(VendError::InvalidInput(format!("{name} must be >= 0, got {v}")));
        }
    }
    Ok(())
}
