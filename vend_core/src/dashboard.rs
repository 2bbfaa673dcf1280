//! Operator session: telemetry history, status and strategy activation.

use crate::catalog::{self, Strategy};
use crate::error::VendError;
use crate::link_error::map_link_error;
use crate::optimizer::{OptimizationResult, OptimizerParams, optimize_with};
use crate::rounding::{round_half_up_places, round_places, round_to_i64};
use crate::status::{LinkState, MachineStatus};
use crate::telemetry::{TelemetryHistory, sanitize};
use vend_traits::{CommandSink, TelemetrySample};

/// Improvement figure shown for strategies that are not evaluated locally.
pub const PREVIEW_IMPROVEMENT_PERCENT: i64 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    /// Computed by the precision-dispensing optimizer.
    Optimized,
    /// Rough comparison for strategies that run only on the machine.
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analysis {
    pub kind: AnalysisKind,
    /// Reading the analysis was computed from.
    pub sample: TelemetrySample,
    pub result: OptimizationResult,
}

impl Analysis {
    pub fn optimized(params: &OptimizerParams, sample: TelemetrySample) -> Self {
        Self {
            kind: AnalysisKind::Optimized,
            sample,
            result: optimize_with(params, sample.vibration, sample.rpm, Some(sample.vibration)),
        }
    }

    /// Fixed-ratio comparison: 80% of current speed, error ~ vibration/5 now
    /// and vibration/8 after.
    pub fn preview(sample: TelemetrySample) -> Self {
        let v = sample.vibration;
        Self {
            kind: AnalysisKind::Preview,
            sample,
            result: OptimizationResult {
                optimal_rpm: round_to_i64(sample.rpm * 0.8).unwrap_or(0),
                current_accuracy: round_places(v / 5.0, 3),
                predicted_accuracy: round_places(v / 8.0, 3),
                improvement_percent: Some(PREVIEW_IMPROVEMENT_PERCENT),
                vibration_delta: round_half_up_places(v - v * 0.6, 2),
            },
        }
    }
}

/// Outcome of selecting a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub strategy: &'static Strategy,
    pub command: u8,
    /// Whether the store accepted the command.
    pub delivered: bool,
    /// Why delivery failed, when it did.
    pub fallback_reason: Option<VendError>,
    pub status: MachineStatus,
    pub analysis: Analysis,
}

pub struct Dashboard<K: CommandSink> {
    pub(crate) sink: K,
    pub(crate) params: OptimizerParams,
    pub(crate) history: TelemetryHistory,
    pub(crate) status: MachineStatus,
    pub(crate) link: LinkState,
    pub(crate) last_analysis: Option<Analysis>,
}

impl<K: CommandSink> Dashboard<K> {
    pub fn builder() -> crate::builder::DashboardBuilder<K> {
        crate::builder::DashboardBuilder::new()
    }

    /// Record a sample received from the machine's store.
    pub fn ingest(&mut self, sample: TelemetrySample) {
        self.history.push(sanitize(sample));
        self.link = LinkState::Connected;
    }

    /// Record a sample produced by the local simulator.
    pub fn ingest_simulated(&mut self, sample: TelemetrySample) {
        self.history.push(sanitize(sample));
        self.link = LinkState::Simulated;
        self.status = MachineStatus::SimulationFeed;
    }

    /// Status text published by the machine; empty or missing means standby.
    pub fn report_status(&mut self, text: Option<&str>) {
        self.status = match text.map(str::trim) {
            Some(s) if !s.is_empty() => MachineStatus::Reported(s.to_string()),
            _ => MachineStatus::Standby,
        };
    }

    pub fn mark_disconnected(&mut self) {
        self.link = LinkState::Disconnected;
    }

    /// Send the strategy's command and analyse the latest reading.
    ///
    /// A failed delivery is not an error: the session degrades to simulation
    /// status and the failure is reported in `Activation::fallback_reason`.
    pub fn activate(&mut self, id: u8) -> Result<Activation, VendError> {
        let strategy = catalog::find(id)?;
        let command = strategy.command();

        let fallback_reason = match self.sink.send(command) {
            Ok(()) => {
                tracing::info!(command, name = strategy.name, "strategy command delivered");
                None
            }
            Err(e) => {
                let err = map_link_error(e.as_ref());
                tracing::warn!(command, error = %err, "command not delivered; simulating");
                Some(err)
            }
        };
        let delivered = fallback_reason.is_none();

        self.status = if delivered {
            MachineStatus::Executing {
                command,
                name: strategy.name,
            }
        } else {
            MachineStatus::Simulation { command }
        };

        let sample = self.history.latest();
        let analysis = if strategy.is_executable() {
            Analysis::optimized(&self.params, sample)
        } else {
            Analysis::preview(sample)
        };
        self.last_analysis = Some(analysis);

        Ok(Activation {
            strategy,
            command,
            delivered,
            fallback_reason,
            status: self.status.clone(),
            analysis,
        })
    }

    pub fn status(&self) -> &MachineStatus {
        &self.status
    }

    pub fn link(&self) -> LinkState {
        self.link
    }

    pub fn history(&self) -> &TelemetryHistory {
        &self.history
    }

    pub fn latest(&self) -> TelemetrySample {
        self.history.latest()
    }

    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last_analysis.as_ref()
    }

    pub fn params(&self) -> &OptimizerParams {
        &self.params
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }
}
