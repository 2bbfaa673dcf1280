use crate::dashboard::Dashboard;
use crate::error::{BuildError, Result};
use crate::optimizer::OptimizerParams;
use crate::status::{LinkState, MachineStatus};
use crate::telemetry::{DEFAULT_HISTORY_LEN, TelemetryHistory};
use vend_traits::CommandSink;

pub struct DashboardBuilder<K> {
    sink: Option<K>,
    params: OptimizerParams,
    history_len: usize,
}

impl<K: CommandSink> Default for DashboardBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CommandSink> DashboardBuilder<K> {
    pub fn new() -> Self {
        Self {
            sink: None,
            params: OptimizerParams::default(),
            history_len: DEFAULT_HISTORY_LEN,
        }
    }

    pub fn with_sink(mut self, sink: K) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_params(mut self, params: OptimizerParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_history_len(mut self, len: usize) -> Self {
        self.history_len = len;
        self
    }

    /// Take optimizer parameters and history length from a loaded config.
    pub fn apply_config(self, cfg: &vend_config::Config) -> Self {
        self.with_params((&cfg.optimizer).into())
            .with_history_len(cfg.telemetry.history_len)
    }

    pub fn build(self) -> Result<Dashboard<K>> {
        let sink = self
            .sink
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSink))?;
        let w = self.params.medicine_weight;
        if !(w.is_finite() && w > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "medicine_weight must be finite and > 0",
            )));
        }
        let t = self.params.target_accuracy;
        if !(t.is_finite() && t > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "target_accuracy must be finite and > 0",
            )));
        }
        if self.history_len < 2 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "history_len must be >= 2",
            )));
        }
        Ok(Dashboard {
            sink,
            params: self.params,
            history: TelemetryHistory::new(self.history_len),
            status: MachineStatus::Standby,
            link: LinkState::Disconnected,
            last_analysis: None,
        })
    }
}
