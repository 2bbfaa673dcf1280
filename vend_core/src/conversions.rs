//! `From` implementations bridging `vend_config` types to `vend_core` types.

use crate::optimizer::OptimizerParams;
use crate::sampler::SamplerCfg;
use std::time::Duration;

impl From<&vend_config::OptimizerCfg> for OptimizerParams {
    fn from(c: &vend_config::OptimizerCfg) -> Self {
        Self {
            medicine_weight: c.medicine_weight,
            target_accuracy: c.target_accuracy,
        }
    }
}

impl From<&vend_config::TelemetryCfg> for SamplerCfg {
    fn from(c: &vend_config::TelemetryCfg) -> Self {
        Self {
            period: Duration::from_millis(c.sample_period_ms),
            read_timeout: Duration::from_millis(c.read_timeout_ms),
        }
    }
}
