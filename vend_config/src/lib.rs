#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and telemetry replay parsing for the vending dashboard.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//!   Every section has defaults, so an empty document is a valid config.
//! - The replay CSV loader enforces the `rpm,vibration` header and rejects
//!   negative or non-finite readings.
use serde::Deserialize;
use vend_traits::TelemetrySample;

/// Telemetry replay CSV schema.
///
/// Expected headers:
/// rpm,vibration
///
/// Example:
/// rpm,vibration
/// 40,5
/// 45,30
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TelemetryRow {
    pub rpm: f64,
    pub vibration: f64,
}

impl From<TelemetryRow> for TelemetrySample {
    fn from(r: TelemetryRow) -> Self {
        TelemetrySample::new(r.rpm, r.vibration)
    }
}

/// Fixed inputs of the precision-dispensing optimizer.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct OptimizerCfg {
    /// Medicine weight fed to the weight partition (arbitrary mass unit).
    pub medicine_weight: f64,
    /// Desired dispensing accuracy (mm). Only reported, never steers the rules.
    pub target_accuracy: f64,
}

impl Default for OptimizerCfg {
    fn default() -> Self {
        Self {
            medicine_weight: 0.25,
            target_accuracy: 0.10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Random readings, like the dashboard's offline demo mode
    #[default]
    Simulated,
    /// Cycle through rows of `replay_csv`
    Replay,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryCfg {
    pub source: SourceKind,
    pub replay_csv: Option<String>,
    /// Poll period of the background sampler (ms).
    pub sample_period_ms: u64,
    /// Per-read timeout handed to the source (ms). Also accepts "timeout_ms".
    #[serde(alias = "timeout_ms")]
    pub read_timeout_ms: u64,
    /// Samples kept for graphs.
    pub history_len: usize,
    /// Samples drawn per graph.
    pub graph_points: usize,
}

impl Default for TelemetryCfg {
    fn default() -> Self {
        Self {
            source: SourceKind::Simulated,
            replay_csv: None,
            sample_period_ms: 3000,
            read_timeout_ms: 150,
            history_len: 50,
            graph_points: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationCfg {
    /// Exclusive upper bound of simulated RPM.
    pub max_rpm: u32,
    /// Exclusive upper bound of simulated vibration.
    pub max_vibration: u32,
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationCfg {
    fn default() -> Self {
        Self {
            max_rpm: 100,
            max_vibration: 50,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreCfg {
    /// Key the command code is written under.
    pub command_path: String,
    /// JSON-lines outbox file. Commands stay in memory when unset.
    pub outbox: Option<String>,
}

impl Default for StoreCfg {
    fn default() -> Self {
        Self {
            command_path: "7_Fuzzy_Logic/command".to_string(),
            outbox: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub optimizer: OptimizerCfg,
    pub telemetry: TelemetryCfg,
    pub simulation: SimulationCfg,
    pub store: StoreCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file in one go.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration: {e}"))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_telemetry_csv(path: &std::path::Path) -> eyre::Result<Vec<TelemetrySample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open telemetry CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["rpm", "vibration"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "telemetry CSV must have headers 'rpm,vibration', got: {}",
            actual.join(",")
        );
    }

    let mut samples = Vec::new();
    for (idx, rec) in rdr.deserialize::<TelemetryRow>().enumerate() {
        let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        if !(row.rpm.is_finite() && row.vibration.is_finite()) {
            eyre::bail!("CSV row {} has a non-finite reading", idx + 2);
        }
        if row.rpm < 0.0 || row.vibration < 0.0 {
            eyre::bail!("CSV row {} has a negative reading", idx + 2);
        }
        samples.push(row.into());
    }
    if samples.is_empty() {
        eyre::bail!("telemetry CSV {:?} has no rows", path);
    }
    Ok(samples)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Optimizer
        let w = self.optimizer.medicine_weight;
        if !(w.is_finite() && w > 0.0 && w <= 10.0) {
            eyre::bail!("optimizer.medicine_weight must be in (0.0, 10.0]");
        }
        let t = self.optimizer.target_accuracy;
        if !(t.is_finite() && t > 0.0) {
            eyre::bail!("optimizer.target_accuracy must be > 0");
        }

        // Telemetry
        if self.telemetry.source == SourceKind::Replay && self.telemetry.replay_csv.is_none() {
            eyre::bail!("telemetry.replay_csv is required when telemetry.source = \"replay\"");
        }
        if self.telemetry.sample_period_ms == 0 {
            eyre::bail!("telemetry.sample_period_ms must be >= 1");
        }
        if self.telemetry.sample_period_ms > 60 * 60 * 1000 {
            eyre::bail!("telemetry.sample_period_ms is unreasonably large (>1h)");
        }
        if self.telemetry.read_timeout_ms == 0 {
            eyre::bail!("telemetry.read_timeout_ms must be >= 1");
        }
        if self.telemetry.history_len < 2 {
            eyre::bail!("telemetry.history_len must be >= 2");
        }
        if self.telemetry.graph_points < 2 || self.telemetry.graph_points > self.telemetry.history_len
        {
            eyre::bail!("telemetry.graph_points must be in [2, telemetry.history_len]");
        }

        // Simulation
        if self.simulation.max_rpm == 0 {
            eyre::bail!("simulation.max_rpm must be > 0");
        }
        if self.simulation.max_vibration == 0 {
            eyre::bail!("simulation.max_vibration must be > 0");
        }

        // Store
        if self.store.command_path.trim().is_empty() {
            eyre::bail!("store.command_path must not be empty");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
