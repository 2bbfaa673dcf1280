//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config file used when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG: &str = "etc/vend_config.toml";

#[derive(Parser, Debug)]
#[command(name = "vend", version, about = "Smart medicine vending dashboard")]
pub struct Cli {
    /// Path to config TOML (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Log level (error|warn|info|debug|trace); falls back to logging.level, then warn
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend a dispensing RPM for a reading
    Optimize {
        /// Measured vibration
        #[arg(long, allow_negative_numbers = true)]
        vibration: f64,
        /// Current motor RPM
        #[arg(long, allow_negative_numbers = true)]
        rpm: f64,
        /// Vibration to compare against (defaults to --vibration)
        #[arg(long, value_name = "V", allow_negative_numbers = true)]
        reference_vibration: Option<f64>,
        /// Medicine weight (overrides config)
        #[arg(long, value_name = "W", allow_negative_numbers = true)]
        weight: Option<f64>,
        /// Target accuracy in mm (overrides config)
        #[arg(long, value_name = "MM", allow_negative_numbers = true)]
        target_accuracy: Option<f64>,
        /// Show memberships and rule strengths
        #[arg(long, action = ArgAction::SetTrue)]
        trace: bool,
    },
    /// List the control strategies
    Catalog,
    /// Describe one strategy (id 0 is the baseline)
    Show {
        #[arg(long)]
        id: u8,
    },
    /// Send a strategy command and analyse the current reading
    Activate {
        #[arg(long)]
        id: u8,
        /// Use this RPM instead of reading telemetry
        #[arg(long, requires = "vibration")]
        rpm: Option<f64>,
        /// Use this vibration instead of reading telemetry
        #[arg(long, requires = "rpm")]
        vibration: Option<f64>,
    },
    /// Poll telemetry and print the live status
    Monitor {
        /// Number of samples to collect
        #[arg(long, default_value_t = 10)]
        samples: usize,
        /// Poll period (overrides config)
        #[arg(long, value_name = "MS")]
        period_ms: Option<u64>,
    },
    /// Validate config and probe telemetry and the command store
    SelfCheck,
}
