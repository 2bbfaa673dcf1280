use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VendError {
    #[error("unknown strategy id {0}")]
    UnknownStrategy(u8),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("telemetry unavailable: {0}")]
    Telemetry(String),
    #[error("telemetry read timed out")]
    Timeout,
    #[error("command delivery failed: {0}")]
    Delivery(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing command sink")]
    MissingSink,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
