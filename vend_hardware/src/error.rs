use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("store timeout")]
    Timeout,
    #[error("replay telemetry has no samples")]
    Empty,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("encode command: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LinkError>;
